//! Unified ledger
//!
//! Merges manual transactions, marketplace orders and contract payments
//! into one signed, newest-first list of entries.

use crate::classify::format_category_name;
use crate::models::{Ledger, LedgerEntry, LedgerEntryKind, PartyRole, TimeWindow, TransactionKind};
use crate::summary::LedgerSnapshot;

/// Short order reference used in descriptions
fn order_ref(order_id: &str) -> &str {
    match order_id.char_indices().nth(8) {
        Some((idx, _)) => &order_id[..idx],
        None => order_id,
    }
}

/// Build the ledger for one window from a fetched snapshot
pub fn build_ledger(user_id: &str, window: TimeWindow, snapshot: &LedgerSnapshot) -> Ledger {
    let mut entries = Vec::new();

    for tx in snapshot.transactions.iter().filter(|t| window.contains(t.date)) {
        let (kind, amount, counterparty) = match &tx.kind {
            TransactionKind::Income { .. } => (LedgerEntryKind::Income, tx.amount, None),
            TransactionKind::Expense { vendor, .. } => {
                (LedgerEntryKind::Expense, -tx.amount, vendor.clone())
            }
        };
        entries.push(LedgerEntry {
            id: tx.id.clone(),
            date: tx.date,
            kind,
            description: tx.description.clone(),
            category: format_category_name(tx.kind.category_str()),
            amount,
            counterparty,
            contract_id: None,
        });
    }

    for order in snapshot
        .sales_orders
        .iter()
        .filter(|o| window.contains(o.created_at))
    {
        entries.push(LedgerEntry {
            id: order.id.clone(),
            date: order.created_at,
            kind: LedgerEntryKind::Sale,
            description: format!("Sale: Order #{}", order_ref(&order.id)),
            category: "Sales".to_string(),
            amount: order.total_amount,
            counterparty: Some(order.buyer_id.clone()),
            contract_id: None,
        });
    }

    for order in snapshot
        .purchase_orders
        .iter()
        .filter(|o| window.contains(o.created_at))
    {
        let (kind, label, category) = if order.has_rental() {
            (LedgerEntryKind::Rental, "Rental", "Equipment Rental")
        } else {
            (LedgerEntryKind::Purchase, "Purchase", "Purchase")
        };
        entries.push(LedgerEntry {
            id: order.id.clone(),
            date: order.created_at,
            kind,
            description: format!("{}: Order #{}", label, order_ref(&order.id)),
            category: category.to_string(),
            amount: -order.total_amount,
            counterparty: Some(order.seller_id.clone()),
            contract_id: None,
        });
    }

    for (contract, payment_id, amount, date, role) in snapshot.payments_in(user_id, window) {
        let title = contract.title.as_deref().unwrap_or("Contract");
        let (kind, description, signed, counterparty) = match role {
            PartyRole::Receiver => (
                LedgerEntryKind::ContractPaymentReceived,
                format!("Payment received for contract: {}", title),
                amount,
                &contract.counterparty_id,
            ),
            PartyRole::Payer => (
                LedgerEntryKind::ContractPaymentMade,
                format!("Payment made for contract: {}", title),
                -amount,
                &contract.creator_id,
            ),
        };
        entries.push(LedgerEntry {
            id: payment_id.to_string(),
            date,
            kind,
            description,
            category: "Contract Payment".to_string(),
            amount: signed,
            counterparty: Some(counterparty.clone()),
            contract_id: Some(contract.id.clone()),
        });
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    let total_income: f64 = entries.iter().filter(|e| e.amount > 0.0).map(|e| e.amount).sum();
    let total_expense: f64 = entries
        .iter()
        .filter(|e| e.amount < 0.0)
        .map(|e| -e.amount)
        .sum();

    Ledger {
        user_id: user_id.to_string(),
        start_date: window.start,
        end_date: window.end,
        entries,
        total_income,
        total_expense,
        net_profit: total_income - total_expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contract, ExpenseCategory, IncomeCategory, Order, Transaction};

    fn snapshot() -> LedgerSnapshot {
        LedgerSnapshot {
            transactions: vec![
                Transaction::income("tx-1", "u1", 500.0, 1_000, IncomeCategory::CropSales)
                    .with_description("Wheat harvest"),
                Transaction::expense("tx-2", "u1", 120.0, 2_000, ExpenseCategory::EquipmentMaintenance)
                    .with_vendor("Tractor Works"),
            ],
            sales_orders: vec![Order::new("abcdef1234567", "u1", "buyer-9", 3_000).with_item("Rice", 800.0)],
            purchase_orders: vec![
                Order::new("zz99", "seller-1", "u1", 4_000).with_rental_item("Harvester machinery", 300.0),
                Order::new("pp11", "seller-2", "u1", 5_000).with_item("Seeds", 60.0),
            ],
            contracts: vec![
                Contract::new("c-1", "u1", "mill")
                    .with_title("Rice supply")
                    .with_payment("pay-1", 1_000.0, 6_000),
                Contract::new("c-2", "landlord", "u1").with_payment("pay-2", 400.0, 7_000),
            ],
        }
    }

    #[test]
    fn test_entries_are_newest_first() {
        let ledger = build_ledger("u1", TimeWindow::new(0, 10_000).unwrap(), &snapshot());
        let dates: Vec<i64> = ledger.entries.iter().map(|e| e.date).collect();

        assert_eq!(dates, vec![7_000, 6_000, 5_000, 4_000, 3_000, 2_000, 1_000]);
    }

    #[test]
    fn test_entry_shapes() {
        let ledger = build_ledger("u1", TimeWindow::new(0, 10_000).unwrap(), &snapshot());
        let find = |id: &str| ledger.entries.iter().find(|e| e.id == id).unwrap();

        let income = find("tx-1");
        assert_eq!(income.kind, LedgerEntryKind::Income);
        assert_eq!(income.category, "Crop Sales");
        assert_eq!(income.amount, 500.0);

        let expense = find("tx-2");
        assert_eq!(expense.amount, -120.0);
        assert_eq!(expense.category, "Equipment Maintenance");
        assert_eq!(expense.counterparty.as_deref(), Some("Tractor Works"));

        let sale = find("abcdef1234567");
        assert_eq!(sale.description, "Sale: Order #abcdef12");
        assert_eq!(sale.category, "Sales");

        let rental = find("zz99");
        assert_eq!(rental.kind, LedgerEntryKind::Rental);
        assert_eq!(rental.description, "Rental: Order #zz99");
        assert_eq!(rental.category, "Equipment Rental");
        assert_eq!(rental.amount, -300.0);

        let purchase = find("pp11");
        assert_eq!(purchase.kind, LedgerEntryKind::Purchase);
        assert_eq!(purchase.category, "Purchase");

        let received = find("pay-1");
        assert_eq!(received.kind, LedgerEntryKind::ContractPaymentReceived);
        assert_eq!(received.description, "Payment received for contract: Rice supply");
        assert_eq!(received.contract_id.as_deref(), Some("c-1"));

        let made = find("pay-2");
        assert_eq!(made.kind, LedgerEntryKind::ContractPaymentMade);
        assert_eq!(made.description, "Payment made for contract: Contract");
        assert_eq!(made.amount, -400.0);
        assert_eq!(made.counterparty.as_deref(), Some("landlord"));
    }

    #[test]
    fn test_totals() {
        let ledger = build_ledger("u1", TimeWindow::new(0, 10_000).unwrap(), &snapshot());

        assert_eq!(ledger.total_income, 2_300.0);
        assert_eq!(ledger.total_expense, 880.0);
        assert_eq!(ledger.net_profit, 1_420.0);
    }

    #[test]
    fn test_window_filters_entries() {
        let ledger = build_ledger("u1", TimeWindow::new(2_000, 4_000).unwrap(), &snapshot());
        let ids: Vec<&str> = ledger.entries.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["zz99", "abcdef1234567", "tx-2"]);
    }

    #[test]
    fn test_empty_snapshot() {
        let ledger = build_ledger("u1", TimeWindow::new(0, 1).unwrap(), &LedgerSnapshot::default());
        assert!(ledger.entries.is_empty());
        assert_eq!(ledger.net_profit, 0.0);
    }
}
