//! Summary builder
//!
//! Fetches every ledger source for a user concurrently, filters each to the
//! requested window by its own timestamp and folds the result into a
//! [`FinancialSummary`]. Fetching and folding are separate so one fan-out
//! can be folded over several windows.

use std::sync::Arc;

use tracing::debug;

use crate::classify::classify_order_item;
use crate::error::{Error, Result};
use crate::ledger;
use crate::models::{
    Contract, ExpenseCategory, FinancialSummary, IncomeCategory, Ledger, Order, PartyRole,
    TimeWindow, Transaction, TransactionKind,
};
use crate::store::{ContractStore, OrderStore, TransactionStore};

/// Everything the sources returned for one user, unfiltered
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub transactions: Vec<Transaction>,
    pub sales_orders: Vec<Order>,
    pub purchase_orders: Vec<Order>,
    pub contracts: Vec<Contract>,
}

impl LedgerSnapshot {
    /// True when no source returned anything
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.sales_orders.is_empty()
            && self.purchase_orders.is_empty()
            && self.contracts.is_empty()
    }

    /// Contract payments inside the window, paired with the user's role
    pub fn payments_in<'a>(
        &'a self,
        user_id: &'a str,
        window: TimeWindow,
    ) -> impl Iterator<Item = (&'a Contract, &'a str, f64, i64, PartyRole)> + 'a {
        self.contracts.iter().flat_map(move |contract| {
            let role = contract.role_of(user_id);
            contract
                .payments
                .iter()
                .filter(move |(_, p)| window.contains(p.date))
                .map(move |(id, p)| (contract, id.as_str(), p.amount, p.date, role))
        })
    }
}

/// Builds summaries and ledgers from the three ledger sources
#[derive(Clone)]
pub struct SummaryBuilder {
    transactions: Arc<dyn TransactionStore>,
    orders: Arc<dyn OrderStore>,
    contracts: Arc<dyn ContractStore>,
}

impl SummaryBuilder {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        orders: Arc<dyn OrderStore>,
        contracts: Arc<dyn ContractStore>,
    ) -> Self {
        Self {
            transactions,
            orders,
            contracts,
        }
    }

    /// Use one store for all three sources
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: TransactionStore + OrderStore + ContractStore + 'static,
    {
        Self {
            transactions: store.clone(),
            orders: store.clone(),
            contracts: store,
        }
    }

    /// Summary of all sources for `user_id` over `window`
    pub async fn build_summary(
        &self,
        user_id: &str,
        window: TimeWindow,
    ) -> Result<FinancialSummary> {
        let window = TimeWindow::new(window.start, window.end)?;
        let snapshot = self.fetch_snapshot(user_id).await?;
        Ok(fold_summary(user_id, window, &snapshot))
    }

    /// Unified ledger of all sources for `user_id` over `window`
    pub async fn build_ledger(&self, user_id: &str, window: TimeWindow) -> Result<Ledger> {
        let window = TimeWindow::new(window.start, window.end)?;
        let snapshot = self.fetch_snapshot(user_id).await?;
        Ok(ledger::build_ledger(user_id, window, &snapshot))
    }

    /// Fetch all four collections concurrently, failing on the first error
    pub async fn fetch_snapshot(&self, user_id: &str) -> Result<LedgerSnapshot> {
        let (transactions, sales_orders, purchase_orders, contracts) = tokio::try_join!(
            async { self.transactions.list_by_user(user_id).await.map_err(into_storage) },
            async { self.orders.list_sold_by(user_id).await.map_err(into_storage) },
            async { self.orders.list_bought_by(user_id).await.map_err(into_storage) },
            async { self.contracts.list_by_party(user_id).await.map_err(into_storage) },
        )?;

        debug!(
            user_id,
            transactions = transactions.len(),
            sales_orders = sales_orders.len(),
            purchase_orders = purchase_orders.len(),
            contracts = contracts.len(),
            "Fetched ledger sources"
        );

        Ok(LedgerSnapshot {
            transactions,
            sales_orders,
            purchase_orders,
            contracts,
        })
    }
}

/// Every source failure aborts the computation as `StorageUnavailable`
fn into_storage(err: Error) -> Error {
    match err {
        Error::StorageUnavailable(_) => err,
        other => Error::storage(other),
    }
}

/// Fold a snapshot into a summary for one window
pub fn fold_summary(user_id: &str, window: TimeWindow, snapshot: &LedgerSnapshot) -> FinancialSummary {
    let mut summary = FinancialSummary::new(user_id, window);

    for tx in snapshot.transactions.iter().filter(|t| window.contains(t.date)) {
        fold_transaction(&mut summary, tx);
    }

    for order in snapshot
        .sales_orders
        .iter()
        .filter(|o| window.contains(o.created_at))
    {
        summary.total_income += order.total_amount;
        add_income(&mut summary, IncomeCategory::CropSales, order.total_amount);
    }

    // Order total goes to the running total; line items go to the buckets.
    // The two need not agree.
    for order in snapshot
        .purchase_orders
        .iter()
        .filter(|o| window.contains(o.created_at))
    {
        summary.total_expense += order.total_amount;
        for item in &order.items {
            add_expense(&mut summary, classify_order_item(item), item.total_price);
        }
    }

    for (_, _, amount, _, role) in snapshot.payments_in(user_id, window) {
        match role {
            PartyRole::Receiver => {
                summary.total_income += amount;
                add_income(&mut summary, IncomeCategory::OtherIncome, amount);
            }
            PartyRole::Payer => {
                summary.total_expense += amount;
                add_expense(&mut summary, ExpenseCategory::OtherExpense, amount);
            }
        }
    }

    summary.net_profit = summary.total_income - summary.total_expense;

    debug!(
        user_id,
        start = window.start,
        end = window.end,
        total_income = summary.total_income,
        total_expense = summary.total_expense,
        "Folded summary"
    );

    summary
}

fn fold_transaction(summary: &mut FinancialSummary, tx: &Transaction) {
    match &tx.kind {
        TransactionKind::Income { category, .. } => {
            summary.total_income += tx.amount;
            add_income(summary, *category, tx.amount);
        }
        TransactionKind::Expense { category, .. } => {
            summary.total_expense += tx.amount;
            add_expense(summary, *category, tx.amount);
        }
    }

    if let Some(crop) = &tx.crop_name {
        let entry = summary.crop_profitability.entry(crop.clone()).or_default();
        if tx.is_income() {
            entry.income += tx.amount;
        } else {
            entry.expense += tx.amount;
        }
        entry.profit = entry.income - entry.expense;
    }
}

fn add_income(summary: &mut FinancialSummary, category: IncomeCategory, amount: f64) {
    *summary.income_by_category.entry(category).or_insert(0.0) += amount;
}

fn add_expense(summary: &mut FinancialSummary, category: ExpenseCategory, amount: f64) {
    *summary.expense_by_category.entry(category).or_insert(0.0) += amount;
}
