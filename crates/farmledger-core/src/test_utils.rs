//! Test utilities for farmledger-core
//!
//! A store that always fails, fixed clocks, and a sample farm year of
//! records for integration tests.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{
    Contract, ExpenseCategory, FinancialSummary, IncomeCategory, LedgerRecords, Order,
    Transaction, DAY_MS,
};
use crate::store::{ContractStore, OrderStore, TransactionStore};

/// 2023-11-14T22:13:20Z
pub const T0: i64 = 1_700_000_000_000;

/// 2024-06-15T12:00:00Z, used as "now" for health scoring
pub const NOW: i64 = 1_718_452_800_000;

/// Store whose every read fails with `StorageUnavailable`
#[derive(Debug, Clone)]
pub struct FailingStore {
    reason: String,
}

impl FailingStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> Result<T> {
        Err(Error::StorageUnavailable(self.reason.clone()))
    }
}

#[async_trait]
impl TransactionStore for FailingStore {
    async fn list_by_user(&self, _user_id: &str) -> Result<Vec<Transaction>> {
        self.fail()
    }
}

#[async_trait]
impl OrderStore for FailingStore {
    async fn list_sold_by(&self, _seller_id: &str) -> Result<Vec<Order>> {
        self.fail()
    }

    async fn list_bought_by(&self, _buyer_id: &str) -> Result<Vec<Order>> {
        self.fail()
    }
}

#[async_trait]
impl ContractStore for FailingStore {
    async fn list_by_party(&self, _user_id: &str) -> Result<Vec<Contract>> {
        self.fail()
    }
}

/// Panic unless both totals equal their bucket sums (within 1e-6)
pub fn assert_bucket_invariants(summary: &FinancialSummary) {
    let income: f64 = summary.income_by_category.values().sum();
    let expense: f64 = summary.expense_by_category.values().sum();
    assert!(
        (summary.total_income - income).abs() < 1e-6,
        "income {} != bucket sum {}",
        summary.total_income,
        income
    );
    assert!(
        (summary.total_expense - expense).abs() < 1e-6,
        "expense {} != bucket sum {}",
        summary.total_expense,
        expense
    );
    for (crop, profit) in &summary.crop_profitability {
        assert_eq!(profit.profit, profit.income - profit.expense, "crop {}", crop);
    }
}

/// A season of records for `farmer` ending at `now`
///
/// Income and expenses in each of the last six months, a sale and a
/// purchase on the marketplace, and a supply contract with two payments.
pub fn sample_records(farmer: &str, now: i64) -> LedgerRecords {
    let mut transactions = Vec::new();
    for month in 0..6 {
        let date = now - (month * 31 + 2) * DAY_MS;
        transactions.push(
            Transaction::income(
                format!("{}-inc-{}", farmer, month),
                farmer,
                20_000.0,
                date,
                IncomeCategory::CropSales,
            )
            .with_crop("Wheat")
            .with_description("Wheat sale at mandi"),
        );
        transactions.push(
            Transaction::expense(
                format!("{}-exp-{}", farmer, month),
                farmer,
                6_000.0,
                date,
                ExpenseCategory::Labor,
            )
            .with_crop("Wheat")
            .with_vendor("Village labour group"),
        );
    }

    let orders = vec![
        Order::new("sale-0001-abcdef", farmer, "buyer-1", now - 10 * DAY_MS)
            .with_item("Basmati Rice", 12_000.0),
        Order::new("purchase-0002", "agro-store", farmer, now - 20 * DAY_MS)
            .with_item("NPK Fertilizer", 1_000.0)
            .with_item("Garden Hoe", 500.0),
    ];

    let contracts = vec![Contract::new("contract-1", farmer, "mill-co")
        .with_title("Rice supply 2024")
        .with_payment("pay-1", 5_000.0, now - 40 * DAY_MS)
        .with_payment("pay-2", 5_000.0, now - 5 * DAY_MS)];

    LedgerRecords {
        transactions,
        orders,
        contracts,
    }
}
