//! Integration tests for farmledger-core
//!
//! These tests exercise the full record → summary → health → export
//! workflow through both the in-memory and SQLite stores.

use std::sync::Arc;

use farmledger_core::{
    db::Database,
    export::{ledger_to_csv_string, report_to_json},
    models::{
        Contract, ExpenseCategory, HealthCategoryId, IncomeCategory, LedgerEntryKind,
        LedgerRecords, Order, TimeWindow, Transaction, DAY_MS,
    },
    Error, MemoryStore, ReportingService, ScoringConfig,
};

/// 2024-06-15T12:00:00Z
const NOW: i64 = 1_718_452_800_000;
const FARMER: &str = "farmer-1";

/// Six months of wheat income and labour costs, one marketplace sale, one
/// purchase and a supply contract with two payments
fn season() -> LedgerRecords {
    let mut transactions = Vec::new();
    for month in 0..6 {
        let date = NOW - (month * 31 + 2) * DAY_MS;
        transactions.push(
            Transaction::income(format!("inc-{}", month), FARMER, 20_000.0, date, IncomeCategory::CropSales)
                .with_crop("Wheat"),
        );
        transactions.push(
            Transaction::expense(format!("exp-{}", month), FARMER, 6_000.0, date, ExpenseCategory::Labor)
                .with_crop("Wheat")
                .with_vendor("Village labour group"),
        );
    }

    LedgerRecords {
        transactions,
        orders: vec![
            Order::new("sale-0001-abcdef", FARMER, "buyer-1", NOW - 10 * DAY_MS)
                .with_item("Basmati Rice", 12_000.0),
            Order::new("purchase-0002", "agro-store", FARMER, NOW - 20 * DAY_MS)
                .with_item("NPK Fertilizer", 1_000.0)
                .with_item("Garden Hoe", 500.0),
        ],
        contracts: vec![Contract::new("contract-1", FARMER, "mill-co")
            .with_title("Rice supply 2024")
            .with_payment("pay-1", 5_000.0, NOW - 40 * DAY_MS)
            .with_payment("pay-2", 5_000.0, NOW - 5 * DAY_MS)],
    }
}

fn memory_service() -> ReportingService {
    ReportingService::from_store(
        Arc::new(MemoryStore::from_records(season())),
        ScoringConfig::default(),
    )
}

fn sqlite_service() -> ReportingService {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    db.import_records(&season()).expect("Failed to import records");
    ReportingService::from_store(Arc::new(db), ScoringConfig::default())
}

fn trailing_year() -> TimeWindow {
    TimeWindow::trailing_days(NOW, 365)
}

// =============================================================================
// Summary
// =============================================================================

#[tokio::test]
async fn test_season_summary() {
    let summary = memory_service()
        .summary(FARMER, trailing_year())
        .await
        .unwrap();

    assert_eq!(summary.total_income, 142_000.0);
    assert_eq!(summary.total_expense, 37_500.0);
    assert_eq!(summary.net_profit, 104_500.0);
    assert_eq!(summary.income_by_category[&IncomeCategory::CropSales], 132_000.0);
    assert_eq!(summary.income_by_category[&IncomeCategory::OtherIncome], 10_000.0);
    assert_eq!(summary.expense_by_category[&ExpenseCategory::Labor], 36_000.0);
    assert_eq!(summary.expense_by_category[&ExpenseCategory::Fertilizers], 1_000.0);
    assert_eq!(summary.expense_by_category[&ExpenseCategory::OtherExpense], 500.0);

    let wheat = summary.crop_profitability["Wheat"];
    assert_eq!(wheat.income, 120_000.0);
    assert_eq!(wheat.expense, 36_000.0);
    assert_eq!(wheat.profit, 84_000.0);
}

#[tokio::test]
async fn test_counterparties_see_the_other_side() {
    let service = memory_service();

    let buyer = service.summary("buyer-1", trailing_year()).await.unwrap();
    assert_eq!(buyer.total_expense, 12_000.0);
    assert_eq!(buyer.total_income, 0.0);

    let mill = service.summary("mill-co", trailing_year()).await.unwrap();
    assert_eq!(mill.total_expense, 10_000.0);
    assert_eq!(mill.expense_by_category[&ExpenseCategory::OtherExpense], 10_000.0);

    let store = service.summary("agro-store", trailing_year()).await.unwrap();
    assert_eq!(store.total_income, 1_500.0);
}

#[tokio::test]
async fn test_sqlite_and_memory_agree() {
    let window = trailing_year();
    let memory = memory_service().summary(FARMER, window).await.unwrap();
    let sqlite = sqlite_service().summary(FARMER, window).await.unwrap();

    assert_eq!(memory, sqlite);
}

#[tokio::test]
async fn test_invalid_window_rejected() {
    let err = memory_service()
        .summary(FARMER, TimeWindow { start: NOW, end: NOW - 1 })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidTimeWindow { .. }));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_season_health() {
    let health = sqlite_service().health_at(FARMER, NOW).await.unwrap();

    // Monthly income 37k, 25k, then four months of 20k
    assert_eq!(health.score_for(HealthCategoryId::Income), 38);
    assert_eq!(health.score_for(HealthCategoryId::Expenses), 35);
    assert_eq!(health.score_for(HealthCategoryId::Debt), 15);
    assert_eq!(health.score_for(HealthCategoryId::Savings), 20);
    assert_eq!(health.score_for(HealthCategoryId::Planning), 10);
    assert_eq!(health.overall_score, 100);

    let alert_ids: Vec<&str> = health.alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(alert_ids, vec!["income_instability"]);

    assert_eq!(health.trends.last_month, 55);
    assert_eq!(health.trends.last_quarter, 49);
    assert_eq!(health.trends.last_year, 12);

    assert_eq!(health.summary.total_income, 142_000.0);
}

#[tokio::test]
async fn test_health_for_stranger_is_zero() {
    let health = sqlite_service().health_at("stranger", NOW).await.unwrap();

    assert_eq!(health.overall_score, 0);
    assert!(health.alerts.is_empty());
    assert!(health.categories.iter().all(|c| c.score == 0));
}

#[tokio::test]
async fn test_health_uses_configured_placeholders() {
    let config = ScoringConfig::from_toml("[debt]\nplaceholder_score = 5\n[trends]\nlast_year = 0\n").unwrap();
    let service = ReportingService::from_store(Arc::new(MemoryStore::from_records(season())), config);

    let health = service.health_at(FARMER, NOW).await.unwrap();
    assert_eq!(health.score_for(HealthCategoryId::Debt), 5);
    assert_eq!(health.trends.last_year, 0);
}

// =============================================================================
// Ledger and export
// =============================================================================

#[tokio::test]
async fn test_ledger_and_csv_export() {
    let window = TimeWindow::trailing_days(NOW, 30);
    let ledger = sqlite_service().ledger(FARMER, window).await.unwrap();

    let kinds: Vec<LedgerEntryKind> = ledger.entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LedgerEntryKind::Expense,
            LedgerEntryKind::Income,
            LedgerEntryKind::ContractPaymentReceived,
            LedgerEntryKind::Sale,
            LedgerEntryKind::Purchase,
        ]
    );
    assert_eq!(ledger.net_profit, 29_500.0);

    let csv = ledger_to_csv_string(&ledger).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[3].starts_with("2024-06-10,contract_payment_received,Payment received for contract: Rice supply 2024"));
    assert!(lines[4].contains("Sale: Order #sale-000"));
}

#[tokio::test]
async fn test_financial_report_json() {
    let report = memory_service()
        .financial_report(FARMER, trailing_year())
        .await
        .unwrap();

    assert_eq!(report.income_breakdown[0].category, "crop_sales");
    assert_eq!(report.expense_breakdown[0].category, "labor");
    assert_eq!(report.crops.len(), 1);

    let json = report_to_json(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["total_income"], 142_000.0);
    assert_eq!(value["crops"][0]["crop"], "Wheat");
    assert_eq!(value["crops"][0]["profit"], 84_000.0);
}
