//! Farm Ledger Core Library
//!
//! Financial aggregation and health scoring for farm ledgers:
//! - Ledger source traits over manual transactions, marketplace orders and contracts
//! - Keyword classification of purchased products into expense categories
//! - Windowed income/expense summaries with per-crop profitability
//! - A unified, signed ledger across all sources
//! - A 0-100 financial health score with trends and alerts
//! - CSV/JSON export and a SQLite reference store

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod health;
pub mod ledger;
pub mod models;
pub mod report;
pub mod store;
pub mod summary;

/// Test utilities: failing store, fixed clocks, sample records
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use classify::{classify_expense_category, classify_order_item, format_category_name};
pub use config::ScoringConfig;
pub use db::{Database, ImportStats};
pub use error::{Error, Result};
pub use export::{ledger_to_csv, ledger_to_csv_string, report_to_json};
pub use health::HealthScorer;
pub use models::*;
pub use report::{CategoryShare, CropReport, FinancialReport, ReportingService};
pub use store::{ContractStore, MemoryStore, OrderStore, TransactionStore};
pub use summary::{LedgerSnapshot, SummaryBuilder};
