//! SQLite ledger store with connection pooling and migrations
//!
//! This module is organized by record type:
//! - `transactions` - Manual income/expense records
//! - `orders` - Marketplace orders and their line items
//! - `contracts` - Contracts and their payments
//! - `import` - Bulk loading of record bundles
//! - `stores` - Ledger source trait implementations for the engine

use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tempfile::TempDir;
use tracing::info;

use crate::error::Result;

mod contracts;
mod import;
mod orders;
mod stores;
mod transactions;

pub use import::ImportStats;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Build a column conversion error for values stored in an unexpected form
pub(crate) fn invalid_column(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::<dyn std::error::Error + Send + Sync>::from(message),
    )
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
    /// Backing directory of a throwaway database; removed with the last clone
    _temp_dir: Option<Arc<TempDir>>,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
            _temp_dir: None,
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Backed by a file in a private temp directory rather than `:memory:`
    /// so every pooled connection sees the same data. The directory is
    /// deleted when the last clone of the database is dropped.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("farmledger_test_")
            .tempdir()?;
        let path = dir.path().join("ledger.db");

        let mut db = Self::new(&path.to_string_lossy())?;
        db._temp_dir = Some(Arc::new(dir));
        Ok(db)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            -- Manual income/expense records
            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0),
                currency TEXT NOT NULL DEFAULT 'INR',
                date INTEGER NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL,
                crop_name TEXT,
                quantity REAL,
                price_per_unit REAL,
                vendor TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user_date
                ON transactions(user_id, date);

            -- Marketplace orders
            CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                seller_id TEXT NOT NULL,
                buyer_id TEXT NOT NULL,
                total_amount REAL NOT NULL CHECK (total_amount >= 0),
                created_at INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
            );

            CREATE INDEX IF NOT EXISTS idx_orders_seller ON orders(seller_id, created_at);
            CREATE INDEX IF NOT EXISTS idx_orders_buyer ON orders(buyer_id, created_at);

            CREATE TABLE IF NOT EXISTS order_items (
                id INTEGER PRIMARY KEY,
                order_id TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                product_name TEXT NOT NULL,
                total_price REAL NOT NULL CHECK (total_price >= 0),
                is_rental INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id, position);

            -- Contracts and their installment payments
            CREATE TABLE IF NOT EXISTS contracts (
                id TEXT PRIMARY KEY,
                creator_id TEXT NOT NULL,
                counterparty_id TEXT NOT NULL,
                title TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_contracts_creator ON contracts(creator_id);
            CREATE INDEX IF NOT EXISTS idx_contracts_counterparty ON contracts(counterparty_id);

            CREATE TABLE IF NOT EXISTS contract_payments (
                contract_id TEXT NOT NULL REFERENCES contracts(id) ON DELETE CASCADE,
                payment_id TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                date INTEGER NOT NULL,
                PRIMARY KEY (contract_id, payment_id)
            );

            CREATE INDEX IF NOT EXISTS idx_contract_payments_date ON contract_payments(date);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
