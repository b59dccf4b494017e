//! Transaction operations

use rusqlite::{params, Connection};

use super::{invalid_column, Database};
use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionKind};

/// Reject amounts the engine cannot fold
pub(crate) fn check_amount(what: &str, id: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} {} has invalid amount {}",
            what, id, amount
        )));
    }
    Ok(())
}

impl Database {
    /// Insert a transaction. Returns false if the id already exists.
    pub fn insert_transaction(&self, tx: &Transaction) -> Result<bool> {
        let conn = self.conn()?;
        insert_transaction_on(&conn, tx)
    }

    /// Delete a transaction by id. Returns false if it did not exist.
    pub fn delete_transaction(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    /// All transactions for a user, oldest first
    pub fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, kind, amount, currency, date, description, category,
                   crop_name, quantity, price_per_unit, vendor
            FROM transactions
            WHERE user_id = ?
            ORDER BY date, id
            "#,
        )?;

        let transactions = stmt
            .query_map(params![user_id], |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count transactions for a user
    pub fn count_transactions(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let kind_str: String = row.get(2)?;
        let category_str: String = row.get(7)?;

        let kind = match kind_str.as_str() {
            "income" => TransactionKind::Income {
                category: category_str.parse().map_err(|e| invalid_column(7, e))?,
                quantity: row.get(9)?,
                price_per_unit: row.get(10)?,
            },
            "expense" => TransactionKind::Expense {
                category: category_str.parse().map_err(|e| invalid_column(7, e))?,
                vendor: row.get(11)?,
            },
            other => {
                return Err(invalid_column(
                    2,
                    format!("Unknown transaction kind: {}", other),
                ))
            }
        };

        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: row.get(3)?,
            currency: row.get(4)?,
            date: row.get(5)?,
            description: row.get(6)?,
            crop_name: row.get(8)?,
            kind,
        })
    }
}

pub(crate) fn insert_transaction_on(conn: &Connection, tx: &Transaction) -> Result<bool> {
    check_amount("Transaction", &tx.id, tx.amount)?;

    let (quantity, price_per_unit, vendor) = match &tx.kind {
        TransactionKind::Income {
            quantity,
            price_per_unit,
            ..
        } => (*quantity, *price_per_unit, None),
        TransactionKind::Expense { vendor, .. } => (None, None, vendor.as_deref()),
    };

    let inserted = conn.execute(
        r#"
        INSERT OR IGNORE INTO transactions
            (id, user_id, kind, amount, currency, date, description, category,
             crop_name, quantity, price_per_unit, vendor)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            tx.id,
            tx.user_id,
            tx.kind.as_str(),
            tx.amount,
            tx.currency,
            tx.date,
            tx.description,
            tx.kind.category_str(),
            tx.crop_name,
            quantity,
            price_per_unit,
            vendor,
        ],
    )?;

    Ok(inserted > 0)
}
