//! Bulk import of record bundles

use serde::Serialize;
use tracing::info;

use super::contracts::insert_contract_on;
use super::orders::insert_order_on;
use super::transactions::insert_transaction_on;
use super::Database;
use crate::error::Result;
use crate::models::LedgerRecords;

/// Counts from a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub transactions: usize,
    pub orders: usize,
    pub contracts: usize,
    /// Records whose id was already present
    pub skipped: usize,
}

impl ImportStats {
    pub fn imported(&self) -> usize {
        self.transactions + self.orders + self.contracts
    }
}

impl Database {
    /// Load every record in the bundle in one database transaction
    ///
    /// Records whose id already exists are skipped. Any invalid record
    /// aborts the whole import.
    pub fn import_records(&self, records: &LedgerRecords) -> Result<ImportStats> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut stats = ImportStats::default();

        for record in &records.transactions {
            if insert_transaction_on(&tx, record)? {
                stats.transactions += 1;
            } else {
                stats.skipped += 1;
            }
        }
        for order in &records.orders {
            if insert_order_on(&tx, order)? {
                stats.orders += 1;
            } else {
                stats.skipped += 1;
            }
        }
        for contract in &records.contracts {
            if insert_contract_on(&tx, contract)? {
                stats.contracts += 1;
            } else {
                stats.skipped += 1;
            }
        }

        tx.commit()?;

        info!(
            transactions = stats.transactions,
            orders = stats.orders,
            contracts = stats.contracts,
            skipped = stats.skipped,
            "Imported ledger records"
        );

        Ok(stats)
    }

    /// Parse a JSON bundle and import it
    pub fn import_json(&self, json: &str) -> Result<ImportStats> {
        let records: LedgerRecords = serde_json::from_str(json)?;
        self.import_records(&records)
    }
}
