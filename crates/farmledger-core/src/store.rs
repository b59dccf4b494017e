//! Ledger source traits
//!
//! The engine reads financial facts from three independent sources. Each
//! returns every record for a user; date filtering is the caller's job.
//! A user with no records yields an empty vector, never an error.
//!
//! Implementations report unreachable storage as
//! [`Error::StorageUnavailable`](crate::error::Error::StorageUnavailable).

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Contract, LedgerRecords, Order, Transaction};

/// Manually entered income and expense records
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>>;
}

/// Marketplace orders, seen from either side of the sale
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders where the user is the seller
    async fn list_sold_by(&self, seller_id: &str) -> Result<Vec<Order>>;

    /// Orders where the user is the buyer
    async fn list_bought_by(&self, buyer_id: &str) -> Result<Vec<Order>>;
}

/// Contracts with their embedded payments
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Contracts where the user is the creator or the counterparty
    async fn list_by_party(&self, user_id: &str) -> Result<Vec<Contract>>;
}

/// Vec-backed store implementing all three sources
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    transactions: Vec<Transaction>,
    orders: Vec<Order>,
    contracts: Vec<Contract>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding every record in the bundle
    pub fn from_records(records: LedgerRecords) -> Self {
        Self {
            transactions: records.transactions,
            orders: records.orders,
            contracts: records.contracts,
        }
    }

    pub fn add_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    pub fn add_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn add_contract(mut self, contract: Contract) -> Self {
        self.contracts.push(contract);
        self
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_sold_by(&self, seller_id: &str) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn list_bought_by(&self, buyer_id: &str) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .iter()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ContractStore for MemoryStore {
    async fn list_by_party(&self, user_id: &str) -> Result<Vec<Contract>> {
        Ok(self
            .contracts
            .iter()
            .filter(|c| c.creator_id == user_id || c.counterparty_id == user_id)
            .cloned()
            .collect())
    }
}
