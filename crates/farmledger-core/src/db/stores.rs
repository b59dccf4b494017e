//! Ledger source traits over the SQLite store
//!
//! Any database failure surfaces as `StorageUnavailable`.

use async_trait::async_trait;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Contract, Order, Transaction};
use crate::store::{ContractStore, OrderStore, TransactionStore};

#[async_trait]
impl TransactionStore for Database {
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.list_transactions(user_id).map_err(Error::storage)
    }
}

#[async_trait]
impl OrderStore for Database {
    async fn list_sold_by(&self, seller_id: &str) -> Result<Vec<Order>> {
        self.list_orders_sold_by(seller_id).map_err(Error::storage)
    }

    async fn list_bought_by(&self, buyer_id: &str) -> Result<Vec<Order>> {
        self.list_orders_bought_by(buyer_id).map_err(Error::storage)
    }
}

#[async_trait]
impl ContractStore for Database {
    async fn list_by_party(&self, user_id: &str) -> Result<Vec<Contract>> {
        self.list_contracts_for_party(user_id)
            .map_err(Error::storage)
    }
}
