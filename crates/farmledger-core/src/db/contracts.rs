//! Contract and contract payment operations

use std::collections::BTreeMap;

use rusqlite::{params, Connection};

use super::transactions::check_amount;
use super::Database;
use crate::error::Result;
use crate::models::{Contract, ContractPayment};

impl Database {
    /// Insert a contract with its payments. Returns false if the id already exists.
    pub fn insert_contract(&self, contract: &Contract) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let inserted = insert_contract_on(&tx, contract)?;
        tx.commit()?;
        Ok(inserted)
    }

    /// Record a payment against an existing contract
    pub fn add_contract_payment(
        &self,
        contract_id: &str,
        payment_id: &str,
        payment: &ContractPayment,
    ) -> Result<()> {
        check_amount("Contract payment", payment_id, payment.amount)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO contract_payments (contract_id, payment_id, amount, date) VALUES (?, ?, ?, ?)",
            params![contract_id, payment_id, payment.amount, payment.date],
        )?;
        Ok(())
    }

    /// Contracts where the user is the creator or the counterparty
    pub fn list_contracts_for_party(&self, user_id: &str) -> Result<Vec<Contract>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, creator_id, counterparty_id, title
            FROM contracts
            WHERE creator_id = ?1 OR counterparty_id = ?1
            ORDER BY id
            "#,
        )?;

        let mut contracts = stmt
            .query_map(params![user_id], |row| {
                Ok(Contract {
                    id: row.get(0)?,
                    creator_id: row.get(1)?,
                    counterparty_id: row.get(2)?,
                    title: row.get(3)?,
                    payments: BTreeMap::new(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut payments_stmt = conn.prepare(
            "SELECT payment_id, amount, date FROM contract_payments WHERE contract_id = ?",
        )?;
        for contract in &mut contracts {
            contract.payments = payments_stmt
                .query_map(params![contract.id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        ContractPayment {
                            amount: row.get(1)?,
                            date: row.get(2)?,
                        },
                    ))
                })?
                .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;
        }

        Ok(contracts)
    }
}

pub(crate) fn insert_contract_on(conn: &Connection, contract: &Contract) -> Result<bool> {
    for (payment_id, payment) in &contract.payments {
        check_amount("Contract payment", payment_id, payment.amount)?;
    }

    let inserted = conn.execute(
        "INSERT OR IGNORE INTO contracts (id, creator_id, counterparty_id, title) VALUES (?, ?, ?, ?)",
        params![
            contract.id,
            contract.creator_id,
            contract.counterparty_id,
            contract.title,
        ],
    )?;

    if inserted == 0 {
        return Ok(false);
    }

    for (payment_id, payment) in &contract.payments {
        conn.execute(
            "INSERT INTO contract_payments (contract_id, payment_id, amount, date) VALUES (?, ?, ?, ?)",
            params![contract.id, payment_id, payment.amount, payment.date],
        )?;
    }

    Ok(true)
}
