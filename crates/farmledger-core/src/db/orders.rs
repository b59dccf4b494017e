//! Marketplace order operations

use rusqlite::{params, Connection};

use super::transactions::check_amount;
use super::{invalid_column, Database};
use crate::error::Result;
use crate::models::{Order, OrderItem};

impl Database {
    /// Insert an order with its line items. Returns false if the id already exists.
    pub fn insert_order(&self, order: &Order) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let inserted = insert_order_on(&tx, order)?;
        tx.commit()?;
        Ok(inserted)
    }

    /// Orders where the user is the seller
    pub fn list_orders_sold_by(&self, seller_id: &str) -> Result<Vec<Order>> {
        self.list_orders_where("seller_id", seller_id)
    }

    /// Orders where the user is the buyer
    pub fn list_orders_bought_by(&self, buyer_id: &str) -> Result<Vec<Order>> {
        self.list_orders_where("buyer_id", buyer_id)
    }

    fn list_orders_where(&self, column: &str, user_id: &str) -> Result<Vec<Order>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT id, seller_id, buyer_id, total_amount, created_at, status
             FROM orders WHERE {} = ? ORDER BY created_at, id",
            column
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut orders = stmt
            .query_map(params![user_id], |row| {
                let status: String = row.get(5)?;
                Ok(Order {
                    id: row.get(0)?,
                    seller_id: row.get(1)?,
                    buyer_id: row.get(2)?,
                    items: vec![],
                    total_amount: row.get(3)?,
                    created_at: row.get(4)?,
                    status: status.parse().map_err(|e| invalid_column(5, e))?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut items_stmt = conn.prepare(
            "SELECT product_name, total_price, is_rental
             FROM order_items WHERE order_id = ? ORDER BY position",
        )?;
        for order in &mut orders {
            order.items = items_stmt
                .query_map(params![order.id], |row| {
                    Ok(OrderItem {
                        product_name: row.get(0)?,
                        total_price: row.get(1)?,
                        is_rental: row.get::<_, i64>(2)? != 0,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
        }

        Ok(orders)
    }
}

pub(crate) fn insert_order_on(conn: &Connection, order: &Order) -> Result<bool> {
    check_amount("Order", &order.id, order.total_amount)?;
    for item in &order.items {
        check_amount("Order item in", &order.id, item.total_price)?;
    }

    let inserted = conn.execute(
        r#"
        INSERT OR IGNORE INTO orders (id, seller_id, buyer_id, total_amount, created_at, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
        params![
            order.id,
            order.seller_id,
            order.buyer_id,
            order.total_amount,
            order.created_at,
            order.status.as_str(),
        ],
    )?;

    if inserted == 0 {
        return Ok(false);
    }

    for (position, item) in order.items.iter().enumerate() {
        conn.execute(
            r#"
            INSERT INTO order_items (order_id, position, product_name, total_price, is_rental)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                order.id,
                position as i64,
                item.product_name,
                item.total_price,
                item.is_rental as i64,
            ],
        )?;
    }

    Ok(true)
}
