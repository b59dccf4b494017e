//! Database tests

use super::*;
use crate::error::Error;
use crate::models::*;
use crate::store::{ContractStore, OrderStore, TransactionStore};
use crate::test_utils::{sample_records, NOW, T0};

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_transactions("u1").unwrap().is_empty());
    assert!(db.path().contains("farmledger_test_"));
}

#[test]
fn test_in_memory_dbs_are_isolated() {
    let a = Database::in_memory().unwrap();
    let b = Database::in_memory().unwrap();

    a.insert_transaction(&Transaction::income("t1", "u1", 1.0, T0, IncomeCategory::CropSales))
        .unwrap();

    assert_eq!(a.count_transactions("u1").unwrap(), 1);
    assert_eq!(b.count_transactions("u1").unwrap(), 0);
}

#[test]
fn test_in_memory_file_removed_with_last_clone() {
    let db = Database::in_memory().unwrap();
    let path = std::path::PathBuf::from(db.path());
    assert!(path.exists());

    let clone = db.clone();
    drop(db);
    assert!(path.exists());

    drop(clone);
    assert!(!path.exists());
    assert!(!path.parent().unwrap().exists());
}

#[test]
fn test_transaction_round_trip() {
    let db = Database::in_memory().unwrap();
    let income = Transaction {
        kind: TransactionKind::Income {
            category: IncomeCategory::CropSales,
            quantity: Some(10.0),
            price_per_unit: Some(250.0),
        },
        ..Transaction::income("t1", "u1", 2_500.0, T0, IncomeCategory::CropSales)
    }
    .with_crop("Cotton")
    .with_description("10 quintal cotton");
    let expense = Transaction::expense("t2", "u1", 400.0, T0 + 1, ExpenseCategory::Irrigation)
        .with_vendor("Pump repairs");

    assert!(db.insert_transaction(&income).unwrap());
    assert!(db.insert_transaction(&expense).unwrap());

    let listed = db.list_transactions("u1").unwrap();
    assert_eq!(listed, vec![income, expense]);
}

#[test]
fn test_duplicate_transaction_is_skipped() {
    let db = Database::in_memory().unwrap();
    let tx = Transaction::income("t1", "u1", 1.0, T0, IncomeCategory::CropSales);

    assert!(db.insert_transaction(&tx).unwrap());
    assert!(!db.insert_transaction(&tx).unwrap());
    assert_eq!(db.count_transactions("u1").unwrap(), 1);
}

#[test]
fn test_negative_amount_rejected() {
    let db = Database::in_memory().unwrap();
    let tx = Transaction::expense("t1", "u1", -5.0, T0, ExpenseCategory::Fuel);

    let err = db.insert_transaction(&tx).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)));
}

#[test]
fn test_delete_transaction() {
    let db = Database::in_memory().unwrap();
    db.insert_transaction(&Transaction::income("t1", "u1", 1.0, T0, IncomeCategory::CropSales))
        .unwrap();

    assert!(db.delete_transaction("t1").unwrap());
    assert!(!db.delete_transaction("t1").unwrap());
    assert!(db.list_transactions("u1").unwrap().is_empty());
}

#[test]
fn test_order_round_trip_keeps_item_order() {
    let db = Database::in_memory().unwrap();
    let order = Order::new("o1", "seller", "buyer", T0)
        .with_item("NPK Fertilizer", 1000.0)
        .with_rental_item("Tractor equipment", 300.0)
        .with_item("Garden Hoe", 500.0)
        .with_status(OrderStatus::Delivered);

    assert!(db.insert_order(&order).unwrap());

    assert_eq!(db.list_orders_sold_by("seller").unwrap(), vec![order.clone()]);
    assert_eq!(db.list_orders_bought_by("buyer").unwrap(), vec![order]);
    assert!(db.list_orders_sold_by("buyer").unwrap().is_empty());
}

#[test]
fn test_contract_round_trip() {
    let db = Database::in_memory().unwrap();
    let contract = Contract::new("c1", "farmer", "mill")
        .with_title("Rice supply")
        .with_payment("p1", 5_000.0, T0)
        .with_payment("p2", 2_500.0, T0 + 10);

    assert!(db.insert_contract(&contract).unwrap());

    assert_eq!(db.list_contracts_for_party("farmer").unwrap(), vec![contract.clone()]);
    assert_eq!(db.list_contracts_for_party("mill").unwrap(), vec![contract]);
    assert!(db.list_contracts_for_party("other").unwrap().is_empty());
}

#[test]
fn test_add_contract_payment() {
    let db = Database::in_memory().unwrap();
    db.insert_contract(&Contract::new("c1", "farmer", "mill")).unwrap();
    db.add_contract_payment("c1", "p1", &ContractPayment { amount: 100.0, date: T0 })
        .unwrap();

    let contracts = db.list_contracts_for_party("farmer").unwrap();
    assert_eq!(contracts[0].payments["p1"].amount, 100.0);
}

#[test]
fn test_payment_for_unknown_contract_fails() {
    let db = Database::in_memory().unwrap();
    let result = db.add_contract_payment("missing", "p1", &ContractPayment { amount: 1.0, date: T0 });
    assert!(result.is_err());
}

#[test]
fn test_import_records() {
    let db = Database::in_memory().unwrap();
    let records = sample_records("farmer-1", NOW);

    let stats = db.import_records(&records).unwrap();
    assert_eq!(stats.transactions, 12);
    assert_eq!(stats.orders, 2);
    assert_eq!(stats.contracts, 1);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.imported(), 15);

    // Second import is a no-op
    let again = db.import_records(&records).unwrap();
    assert_eq!(again.imported(), 0);
    assert_eq!(again.skipped, 15);
}

#[test]
fn test_import_is_atomic() {
    let db = Database::in_memory().unwrap();
    let records = LedgerRecords {
        transactions: vec![
            Transaction::income("ok", "u1", 1.0, T0, IncomeCategory::CropSales),
            Transaction::income("bad", "u1", f64::NAN, T0, IncomeCategory::CropSales),
        ],
        ..Default::default()
    };

    assert!(db.import_records(&records).is_err());
    assert_eq!(db.count_transactions("u1").unwrap(), 0);
}

#[test]
fn test_import_json() {
    let db = Database::in_memory().unwrap();
    let json = r#"{
        "transactions": [
            {"id": "t1", "user_id": "u1", "amount": 100.0, "date": 1700000000000,
             "kind": "expense", "category": "seeds", "vendor": "Seed Co"}
        ],
        "orders": [
            {"id": "o1", "seller_id": "u1", "buyer_id": "b", "total_amount": 50.0,
             "created_at": 1700000000000, "status": "out_for_delivery",
             "items": [{"product_name": "Onions", "total_price": 50.0}]}
        ]
    }"#;

    let stats = db.import_json(json).unwrap();
    assert_eq!(stats.transactions, 1);
    assert_eq!(stats.orders, 1);

    let orders = db.list_orders_sold_by("u1").unwrap();
    assert_eq!(orders[0].status, OrderStatus::OutForDelivery);
    assert!(!orders[0].items[0].is_rental);
}

#[test]
fn test_import_json_every_order_status() {
    let db = Database::in_memory().unwrap();

    for (i, status) in OrderStatus::ALL.iter().enumerate() {
        let json = format!(
            r#"{{"orders": [{{"id": "o{}", "seller_id": "u1", "buyer_id": "b",
                "total_amount": 10.0, "created_at": 1700000000000, "status": "{}"}}]}}"#,
            i,
            status.as_str()
        );
        let stats = db.import_json(&json).unwrap();
        assert_eq!(stats.orders, 1, "status {} was not imported", status);
    }

    let orders = db.list_orders_sold_by("u1").unwrap();
    assert_eq!(orders.len(), OrderStatus::ALL.len());
    for status in OrderStatus::ALL {
        assert!(orders.iter().any(|o| o.status == status));
    }
}

#[tokio::test]
async fn test_store_traits() {
    let db = Database::in_memory().unwrap();
    db.import_records(&sample_records("farmer-1", NOW)).unwrap();

    assert_eq!(db.list_by_user("farmer-1").await.unwrap().len(), 12);
    assert_eq!(db.list_sold_by("farmer-1").await.unwrap().len(), 1);
    assert_eq!(db.list_bought_by("farmer-1").await.unwrap().len(), 1);
    assert_eq!(db.list_by_party("farmer-1").await.unwrap().len(), 1);
    assert!(db.list_by_user("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_errors_are_storage_unavailable() {
    let db = Database::in_memory().unwrap();
    db.conn()
        .unwrap()
        .execute_batch("DROP TABLE contract_payments; DROP TABLE contracts;")
        .unwrap();

    let err = db.list_by_party("u1").await.unwrap_err();
    assert!(matches!(err, Error::StorageUnavailable(_)));
}
