// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::config::Config;
use cashflow::models::{CreateTransactionParams, ListTransactionParams, StatsParams};
use cashflow::{App, Error, db};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn params(r#type: &str, description: &str, amount: f64, date: &str) -> CreateTransactionParams {
    CreateTransactionParams {
        r#type: r#type.into(),
        description: description.into(),
        amount,
        transaction_date: date.into(),
        ..Default::default()
    }
}

#[test]
fn response_resolves_reference_names() {
    let app = App::open_in_memory().unwrap();
    let rent = app.get_category_by_name("Rent").unwrap();
    let cash = app
        .list_active_payment_methods()
        .unwrap()
        .into_iter()
        .find(|m| m.name == "Cash")
        .unwrap();

    let mut p = params("expense", "Office lease", 1200.0, "2024-04-01");
    p.category_id = Some(rent.id.clone());
    p.payment_method_id = Some(cash.id.clone());
    p.tags = vec!["office".into(), "monthly".into()];
    let t = app.create_transaction(p).unwrap();

    assert_eq!(t.category.as_deref(), Some("Rent"));
    assert_eq!(t.category_id.as_deref(), Some(rent.id.as_str()));
    assert_eq!(t.payment_method.as_deref(), Some("Cash"));
    assert_eq!(t.tags, vec!["office", "monthly"]);
    assert!(t.attachments.is_empty());

    let listed = app
        .list_transactions(&ListTransactionParams::default())
        .unwrap();
    assert_eq!(listed, vec![t]);
}

#[test]
fn response_serialises_absent_values_as_null() {
    let app = App::open_in_memory().unwrap();
    let t = app
        .create_transaction(params("income", "Tip", 5.0, "2024-04-02"))
        .unwrap();
    let v = serde_json::to_value(&t).unwrap();

    assert_eq!(v["category"], json!(null));
    assert_eq!(v["customer_vendor"], json!(null));
    assert_eq!(v["recurring_end_date"], json!(null));
    assert_eq!(v["transaction_date"], json!("2024-04-02"));
    assert_eq!(v["tags"], json!([]));
    assert_eq!(v["net_amount"], json!(5.0));
}

#[test]
fn create_accepts_frontend_json() {
    let app = App::open_in_memory().unwrap();
    let rent = app.get_category_by_name("Rent").unwrap();
    let p: CreateTransactionParams = serde_json::from_value(json!({
        "type": "expense",
        "description": "Storage unit",
        "amount": 90.0,
        "transaction_date": "2024-04-03",
        "category": rent.id,
        "tags": ["storage"],
        "tax_amount": 9.0
    }))
    .unwrap();
    let t = app.create_transaction(p).unwrap();
    assert_eq!(t.category.as_deref(), Some("Rent"));
    assert_eq!(t.net_amount, 99.0);
}

#[test]
fn malformed_tags_decode_to_empty() {
    let app = App::from_connection(db::open_in_memory().unwrap());
    let mut p = params("sale", "Mug", 12.0, "2024-04-04");
    p.tags = vec!["merch".into()];
    let t = app.create_transaction(p).unwrap();

    app.connection()
        .execute(
            "UPDATE transactions SET tags='[\"merch\"', attachments=NULL WHERE id=?1",
            [&t.id],
        )
        .unwrap();
    let t = app.get_transaction(&t.id).unwrap();
    assert!(t.tags.is_empty());
    assert!(t.attachments.is_empty());
}

#[test]
fn update_delete_and_reports_through_app() {
    let app = App::open_in_memory().unwrap();
    let t = app
        .create_transaction(params("sale", "Lamp", 30.0, "2024-04-05"))
        .unwrap();
    let mut p = params("sale", "Lamp", 35.0, "2024-04-05");
    p.payment_status = Some("pending".into());
    let t = app.update_transaction(&t.id, p.into()).unwrap();
    assert_eq!(t.amount, 35.0);

    let stats = app.get_transaction_stats(&StatsParams::default()).unwrap();
    assert_eq!(stats.pending_income, 35.0);
    let groups = app.get_transactions_by_category(&StatsParams::default()).unwrap();
    assert_eq!(groups.len(), 1);

    assert_eq!(app.search_transactions("", "lamp", 0, 0).unwrap().len(), 1);
    assert_eq!(app.get_recent_transactions("", 0).unwrap().len(), 1);
    assert_eq!(
        app.get_description_suggestions("", "sale", "", 0).unwrap()[0].value,
        "Lamp"
    );
    assert!(app.get_customer_vendor_suggestions("", "sale", "", 0).unwrap().is_empty());

    app.delete_transaction(&t.id).unwrap();
    assert!(matches!(
        app.get_transaction(&t.id),
        Err(Error::NotFound("transaction"))
    ));
    let stats = app.get_transaction_stats(&StatsParams::default()).unwrap();
    assert_eq!(stats.total_transactions, 0);
}

#[test]
fn base_currency_setting() {
    let app = App::open_in_memory().unwrap();
    assert_eq!(app.base_currency().unwrap(), "USD");
    app.set_base_currency(" cad ").unwrap();
    assert_eq!(app.base_currency().unwrap(), "CAD");
    let t = app
        .create_transaction(params("income", "Grant", 1000.0, "2024-04-06"))
        .unwrap();
    assert_eq!(t.currency, "CAD");
}

#[test]
fn file_database_reopens_without_duplicating_seeds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(db::DB_FILE_NAME);
    let config = Config::with_db_path(&path);

    let id = {
        let app = App::open(&config).unwrap();
        assert_eq!(app.database_path(), Some(path.as_path()));
        app.create_transaction(params("income", "Deposit", 75.0, "2024-04-07"))
            .unwrap()
            .id
    };
    assert!(path.exists());

    let app = App::open(&config).unwrap();
    assert_eq!(app.get_transaction(&id).unwrap().description, "Deposit");
    assert_eq!(app.list_categories().unwrap().len(), 20);
    assert_eq!(app.list_payment_methods().unwrap().len(), 8);
}

#[test]
fn unusable_path_is_storage_unavailable() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();

    let config = Config::with_db_path(blocker.join("cashflow.sqlite"));
    let err = App::open(&config).err().unwrap();
    assert!(matches!(err, Error::StorageUnavailable(_)), "{err}");
}

#[test]
fn category_and_payment_method_surface() {
    let app = App::open_in_memory().unwrap();
    let travel = app.get_category_by_name("Travel").unwrap();
    assert_eq!(app.get_category(&travel.id).unwrap().name, "Travel");
    assert_eq!(app.list_categories_by_type("expense").unwrap().len(), 17);
    assert_eq!(app.check_category_dependencies(&travel.id).unwrap(), 0);
    app.deactivate_category(&travel.id).unwrap();
    assert_eq!(app.list_active_categories().unwrap().len(), 19);
    app.delete_category(&travel.id).unwrap();

    let m = app
        .create_payment_method(&cashflow::models::PaymentMethodParams {
            name: "Zelle".into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(app.get_payment_method(&m.id).unwrap().name, "Zelle");
    assert_eq!(app.check_payment_method_dependencies(&m.id).unwrap(), 0);
    app.deactivate_payment_method(&m.id).unwrap();
    app.delete_payment_method(&m.id).unwrap();
    assert_eq!(app.list_payment_methods().unwrap().len(), 8);
}
