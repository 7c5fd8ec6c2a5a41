// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::commands::{categories, transactions};
use cashflow::models::{CategoryParams, CreateTransactionParams};
use cashflow::{Error, db};
use rusqlite::Connection;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn consulting() -> CategoryParams {
    CategoryParams {
        name: "Consulting".into(),
        r#type: "income".into(),
        color: Some("#0EA5E9".into()),
        icon: Some("".into()),
        ..Default::default()
    }
}

fn spend_in(conn: &Connection, category_id: &str, date: &str) -> String {
    let p = CreateTransactionParams {
        r#type: "income".into(),
        description: "Advisory".into(),
        amount: 250.0,
        transaction_date: date.into(),
        category_id: Some(category_id.into()),
        ..Default::default()
    };
    transactions::create(conn, p).unwrap().id
}

#[test]
fn seeds_are_present() {
    let conn = setup();
    let all = categories::list(&conn).unwrap();
    assert_eq!(all.len(), 20);
    assert!(all.windows(2).all(|w| w[0].name <= w[1].name));

    let income: Vec<String> = categories::list_by_type(&conn, "income")
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(income, vec!["Other Income", "Sales Revenue", "Service Income"]);
    assert!(categories::list_by_type(&conn, "both").unwrap().is_empty());
}

#[test]
fn create_and_lookup() {
    let conn = setup();
    let c = categories::create(&conn, &consulting()).unwrap();
    assert_eq!(c.name, "Consulting");
    assert!(c.is_active);
    assert_eq!(c.icon, None);

    assert_eq!(categories::get(&conn, &c.id).unwrap(), c);
    assert_eq!(categories::get_by_name(&conn, "Consulting").unwrap().id, c.id);
    assert_eq!(
        categories::name_of(&conn, &c.id).unwrap().as_deref(),
        Some("Consulting")
    );
    assert_eq!(categories::name_of(&conn, "missing").unwrap(), None);
    assert!(categories::get_by_name(&conn, "Nope").unwrap_err().is_not_found());
}

#[test]
fn duplicate_name_and_bad_type_are_constraint_violations() {
    let conn = setup();
    let dup = CategoryParams {
        name: "Rent".into(),
        r#type: "expense".into(),
        ..Default::default()
    };
    let err = categories::create(&conn, &dup).unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation { .. }), "{err}");

    let bad = CategoryParams {
        name: "Gifts".into(),
        r#type: "transfer".into(),
        ..Default::default()
    };
    let err = categories::create(&conn, &bad).unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation { .. }), "{err}");
}

#[test]
fn update_replaces_fields() {
    let conn = setup();
    let c = categories::create(&conn, &consulting()).unwrap();
    let p = CategoryParams {
        name: "Advisory".into(),
        r#type: "both".into(),
        ..Default::default()
    };
    let updated = categories::update(&conn, &c.id, &p).unwrap();
    assert_eq!(updated.name, "Advisory");
    assert_eq!(updated.r#type, "both");
    assert_eq!(updated.color, None);

    let err = categories::update(&conn, "missing", &p).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_refused_while_live_transactions_reference_it() {
    let conn = setup();
    let c = categories::create(&conn, &consulting()).unwrap();
    let first = spend_in(&conn, &c.id, "2024-01-01");
    let second = spend_in(&conn, &c.id, "2024-01-02");

    assert_eq!(categories::dependencies(&conn, &c.id).unwrap(), 2);
    let err = categories::delete(&conn, &c.id).unwrap_err();
    assert!(matches!(
        err,
        Error::DependencyConflict {
            entity: "category",
            count: 2
        }
    ));

    transactions::delete(&conn, &first).unwrap();
    transactions::delete(&conn, &second).unwrap();
    assert_eq!(categories::dependencies(&conn, &c.id).unwrap(), 0);

    categories::delete(&conn, &c.id).unwrap();
    assert!(categories::get(&conn, &c.id).unwrap_err().is_not_found());

    let orphaned: Option<String> = conn
        .query_row(
            "SELECT category_id FROM transactions WHERE id=?1",
            [&first],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(orphaned, None);
}

#[test]
fn delete_unreferenced_and_unknown() {
    let conn = setup();
    let c = categories::create(&conn, &consulting()).unwrap();
    categories::delete(&conn, &c.id).unwrap();
    let err = categories::delete(&conn, &c.id).unwrap_err();
    assert!(matches!(err, Error::NotFound("category")));
}

#[test]
fn deactivate_ignores_dependencies() {
    let conn = setup();
    let c = categories::create(&conn, &consulting()).unwrap();
    spend_in(&conn, &c.id, "2024-01-01");

    categories::deactivate(&conn, &c.id).unwrap();
    assert!(!categories::get(&conn, &c.id).unwrap().is_active);
    let active = categories::list_active(&conn).unwrap();
    assert_eq!(active.len(), 20);
    assert!(active.iter().all(|a| a.id != c.id));

    assert!(categories::deactivate(&conn, "missing").unwrap_err().is_not_found());
}
