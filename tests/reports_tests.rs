// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashflow::commands::{categories, reports, transactions};
use cashflow::db;
use cashflow::models::{CreateTransactionParams, StatsParams, TransactionStats};
use rusqlite::Connection;

fn setup() -> Connection {
    db::open_in_memory().unwrap()
}

fn add(
    conn: &Connection,
    r#type: &str,
    amount: f64,
    date: &str,
    status: &str,
    category: Option<&str>,
) -> String {
    let category_id = category.map(|name| categories::get_by_name(conn, name).unwrap().id);
    let p = CreateTransactionParams {
        r#type: r#type.into(),
        description: format!("{} {}", r#type, amount),
        amount,
        transaction_date: date.into(),
        payment_status: Some(status.into()),
        category_id,
        ..Default::default()
    };
    transactions::create(conn, p).unwrap().id
}

#[test]
fn stats_on_empty_set_are_zero() {
    let conn = setup();
    let stats = reports::stats(&conn, &StatsParams::default()).unwrap();
    assert_eq!(stats, TransactionStats::default());
}

#[test]
fn stats_split_income_and_expense_sides() {
    let conn = setup();
    add(&conn, "income", 100.0, "2024-01-05", "completed", None);
    add(&conn, "sale", 30.0, "2024-01-06", "pending", None);
    add(&conn, "expense", 50.0, "2024-01-07", "pending", None);
    add(&conn, "purchase", 20.0, "2024-01-08", "completed", None);
    let gone = add(&conn, "income", 1000.0, "2024-01-09", "pending", None);
    transactions::delete(&conn, &gone).unwrap();

    let stats = reports::stats(&conn, &StatsParams::default()).unwrap();
    assert_eq!(stats.total_income, 130.0);
    assert_eq!(stats.total_expenses, 70.0);
    assert_eq!(stats.net_profit, 60.0);
    assert_eq!(stats.total_transactions, 4);
    assert_eq!(stats.total_income_count, 2);
    assert_eq!(stats.total_expense_count, 2);
    assert_eq!(stats.average_transaction, 50.0);
    assert_eq!(stats.pending_income, 30.0);
    assert_eq!(stats.pending_expenses, 50.0);
}

#[test]
fn stats_respect_date_range() {
    let conn = setup();
    add(&conn, "income", 100.0, "2023-12-31", "completed", None);
    add(&conn, "income", 40.0, "2024-01-01", "completed", None);
    add(&conn, "expense", 10.0, "2024-01-31", "completed", None);
    add(&conn, "expense", 99.0, "2024-02-01", "completed", None);

    let p = StatsParams {
        from_date: Some("2024-01-01".into()),
        to_date: Some("2024-01-31".into()),
        ..Default::default()
    };
    let stats = reports::stats(&conn, &p).unwrap();
    assert_eq!(stats.total_transactions, 2);
    assert_eq!(stats.total_income, 40.0);
    assert_eq!(stats.total_expenses, 10.0);
}

#[test]
fn decimal_accumulation_avoids_float_drift() {
    let conn = setup();
    add(&conn, "income", 0.1, "2024-01-01", "completed", None);
    add(&conn, "income", 0.2, "2024-01-02", "completed", None);
    let stats = reports::stats(&conn, &StatsParams::default()).unwrap();
    assert_eq!(stats.total_income, 0.3);
}

#[test]
fn by_category_groups_and_orders_by_total() {
    let conn = setup();
    add(&conn, "expense", 500.0, "2024-01-01", "completed", Some("Rent"));
    add(&conn, "expense", 300.0, "2024-02-01", "completed", Some("Rent"));
    add(&conn, "income", 200.0, "2024-01-15", "completed", None);
    add(&conn, "expense", 40.0, "2024-01-20", "completed", Some("Travel"));
    let gone = add(&conn, "expense", 1000.0, "2024-01-21", "completed", Some("Travel"));
    transactions::delete(&conn, &gone).unwrap();

    let rows = reports::by_category(&conn, &StatsParams::default()).unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].category, "Rent");
    assert_eq!(rows[0].r#type, "expense");
    assert_eq!(rows[0].count, 2);
    assert_eq!(rows[0].total_amount, 800.0);
    assert!(rows[0].category_id.is_some());

    assert_eq!(rows[1].category, reports::UNCATEGORIZED);
    assert_eq!(rows[1].category_id, None);
    assert_eq!(rows[1].total_amount, 200.0);

    assert_eq!(rows[2].category, "Travel");
    assert_eq!(rows[2].count, 1);
    assert_eq!(rows[2].total_amount, 40.0);
}

#[test]
fn by_category_splits_types_within_a_category() {
    let conn = setup();
    add(&conn, "expense", 60.0, "2024-01-01", "completed", Some("Other Income"));
    add(&conn, "income", 60.0, "2024-01-02", "completed", Some("Other Income"));

    let rows = reports::by_category(&conn, &StatsParams::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].r#type, "expense");
    assert_eq!(rows[1].r#type, "income");
}

fn close_to(actual: f64, expected: f64) -> bool {
    ((actual - expected) / expected).abs() < 1e-9
}

#[test]
fn totals_past_decimal_range_keep_counting() {
    let conn = setup();
    add(&conn, "income", 5e28, "2024-01-01", "pending", Some("Rent"));
    add(&conn, "income", 5e28, "2024-01-02", "pending", Some("Rent"));
    add(&conn, "expense", 1.0, "2024-01-03", "completed", None);

    let stats = reports::stats(&conn, &StatsParams::default()).unwrap();
    assert!(close_to(stats.total_income, 1e29), "{}", stats.total_income);
    assert!(close_to(stats.pending_income, 1e29));
    assert!(close_to(stats.net_profit, 1e29));
    assert!(close_to(stats.average_transaction, 1e29 / 3.0));
    assert_eq!(stats.total_expenses, 1.0);

    let rows = reports::by_category(&conn, &StatsParams::default()).unwrap();
    assert_eq!(rows[0].category, "Rent");
    assert_eq!(rows[0].count, 2);
    assert!(close_to(rows[0].total_amount, 1e29));
}

#[test]
fn amounts_beyond_decimal_are_not_dropped() {
    let conn = setup();
    add(&conn, "income", 1e30, "2024-01-01", "completed", None);
    add(&conn, "income", 2.0, "2024-01-02", "completed", None);

    let stats = reports::stats(&conn, &StatsParams::default()).unwrap();
    assert!(close_to(stats.total_income, 1e30), "{}", stats.total_income);
    assert_eq!(stats.total_income_count, 2);

    let rows = reports::by_category(&conn, &StatsParams::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(close_to(rows[0].total_amount, 1e30));
}
