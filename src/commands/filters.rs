// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dynamic predicate composition for transaction listings.
//!
//! Each supplied filter adds one `AND` clause with bound parameters; a filter
//! that is absent (or an empty set) adds nothing.

use super::transactions::{COLUMNS, ORDER_BY, query_transactions};
use crate::error::Result;
use crate::models::{ListTransactionParams, Transaction};
use crate::utils::{
    like_pattern, limit_or, parse_optional_date, placeholders, sql_count, user_or_default,
};
use rusqlite::Connection;
use rusqlite::types::Value;

pub const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Default)]
struct Predicates {
    sql: String,
    values: Vec<Value>,
}

impl Predicates {
    fn push(&mut self, clause: &str, value: Value) {
        self.sql.push_str(" AND ");
        self.sql.push_str(clause);
        self.values.push(value);
    }

    /// `column IN (?, ...)`; skipped for an empty set.
    fn push_set(&mut self, column: &str, allowed: &[String]) {
        let allowed: Vec<&str> = allowed
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if allowed.is_empty() {
            return;
        }
        self.sql.push_str(&format!(
            " AND {} IN ({})",
            column,
            placeholders(allowed.len())
        ));
        self.values
            .extend(allowed.into_iter().map(|s| Value::Text(s.to_string())));
    }

    fn push_like(&mut self, column: &str, term: Option<&str>) {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            self.push(
                &format!("{} LIKE ? ESCAPE '\\'", column),
                Value::Text(like_pattern(term)),
            );
        }
    }

    fn push_bound(&mut self, clause: &str, bound: Option<f64>) {
        if let Some(b) = bound {
            self.push(clause, Value::Real(b));
        }
    }

    fn push_flag(&mut self, when_true: &str, when_false: &str, flag: Option<bool>) {
        match flag {
            Some(true) => self.sql.push_str(&format!(" AND {}", when_true)),
            Some(false) => self.sql.push_str(&format!(" AND {}", when_false)),
            None => {}
        }
    }

    /// Any-of match against the JSON array held in `tags`.
    fn push_tags(&mut self, tags: &[String]) {
        let tags: Vec<&str> = tags
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if tags.is_empty() {
            return;
        }
        self.sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM json_each(CASE WHEN json_valid(t.tags) THEN t.tags ELSE '[]' END) j
               WHERE j.value IN ({}))",
            placeholders(tags.len())
        ));
        self.values
            .extend(tags.into_iter().map(|s| Value::Text(s.to_string())));
    }
}

fn build(p: &ListTransactionParams) -> Result<Predicates> {
    let mut preds = Predicates::default();
    preds.push(
        "t.created_by = ?",
        Value::Text(user_or_default(&p.created_by).to_string()),
    );

    if let Some(from) = parse_optional_date(p.from_date.as_deref())? {
        preds.push("t.transaction_date >= ?", Value::Text(from.to_string()));
    }
    if let Some(to) = parse_optional_date(p.to_date.as_deref())? {
        preds.push("t.transaction_date <= ?", Value::Text(to.to_string()));
    }

    preds.push_set("t.type", &p.types);
    preds.push_set("t.category_id", &p.categories);
    preds.push_set("t.payment_status", &p.payment_statuses);
    preds.push_set("t.payment_method_id", &p.payment_methods);
    preds.push_tags(&p.tags);

    preds.push_like("t.customer_vendor", p.customer_vendor.as_deref());
    preds.push_like("t.description", p.description.as_deref());
    preds.push_like("t.reference_number", p.reference_number.as_deref());
    preds.push_like("t.invoice_number", p.invoice_number.as_deref());

    preds.push_bound("t.amount >= ?", p.min_amount);
    preds.push_bound("t.amount <= ?", p.max_amount);
    preds.push_bound("t.due_amount >= ?", p.min_due_amount);
    preds.push_bound("t.due_amount <= ?", p.max_due_amount);

    preds.push_flag("t.is_recurring = 1", "t.is_recurring = 0", p.is_recurring);
    preds.push_flag("t.tax_amount > 0", "t.tax_amount = 0", p.has_tax);
    preds.push_flag("t.discount_amount > 0", "t.discount_amount = 0", p.has_discount);

    Ok(preds)
}

/// Live rows for the user matching every supplied filter, most recent first.
pub fn list(conn: &Connection, p: &ListTransactionParams) -> Result<Vec<Transaction>> {
    let mut preds = build(p)?;
    let limit = limit_or(p.limit, DEFAULT_LIST_LIMIT);

    let mut sql = format!(
        "SELECT {} FROM transactions t WHERE t.deleted_at IS NULL{}",
        COLUMNS, preds.sql
    );
    sql.push_str(ORDER_BY);
    sql.push_str(" LIMIT ? OFFSET ?");
    preds.values.push(Value::Integer(sql_count(limit)));
    preds.values.push(Value::Integer(sql_count(p.offset)));

    tracing::debug!("listing transactions: {}", sql);
    query_transactions(conn, &sql, preds.values, "failed to list transactions")
}
