// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StorageContext};
use crate::models::SuggestionItem;
use crate::utils::{like_pattern, limit_or, sql_count, user_or_default};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Prior descriptions for the transaction type, most used first.
pub fn descriptions(
    conn: &Connection,
    created_by: &str,
    r#type: &str,
    search: &str,
    limit: usize,
) -> Result<Vec<SuggestionItem>> {
    ranked(conn, "description", created_by, r#type, search, limit)
        .storage_context("failed to get description suggestions")
}

/// Prior customers/vendors for the transaction type, most used first.
pub fn customer_vendors(
    conn: &Connection,
    created_by: &str,
    r#type: &str,
    search: &str,
    limit: usize,
) -> Result<Vec<SuggestionItem>> {
    ranked(conn, "customer_vendor", created_by, r#type, search, limit)
        .storage_context("failed to get customer/vendor suggestions")
}

/// Distinct values of `column`, ranked by how often they occur. Ties go to
/// the value used most recently, then alphabetical order.
fn ranked(
    conn: &Connection,
    column: &str,
    created_by: &str,
    r#type: &str,
    search: &str,
    limit: usize,
) -> rusqlite::Result<Vec<SuggestionItem>> {
    let mut sql = format!(
        "SELECT {col}, COUNT(*) AS frequency FROM transactions
         WHERE created_by = ? AND deleted_at IS NULL
           AND {col} IS NOT NULL AND trim({col}) <> ''",
        col = column
    );
    let mut values = vec![Value::Text(user_or_default(created_by).to_string())];

    let r#type = r#type.trim();
    if !r#type.is_empty() {
        sql.push_str(" AND type = ?");
        values.push(Value::Text(r#type.to_string()));
    }
    let search = search.trim();
    if !search.is_empty() {
        sql.push_str(&format!(" AND {} LIKE ? ESCAPE '\\'", column));
        values.push(Value::Text(like_pattern(search)));
    }
    sql.push_str(&format!(
        " GROUP BY {col} ORDER BY frequency DESC, MAX(transaction_date) DESC, {col} ASC LIMIT ?",
        col = column
    ));
    values.push(Value::Integer(sql_count(limit_or(
        limit,
        DEFAULT_SUGGESTION_LIMIT,
    ))));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |r| {
        Ok(SuggestionItem {
            value: r.get(0)?,
            frequency: r.get(1)?,
        })
    })?;
    rows.collect()
}
