// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result, StorageContext};
use crate::models::DEFAULT_USER;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

pub const DEFAULT_CURRENCY: &str = "USD";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Absent or blank means "no date"; anything else must parse.
pub fn parse_optional_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    match s.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_date(s).map(Some),
        None => Ok(None),
    }
}

/// Blank optional text from the frontend is stored as NULL.
pub fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn user_or_default(created_by: &str) -> &str {
    let trimmed = created_by.trim();
    if trimmed.is_empty() {
        DEFAULT_USER
    } else {
        trimmed
    }
}

pub fn limit_or(limit: usize, default: usize) -> usize {
    if limit == 0 { default } else { limit }
}

/// Serialize a string list for a TEXT column. Never fails: anything that
/// cannot be encoded is stored as an empty list.
pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|err| {
        tracing::warn!("could not encode list, storing empty: {}", err);
        "[]".to_string()
    })
}

/// Inverse of [`encode_list`]. NULL, blank or malformed text yields an empty list.
pub fn decode_list(raw: Option<&str>) -> Vec<String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => serde_json::from_str(s).unwrap_or_else(|err| {
            tracing::debug!("malformed list column '{}': {}", s, err);
            Vec::new()
        }),
        None => Vec::new(),
    }
}

/// `%term%` for a LIKE ... ESCAPE '\' predicate, with the user's own
/// wildcards matched literally.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

/// `?, ?, ?` for an IN list of `n` bound values.
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// SQLite integer for a LIMIT/OFFSET count; values beyond `i64` saturate.
pub fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// Base currency settings
pub fn get_base_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='base_currency'",
            [],
            |r| r.get(0),
        )
        .optional()
        .storage_context("failed to read base currency")?;
    Ok(v.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
}

pub fn set_base_currency(conn: &Connection, ccy: &str) -> Result<()> {
    let ccy = ccy.trim().to_uppercase();
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('base_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )
    .storage_context("failed to set base currency")?;
    tracing::info!("base currency set to {}", ccy);
    Ok(())
}
