// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result, StorageContext};
use crate::models::{CreateTransactionParams, Transaction, UpdateTransactionParams};
use crate::utils::{
    encode_list, get_base_currency, like_pattern, limit_or, non_empty, parse_date,
    parse_optional_date, sql_count, user_or_default,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

pub const DEFAULT_SEARCH_LIMIT: usize = 50;
pub const DEFAULT_RECENT_LIMIT: usize = 10;

const SEARCH_COLUMNS: [&str; 5] = [
    "t.description",
    "t.customer_vendor",
    "t.reference_number",
    "t.invoice_number",
    "t.notes",
];

pub(crate) const COLUMNS: &str = "t.id, t.type, t.description, t.amount, t.transaction_date, \
     t.category_id, t.tags, t.customer_vendor, t.payment_method_id, t.payment_status, \
     t.reference_number, t.invoice_number, t.notes, t.attachments, t.tax_amount, \
     t.discount_amount, t.due_amount, t.net_amount, t.currency, t.exchange_rate, \
     t.is_recurring, t.recurring_frequency, t.recurring_end_date, t.parent_transaction_id, \
     t.created_by, t.created_at, t.updated_at, t.deleted_at";

/// Most recent first. Within a day, later inserts come first: rowid grows
/// with each insert, which second-resolution created_at cannot order.
pub(crate) const ORDER_BY: &str =
    " ORDER BY t.transaction_date DESC, t.created_at DESC, t.rowid DESC";

pub(crate) fn map_row(r: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        r#type: r.get(1)?,
        description: r.get(2)?,
        amount: r.get(3)?,
        transaction_date: r.get(4)?,
        category_id: r.get(5)?,
        tags: r.get(6)?,
        customer_vendor: r.get(7)?,
        payment_method_id: r.get(8)?,
        payment_status: r.get(9)?,
        reference_number: r.get(10)?,
        invoice_number: r.get(11)?,
        notes: r.get(12)?,
        attachments: r.get(13)?,
        tax_amount: r.get(14)?,
        discount_amount: r.get(15)?,
        due_amount: r.get(16)?,
        net_amount: r.get(17)?,
        currency: r.get(18)?,
        exchange_rate: r.get(19)?,
        is_recurring: r.get(20)?,
        recurring_frequency: r.get(21)?,
        recurring_end_date: r.get(22)?,
        parent_transaction_id: r.get(23)?,
        created_by: r.get(24)?,
        created_at: r.get(25)?,
        updated_at: r.get(26)?,
        deleted_at: r.get(27)?,
    })
}

/// Run a `SELECT {COLUMNS} FROM transactions t ...` statement.
pub(crate) fn query_transactions(
    conn: &Connection,
    sql: &str,
    values: Vec<Value>,
    context: &str,
) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql).storage_context(context)?;
    let rows = stmt
        .query_map(params_from_iter(values), map_row)
        .storage_context(context)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row.storage_context(context)?);
    }
    Ok(data)
}

/// Column values shared by insert and update, after defaults and parsing.
struct WriteValues {
    transaction_date: NaiveDate,
    category_id: Option<String>,
    tags: String,
    customer_vendor: Option<String>,
    payment_method_id: Option<String>,
    payment_status: String,
    reference_number: Option<String>,
    invoice_number: Option<String>,
    notes: Option<String>,
    attachments: String,
    currency: String,
    exchange_rate: f64,
    recurring_frequency: Option<String>,
    recurring_end_date: Option<NaiveDate>,
}

fn write_values(conn: &Connection, p: &UpdateTransactionParams) -> Result<WriteValues> {
    let transaction_date = parse_date(&p.transaction_date)?;
    let recurring_end_date = parse_optional_date(p.recurring_end_date.as_deref())?;
    let currency = match non_empty(p.currency.as_deref()) {
        Some(c) => c.to_uppercase(),
        None => get_base_currency(conn)?,
    };
    let exchange_rate = match p.exchange_rate {
        Some(r) if r != 0.0 => r,
        _ => 1.0,
    };
    Ok(WriteValues {
        transaction_date,
        category_id: non_empty(p.category_id.as_deref()),
        tags: encode_list(&p.tags),
        customer_vendor: non_empty(p.customer_vendor.as_deref()),
        payment_method_id: non_empty(p.payment_method_id.as_deref()),
        payment_status: non_empty(p.payment_status.as_deref())
            .unwrap_or_else(|| "completed".to_string()),
        reference_number: non_empty(p.reference_number.as_deref()),
        invoice_number: non_empty(p.invoice_number.as_deref()),
        notes: non_empty(p.notes.as_deref()),
        attachments: encode_list(&p.attachments),
        currency,
        exchange_rate,
        recurring_frequency: non_empty(p.recurring_frequency.as_deref()),
        recurring_end_date,
    })
}

pub fn create(conn: &Connection, params: CreateTransactionParams) -> Result<Transaction> {
    let created_by = user_or_default(&params.created_by).to_string();
    let parent_transaction_id = non_empty(params.parent_transaction_id.as_deref());
    let p = UpdateTransactionParams::from(params);
    let v = write_values(conn, &p)?;

    let id: String = conn
        .query_row(
            "INSERT INTO transactions(type, description, amount, transaction_date, category_id,
                tags, customer_vendor, payment_method_id, payment_status, reference_number,
                invoice_number, notes, attachments, tax_amount, discount_amount, due_amount,
                currency, exchange_rate, is_recurring, recurring_frequency, recurring_end_date,
                parent_transaction_id, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                ?17, ?18, ?19, ?20, ?21, ?22, ?23)
             RETURNING id",
            params![
                p.r#type,
                p.description,
                p.amount,
                v.transaction_date,
                v.category_id,
                v.tags,
                v.customer_vendor,
                v.payment_method_id,
                v.payment_status,
                v.reference_number,
                v.invoice_number,
                v.notes,
                v.attachments,
                p.tax_amount,
                p.discount_amount,
                p.due_amount,
                v.currency,
                v.exchange_rate,
                p.is_recurring,
                v.recurring_frequency,
                v.recurring_end_date,
                parent_transaction_id,
                created_by,
            ],
            |r| r.get(0),
        )
        .storage_context("failed to create transaction")?;

    tracing::info!(
        "recorded {} '{}' of {} on {} ({})",
        p.r#type,
        p.description,
        p.amount,
        v.transaction_date,
        id
    );
    get(conn, &id)
}

pub fn get(conn: &Connection, id: &str) -> Result<Transaction> {
    let sql = format!(
        "SELECT {} FROM transactions t WHERE t.id=?1 AND t.deleted_at IS NULL",
        COLUMNS
    );
    conn.query_row(&sql, params![id], map_row)
        .optional()
        .storage_context("failed to get transaction")?
        .ok_or(Error::NotFound("transaction"))
}

pub fn update(conn: &Connection, id: &str, p: UpdateTransactionParams) -> Result<Transaction> {
    let v = write_values(conn, &p)?;
    let changed = conn
        .execute(
            "UPDATE transactions SET type=?2, description=?3, amount=?4, transaction_date=?5,
                category_id=?6, tags=?7, customer_vendor=?8, payment_method_id=?9,
                payment_status=?10, reference_number=?11, invoice_number=?12, notes=?13,
                attachments=?14, tax_amount=?15, discount_amount=?16, due_amount=?17,
                currency=?18, exchange_rate=?19, is_recurring=?20, recurring_frequency=?21,
                recurring_end_date=?22, updated_at=CURRENT_TIMESTAMP
             WHERE id=?1 AND deleted_at IS NULL",
            params![
                id,
                p.r#type,
                p.description,
                p.amount,
                v.transaction_date,
                v.category_id,
                v.tags,
                v.customer_vendor,
                v.payment_method_id,
                v.payment_status,
                v.reference_number,
                v.invoice_number,
                v.notes,
                v.attachments,
                p.tax_amount,
                p.discount_amount,
                p.due_amount,
                v.currency,
                v.exchange_rate,
                p.is_recurring,
                v.recurring_frequency,
                v.recurring_end_date,
            ],
        )
        .storage_context("failed to update transaction")?;
    if changed == 0 {
        return Err(Error::NotFound("transaction"));
    }
    tracing::info!("updated transaction {}", id);
    get(conn, id)
}

/// Soft delete: the row stays in the table but disappears from every read.
pub fn delete(conn: &Connection, id: &str) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE transactions SET deleted_at=CURRENT_TIMESTAMP, updated_at=CURRENT_TIMESTAMP
             WHERE id=?1 AND deleted_at IS NULL",
            params![id],
        )
        .storage_context("failed to delete transaction")?;
    if changed == 0 {
        return Err(Error::NotFound("transaction"));
    }
    tracing::info!("deleted transaction {}", id);
    Ok(())
}

pub fn recent(conn: &Connection, created_by: &str, limit: usize) -> Result<Vec<Transaction>> {
    let limit = limit_or(limit, DEFAULT_RECENT_LIMIT);
    let sql = format!(
        "SELECT {} FROM transactions t WHERE t.created_by=? AND t.deleted_at IS NULL{} LIMIT ?",
        COLUMNS, ORDER_BY
    );
    let values = vec![
        Value::Text(user_or_default(created_by).to_string()),
        Value::Integer(sql_count(limit)),
    ];
    query_transactions(conn, &sql, values, "failed to get recent transactions")
}

/// Substring search across the free-text columns. A blank term matches
/// every live row.
pub fn search(
    conn: &Connection,
    created_by: &str,
    term: &str,
    limit: usize,
    offset: usize,
) -> Result<Vec<Transaction>> {
    let limit = limit_or(limit, DEFAULT_SEARCH_LIMIT);
    let mut sql = format!(
        "SELECT {} FROM transactions t WHERE t.created_by=? AND t.deleted_at IS NULL",
        COLUMNS
    );
    let mut values = vec![Value::Text(user_or_default(created_by).to_string())];

    let term = term.trim();
    if !term.is_empty() {
        let pattern = like_pattern(term);
        let clauses: Vec<String> = SEARCH_COLUMNS
            .iter()
            .map(|col| format!("{} LIKE ? ESCAPE '\\'", col))
            .collect();
        sql.push_str(&format!(" AND ({})", clauses.join(" OR ")));
        values.extend(SEARCH_COLUMNS.iter().map(|_| Value::Text(pattern.clone())));
    }
    sql.push_str(ORDER_BY);
    sql.push_str(" LIMIT ? OFFSET ?");
    values.push(Value::Integer(sql_count(limit)));
    values.push(Value::Integer(sql_count(offset)));

    tracing::debug!("searching transactions for '{}'", term);
    query_transactions(conn, &sql, values, "failed to search transactions")
}
