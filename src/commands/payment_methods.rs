// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result, StorageContext};
use crate::models::{PaymentMethod, PaymentMethodParams};
use crate::utils::non_empty;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at";

fn map_row(r: &Row) -> rusqlite::Result<PaymentMethod> {
    Ok(PaymentMethod {
        id: r.get(0)?,
        name: r.get(1)?,
        description: r.get(2)?,
        is_active: r.get(3)?,
        created_at: r.get(4)?,
        updated_at: r.get(5)?,
    })
}

fn query(conn: &Connection, sql: &str, context: &str) -> Result<Vec<PaymentMethod>> {
    let mut stmt = conn.prepare(sql).storage_context(context)?;
    let rows = stmt.query_map([], map_row).storage_context(context)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row.storage_context(context)?);
    }
    Ok(data)
}

pub fn create(conn: &Connection, p: &PaymentMethodParams) -> Result<PaymentMethod> {
    let name = p.name.trim();
    let id: String = conn
        .query_row(
            "INSERT INTO payment_methods(name, description, is_active) VALUES (?1, ?2, ?3)
             RETURNING id",
            params![name, non_empty(p.description.as_deref()), p.is_active],
            |r| r.get(0),
        )
        .storage_context("failed to create payment method")?;
    tracing::info!("added payment method '{}' ({})", name, id);
    get(conn, &id)
}

pub fn get(conn: &Connection, id: &str) -> Result<PaymentMethod> {
    conn.query_row(
        &format!("SELECT {} FROM payment_methods WHERE id=?1", COLUMNS),
        params![id],
        map_row,
    )
    .optional()
    .storage_context("failed to get payment method")?
    .ok_or(Error::NotFound("payment method"))
}

pub fn name_of(conn: &Connection, id: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT name FROM payment_methods WHERE id=?1",
        params![id],
        |r| r.get(0),
    )
    .optional()
    .storage_context("failed to get payment method name")
}

pub fn list(conn: &Connection) -> Result<Vec<PaymentMethod>> {
    query(
        conn,
        &format!("SELECT {} FROM payment_methods ORDER BY name", COLUMNS),
        "failed to list payment methods",
    )
}

pub fn list_active(conn: &Connection) -> Result<Vec<PaymentMethod>> {
    query(
        conn,
        &format!(
            "SELECT {} FROM payment_methods WHERE is_active=1 ORDER BY name",
            COLUMNS
        ),
        "failed to list active payment methods",
    )
}

pub fn update(conn: &Connection, id: &str, p: &PaymentMethodParams) -> Result<PaymentMethod> {
    let changed = conn
        .execute(
            "UPDATE payment_methods SET name=?2, description=?3, is_active=?4,
                updated_at=CURRENT_TIMESTAMP
             WHERE id=?1",
            params![
                id,
                p.name.trim(),
                non_empty(p.description.as_deref()),
                p.is_active
            ],
        )
        .storage_context("failed to update payment method")?;
    if changed == 0 {
        return Err(Error::NotFound("payment method"));
    }
    tracing::info!("updated payment method {}", id);
    get(conn, id)
}

pub fn dependencies(conn: &Connection, id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE payment_method_id=?1 AND deleted_at IS NULL",
        params![id],
        |r| r.get(0),
    )
    .storage_context("failed to check payment method dependencies")
}

pub fn delete(conn: &Connection, id: &str) -> Result<()> {
    let count = dependencies(conn, id)?;
    if count > 0 {
        tracing::info!(
            "refusing to delete payment method {}: {} transaction(s)",
            id,
            count
        );
        return Err(Error::DependencyConflict {
            entity: "payment method",
            count,
        });
    }
    let removed = conn
        .execute("DELETE FROM payment_methods WHERE id=?1", params![id])
        .storage_context("failed to delete payment method")?;
    if removed == 0 {
        return Err(Error::NotFound("payment method"));
    }
    tracing::info!("removed payment method {}", id);
    Ok(())
}

pub fn deactivate(conn: &Connection, id: &str) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE payment_methods SET is_active=0, updated_at=CURRENT_TIMESTAMP WHERE id=?1",
            params![id],
        )
        .storage_context("failed to deactivate payment method")?;
    if changed == 0 {
        return Err(Error::NotFound("payment method"));
    }
    tracing::info!("deactivated payment method {}", id);
    Ok(())
}
