// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result, StorageContext};
use crate::models::{Category, CategoryParams};
use crate::utils::non_empty;
use rusqlite::{Connection, OptionalExtension, Row, params};

const COLUMNS: &str = "id, name, type, color, icon, parent_id, is_active, created_at, updated_at";

fn map_row(r: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: r.get(2)?,
        color: r.get(3)?,
        icon: r.get(4)?,
        parent_id: r.get(5)?,
        is_active: r.get(6)?,
        created_at: r.get(7)?,
        updated_at: r.get(8)?,
    })
}

fn query(conn: &Connection, sql: &str, arg: Option<&str>, context: &str) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(sql).storage_context(context)?;
    let rows = match arg {
        Some(a) => stmt.query_map(params![a], map_row),
        None => stmt.query_map([], map_row),
    }
    .storage_context(context)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row.storage_context(context)?);
    }
    Ok(data)
}

pub fn create(conn: &Connection, p: &CategoryParams) -> Result<Category> {
    let name = p.name.trim();
    let id: String = conn
        .query_row(
            "INSERT INTO categories(name, type, color, icon, parent_id, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
            params![
                name,
                p.r#type.trim(),
                non_empty(p.color.as_deref()),
                non_empty(p.icon.as_deref()),
                non_empty(p.parent_id.as_deref()),
                p.is_active
            ],
            |r| r.get(0),
        )
        .storage_context("failed to create category")?;
    tracing::info!("added category '{}' ({})", name, id);
    get(conn, &id)
}

pub fn get(conn: &Connection, id: &str) -> Result<Category> {
    conn.query_row(
        &format!("SELECT {} FROM categories WHERE id=?1", COLUMNS),
        params![id],
        map_row,
    )
    .optional()
    .storage_context("failed to get category")?
    .ok_or(Error::NotFound("category"))
}

pub fn get_by_name(conn: &Connection, name: &str) -> Result<Category> {
    conn.query_row(
        &format!("SELECT {} FROM categories WHERE name=?1", COLUMNS),
        params![name.trim()],
        map_row,
    )
    .optional()
    .storage_context("failed to get category")?
    .ok_or(Error::NotFound("category"))
}

/// Display name for a category id, if the category still exists.
pub fn name_of(conn: &Connection, id: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT name FROM categories WHERE id=?1",
        params![id],
        |r| r.get(0),
    )
    .optional()
    .storage_context("failed to get category name")
}

pub fn list(conn: &Connection) -> Result<Vec<Category>> {
    query(
        conn,
        &format!("SELECT {} FROM categories ORDER BY name", COLUMNS),
        None,
        "failed to list categories",
    )
}

pub fn list_active(conn: &Connection) -> Result<Vec<Category>> {
    query(
        conn,
        &format!(
            "SELECT {} FROM categories WHERE is_active=1 ORDER BY name",
            COLUMNS
        ),
        None,
        "failed to list active categories",
    )
}

pub fn list_by_type(conn: &Connection, r#type: &str) -> Result<Vec<Category>> {
    query(
        conn,
        &format!(
            "SELECT {} FROM categories WHERE type=?1 ORDER BY name",
            COLUMNS
        ),
        Some(r#type.trim()),
        "failed to list categories by type",
    )
}

pub fn update(conn: &Connection, id: &str, p: &CategoryParams) -> Result<Category> {
    let changed = conn
        .execute(
            "UPDATE categories SET name=?2, type=?3, color=?4, icon=?5, parent_id=?6,
                is_active=?7, updated_at=CURRENT_TIMESTAMP
             WHERE id=?1",
            params![
                id,
                p.name.trim(),
                p.r#type.trim(),
                non_empty(p.color.as_deref()),
                non_empty(p.icon.as_deref()),
                non_empty(p.parent_id.as_deref()),
                p.is_active
            ],
        )
        .storage_context("failed to update category")?;
    if changed == 0 {
        return Err(Error::NotFound("category"));
    }
    tracing::info!("updated category {}", id);
    get(conn, id)
}

/// Number of live transactions that reference the category.
pub fn dependencies(conn: &Connection, id: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1 AND deleted_at IS NULL",
        params![id],
        |r| r.get(0),
    )
    .storage_context("failed to check category dependencies")
}

/// Hard delete, refused while live transactions still use the category.
pub fn delete(conn: &Connection, id: &str) -> Result<()> {
    let count = dependencies(conn, id)?;
    if count > 0 {
        tracing::info!("refusing to delete category {}: {} transaction(s)", id, count);
        return Err(Error::DependencyConflict {
            entity: "category",
            count,
        });
    }
    let removed = conn
        .execute("DELETE FROM categories WHERE id=?1", params![id])
        .storage_context("failed to delete category")?;
    if removed == 0 {
        return Err(Error::NotFound("category"));
    }
    tracing::info!("removed category {}", id);
    Ok(())
}

pub fn deactivate(conn: &Connection, id: &str) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE categories SET is_active=0, updated_at=CURRENT_TIMESTAMP WHERE id=?1",
            params![id],
        )
        .storage_context("failed to deactivate category")?;
    if changed == 0 {
        return Err(Error::NotFound("category"));
    }
    tracing::info!("deactivated category {}", id);
    Ok(())
}
