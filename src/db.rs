// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.cashflow", "CashFlow", "cashflow"));

pub const DB_FILE_NAME: &str = "cashflow.sqlite";

/// Location of the database inside the per-user application data directory.
pub fn db_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().join(DB_FILE_NAME))
}

/// Open the database at `path`, creating the file, its directory and the
/// schema when absent. Any failure here is fatal for the application.
pub fn open_or_init(path: &Path) -> Result<Connection> {
    open_at(path).map_err(|err| {
        tracing::error!("failed to open database at {}: {:#}", path.display(), err);
        Error::StorageUnavailable(format!("{:#}", err))
    })
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|err| Error::StorageUnavailable(err.to_string()))?;
    init_schema(&conn).map_err(|err| Error::StorageUnavailable(err.to_string()))?;
    Ok(conn)
}

fn open_at(path: &Path) -> anyhow::Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).context("Failed to create data dir")?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn).context("Failed to initialise schema")?;
    tracing::info!("database ready at {}", path.display());
    Ok(conn)
}

/// Create every table, index and seed row if missing. Safe to run on each
/// start; changes to this batch must stay additive.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(16)))),
        name TEXT NOT NULL DEFAULT 'Default User',
        email TEXT,
        preferences TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    INSERT OR IGNORE INTO users(id, name) VALUES ('default', 'Default User');

    CREATE TABLE IF NOT EXISTS payment_methods(
        id TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(16)))),
        name TEXT NOT NULL UNIQUE,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    INSERT OR IGNORE INTO payment_methods(name, description) VALUES
        ('Cash', 'Cash payment'),
        ('Credit Card', 'Credit card payment'),
        ('Debit Card', 'Debit card payment'),
        ('Bank Transfer', 'Bank wire transfer'),
        ('Check', 'Check payment'),
        ('PayPal', 'PayPal digital payment'),
        ('Venmo', 'Venmo digital payment'),
        ('Other', 'Other payment method');

    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(16)))),
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL CHECK (type IN ('income', 'expense', 'both')),
        color TEXT,
        icon TEXT,
        parent_id TEXT REFERENCES categories(id) ON DELETE SET NULL,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    INSERT OR IGNORE INTO categories(name, type, color, icon) VALUES
        ('Sales Revenue', 'income', '#10B981', 'dollar-sign'),
        ('Service Income', 'income', '#10B981', 'briefcase'),
        ('Other Income', 'income', '#10B981', 'plus-circle'),
        ('Product Purchases', 'expense', '#EF4444', 'shopping-cart'),
        ('Operating Expenses', 'expense', '#EF4444', 'settings'),
        ('Salaries & Wages', 'expense', '#EF4444', 'users'),
        ('Rent', 'expense', '#EF4444', 'home'),
        ('Utilities', 'expense', '#EF4444', 'zap'),
        ('Marketing', 'expense', '#EF4444', 'megaphone'),
        ('Office Supplies', 'expense', '#EF4444', 'paperclip'),
        ('Travel', 'expense', '#EF4444', 'plane'),
        ('Meals & Entertainment', 'expense', '#EF4444', 'coffee'),
        ('Insurance', 'expense', '#EF4444', 'shield'),
        ('Taxes', 'expense', '#EF4444', 'file-text'),
        ('Bank Fees', 'expense', '#EF4444', 'credit-card'),
        ('Professional Services', 'expense', '#EF4444', 'briefcase'),
        ('Equipment', 'expense', '#EF4444', 'tool'),
        ('Software & Subscriptions', 'expense', '#EF4444', 'cloud'),
        ('Repairs & Maintenance', 'expense', '#EF4444', 'wrench'),
        ('Other Expenses', 'expense', '#EF4444', 'minus-circle');

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY DEFAULT (lower(hex(randomblob(16)))),
        type TEXT NOT NULL CHECK (type IN ('income', 'expense', 'sale', 'purchase')),
        description TEXT NOT NULL CHECK (length(trim(description)) > 0),
        amount REAL NOT NULL CHECK (amount >= 0),
        transaction_date DATE NOT NULL,
        category_id TEXT REFERENCES categories(id) ON DELETE SET NULL,
        tags TEXT,
        customer_vendor TEXT,
        payment_method_id TEXT REFERENCES payment_methods(id) ON DELETE SET NULL,
        payment_status TEXT NOT NULL DEFAULT 'completed'
            CHECK (payment_status IN ('pending', 'completed', 'partial', 'cancelled')),
        reference_number TEXT,
        invoice_number TEXT,
        notes TEXT,
        attachments TEXT,
        tax_amount REAL NOT NULL DEFAULT 0,
        discount_amount REAL NOT NULL DEFAULT 0,
        due_amount REAL NOT NULL DEFAULT 0,
        net_amount REAL GENERATED ALWAYS AS (amount - discount_amount + tax_amount) STORED,
        currency TEXT NOT NULL DEFAULT 'USD',
        exchange_rate REAL NOT NULL DEFAULT 1.0,
        is_recurring BOOLEAN NOT NULL DEFAULT 0,
        recurring_frequency TEXT
            CHECK (recurring_frequency IN ('daily', 'weekly', 'monthly', 'quarterly', 'yearly')),
        recurring_end_date DATE,
        parent_transaction_id TEXT REFERENCES transactions(id),
        created_by TEXT NOT NULL DEFAULT 'default' REFERENCES users(id),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        deleted_at TIMESTAMP,
        CHECK (is_recurring = 0 OR recurring_frequency IS NOT NULL)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(transaction_date);
    CREATE INDEX IF NOT EXISTS idx_transactions_type ON transactions(type);
    CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);
    CREATE INDEX IF NOT EXISTS idx_transactions_customer_vendor ON transactions(customer_vendor);
    CREATE INDEX IF NOT EXISTS idx_transactions_payment_status ON transactions(payment_status);
    CREATE INDEX IF NOT EXISTS idx_transactions_payment_method ON transactions(payment_method_id);
    CREATE INDEX IF NOT EXISTS idx_transactions_created_by ON transactions(created_by);
    CREATE INDEX IF NOT EXISTS idx_transactions_deleted_at ON transactions(deleted_at);
    CREATE INDEX IF NOT EXISTS idx_transactions_amount ON transactions(amount);
    "#,
    )
}
