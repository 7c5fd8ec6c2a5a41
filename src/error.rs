// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error taxonomy shared by every store operation.

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The entity does not exist, or it exists but has been soft-deleted.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A delete was refused because live transactions still reference the row.
    #[error("cannot delete {entity}: it is used in {count} transaction(s)")]
    DependencyConflict { entity: &'static str, count: i64 },

    /// SQLite rejected a value (CHECK, UNIQUE, FOREIGN KEY or NOT NULL).
    #[error("{context}: {message}")]
    ConstraintViolation { context: String, message: String },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The database file could not be opened or initialised.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Attach operation context to a raw SQLite error, the way `anyhow::Context`
/// does, while keeping constraint failures distinguishable.
pub trait StorageContext<T> {
    fn storage_context(self, context: &str) -> Result<T>;
}

impl<T> StorageContext<T> for std::result::Result<T, rusqlite::Error> {
    fn storage_context(self, context: &str) -> Result<T> {
        self.map_err(|err| wrap(err, context))
    }
}

fn wrap(err: rusqlite::Error, context: &str) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(ref code, ref msg)
            if code.code == ErrorCode::ConstraintViolation =>
        {
            let message = msg.clone().unwrap_or_else(|| code.to_string());
            tracing::warn!("{}: constraint violation: {}", context, message);
            Error::ConstraintViolation {
                context: context.to_string(),
                message,
            }
        }
        source => {
            tracing::error!("{}: {}", context, source);
            Error::Storage {
                context: context.to_string(),
                source,
            }
        }
    }
}
