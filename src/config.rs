// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CASHFLOW_DB_PATH";
pub const LOG_ENV: &str = "CASHFLOW_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve the database location and log filter.
    ///
    /// `CASHFLOW_DB_PATH` overrides the platform data dir; `CASHFLOW_LOG`
    /// (then `RUST_LOG`) sets the tracing filter.
    pub fn from_env() -> Result<Self> {
        let db_path = match non_empty_var(DB_PATH_ENV) {
            Some(p) => PathBuf::from(p),
            None => crate::db::db_path()?,
        };
        let log_filter = non_empty_var(LOG_ENV)
            .or_else(|| non_empty_var("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Self {
            db_path,
            log_filter,
        })
    }

    pub fn with_db_path(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
