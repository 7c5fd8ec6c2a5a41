// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use cashflow::models::StatsParams;
use cashflow::{App, config::Config, logging};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter);

    let app = App::open(&config).context("CashFlow cannot run without its database")?;
    println!("Database initialized at {}", config.db_path.display());

    let stats = app.get_transaction_stats(&StatsParams::default())?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
