// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result, StorageContext};
use crate::models::{CategorySummary, StatsParams, TransactionStats, is_income_type};
use crate::utils::{parse_optional_date, user_or_default};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use std::collections::HashMap;

pub const UNCATEGORIZED: &str = "(uncategorized)";

/// `created_by` plus the optional inclusive date range, shared by both reports.
fn scope(p: &StatsParams) -> Result<(String, Vec<Value>)> {
    let mut sql = String::from("t.deleted_at IS NULL AND t.created_by = ?");
    let mut values = vec![Value::Text(user_or_default(&p.created_by).to_string())];
    if let Some(from) = parse_optional_date(p.from_date.as_deref())? {
        sql.push_str(" AND t.transaction_date >= ?");
        values.push(Value::Text(from.to_string()));
    }
    if let Some(to) = parse_optional_date(p.to_date.as_deref())? {
        sql.push_str(" AND t.transaction_date <= ?");
        values.push(Value::Text(to.to_string()));
    }
    Ok((sql, values))
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

/// Running money total. Stays exact in `Decimal` while the amounts fit and
/// continues in `f64` once an amount or the sum leaves `Decimal`'s range.
#[derive(Debug, Clone, Copy)]
enum Sum {
    Exact(Decimal),
    Approx(f64),
}

impl Default for Sum {
    fn default() -> Self {
        Sum::Exact(Decimal::ZERO)
    }
}

impl Sum {
    fn add(&mut self, amount: f64) {
        *self = match *self {
            Sum::Exact(acc) => match Decimal::try_from(amount)
                .ok()
                .and_then(|d| acc.checked_add(d))
            {
                Some(total) => Sum::Exact(total),
                None => {
                    tracing::warn!("total exceeds decimal range, continuing in f64");
                    Sum::Approx(to_f64(acc) + amount)
                }
            },
            Sum::Approx(acc) => Sum::Approx(acc + amount),
        };
    }

    fn value(self) -> f64 {
        match self {
            Sum::Exact(d) => to_f64(d),
            Sum::Approx(v) => v,
        }
    }

    fn minus(self, other: Sum) -> f64 {
        match (self, other) {
            (Sum::Exact(a), Sum::Exact(b)) => a
                .checked_sub(b)
                .map(to_f64)
                .unwrap_or_else(|| to_f64(a) - to_f64(b)),
            _ => self.value() - other.value(),
        }
    }

    fn mean(self, count: i64) -> f64 {
        if count == 0 {
            return 0.0;
        }
        match self {
            Sum::Exact(d) => d
                .checked_div(Decimal::from(count))
                .map(to_f64)
                .unwrap_or_else(|| to_f64(d) / count as f64),
            Sum::Approx(v) => v / count as f64,
        }
    }
}

#[derive(Debug, Default)]
struct Totals {
    income: Sum,
    expenses: Sum,
    all: Sum,
    count: i64,
    income_count: i64,
    expense_count: i64,
    pending_income: Sum,
    pending_expenses: Sum,
}

impl Totals {
    fn add(&mut self, r#type: &str, amount: f64, status: &str) {
        let pending = status == "pending";
        self.count += 1;
        self.all.add(amount);
        if is_income_type(r#type) {
            self.income.add(amount);
            self.income_count += 1;
            if pending {
                self.pending_income.add(amount);
            }
        } else {
            self.expenses.add(amount);
            self.expense_count += 1;
            if pending {
                self.pending_expenses.add(amount);
            }
        }
    }

    fn into_stats(self) -> TransactionStats {
        TransactionStats {
            total_income: self.income.value(),
            total_expenses: self.expenses.value(),
            net_profit: self.income.minus(self.expenses),
            total_transactions: self.count,
            total_income_count: self.income_count,
            total_expense_count: self.expense_count,
            average_transaction: self.all.mean(self.count),
            pending_income: self.pending_income.value(),
            pending_expenses: self.pending_expenses.value(),
        }
    }
}

/// Income/expense totals over live rows. An empty range yields zeros.
pub fn stats(conn: &Connection, p: &StatsParams) -> Result<TransactionStats> {
    let (filter, values) = scope(p)?;
    let sql = format!(
        "SELECT t.type, t.amount, t.payment_status FROM transactions t WHERE {}",
        filter
    );
    let context = "failed to compute transaction stats";
    let mut stmt = conn.prepare(&sql).storage_context(context)?;
    let rows = stmt
        .query_map(params_from_iter(values), |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, f64>(1)?,
                r.get::<_, String>(2)?,
            ))
        })
        .storage_context(context)?;

    let mut totals = Totals::default();
    for row in rows {
        let (typ, amount, status) = row.storage_context(context)?;
        totals.add(&typ, amount, &status);
    }
    tracing::debug!("stats over {} transactions", totals.count);
    Ok(totals.into_stats())
}

/// Count and total per (category, type). Rows without a category land in
/// the [`UNCATEGORIZED`] bucket.
pub fn by_category(conn: &Connection, p: &StatsParams) -> Result<Vec<CategorySummary>> {
    let (filter, values) = scope(p)?;
    let sql = format!(
        "SELECT t.category_id, c.name, t.type, t.amount
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE {}",
        filter
    );
    let context = "failed to group transactions by category";
    let mut stmt = conn.prepare(&sql).storage_context(context)?;
    let rows = stmt
        .query_map(params_from_iter(values), |r| {
            Ok((
                r.get::<_, Option<String>>(0)?,
                r.get::<_, Option<String>>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, f64>(3)?,
            ))
        })
        .storage_context(context)?;

    let mut agg: HashMap<(Option<String>, String), (String, i64, Sum)> = HashMap::new();
    for row in rows {
        let (cat_id, cat_name, typ, amount) = row.storage_context(context)?;
        let name = cat_name.unwrap_or_else(|| UNCATEGORIZED.to_string());
        let entry = agg
            .entry((cat_id, typ))
            .or_insert((name, 0, Sum::default()));
        entry.1 += 1;
        entry.2.add(amount);
    }

    let mut items: Vec<CategorySummary> = agg
        .into_iter()
        .map(|((category_id, typ), (category, count, total))| CategorySummary {
            category_id,
            category,
            r#type: typ,
            count,
            total_amount: total.value(),
        })
        .collect();
    // Largest totals first; name then type break ties.
    items.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.r#type.cmp(&b.r#type))
    });
    Ok(items)
}
