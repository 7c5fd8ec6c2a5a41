// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_USER: &str = "default";

/// A stored transaction row. `tags` and `attachments` hold the raw JSON
/// array text of their columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub r#type: String,
    pub description: String,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub category_id: Option<String>,
    pub tags: Option<String>,
    pub customer_vendor: Option<String>,
    pub payment_method_id: Option<String>,
    pub payment_status: String,
    pub reference_number: Option<String>,
    pub invoice_number: Option<String>,
    pub notes: Option<String>,
    pub attachments: Option<String>,
    pub tax_amount: f64,
    pub discount_amount: f64,
    pub due_amount: f64,
    pub net_amount: f64,
    pub currency: String,
    pub exchange_rate: f64,
    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
    pub recurring_end_date: Option<NaiveDate>,
    pub parent_transaction_id: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// `income` and `sale` count towards income; everything else is spend.
pub fn is_income_type(t: &str) -> bool {
    matches!(t, "income" | "sale")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub r#type: String, // income | expense | both
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields accepted when recording a transaction. Dates are `YYYY-MM-DD`
/// literals; `net_amount` is derived by storage and cannot be supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTransactionParams {
    pub r#type: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    pub transaction_date: String,
    #[serde(alias = "category")]
    pub category_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub customer_vendor: Option<String>,
    #[serde(alias = "payment_method")]
    pub payment_method_id: Option<String>,
    pub payment_status: Option<String>,
    pub reference_number: Option<String>,
    pub invoice_number: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub due_amount: f64,
    pub currency: Option<String>,
    pub exchange_rate: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
    pub recurring_end_date: Option<String>,
    pub parent_transaction_id: Option<String>,
    pub created_by: String,
}

/// Full replacement of a transaction's mutable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateTransactionParams {
    pub r#type: String,
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: f64,
    pub transaction_date: String,
    #[serde(alias = "category")]
    pub category_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub customer_vendor: Option<String>,
    #[serde(alias = "payment_method")]
    pub payment_method_id: Option<String>,
    pub payment_status: Option<String>,
    pub reference_number: Option<String>,
    pub invoice_number: Option<String>,
    pub notes: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub attachments: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tax_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub discount_amount: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub due_amount: f64,
    pub currency: Option<String>,
    pub exchange_rate: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_recurring: bool,
    pub recurring_frequency: Option<String>,
    pub recurring_end_date: Option<String>,
}

impl From<CreateTransactionParams> for UpdateTransactionParams {
    fn from(p: CreateTransactionParams) -> Self {
        Self {
            r#type: p.r#type,
            description: p.description,
            amount: p.amount,
            transaction_date: p.transaction_date,
            category_id: p.category_id,
            tags: p.tags,
            customer_vendor: p.customer_vendor,
            payment_method_id: p.payment_method_id,
            payment_status: p.payment_status,
            reference_number: p.reference_number,
            invoice_number: p.invoice_number,
            notes: p.notes,
            attachments: p.attachments,
            tax_amount: p.tax_amount,
            discount_amount: p.discount_amount,
            due_amount: p.due_amount,
            currency: p.currency,
            exchange_rate: p.exchange_rate,
            is_recurring: p.is_recurring,
            recurring_frequency: p.recurring_frequency,
            recurring_end_date: p.recurring_end_date,
        }
    }
}

/// Listing filters. Every multi-value filter is a set of allowed values;
/// an empty set leaves that dimension unrestricted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListTransactionParams {
    pub created_by: String,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    #[serde(rename = "type", deserialize_with = "one_or_many")]
    pub types: Vec<String>,
    #[serde(rename = "category", deserialize_with = "one_or_many")]
    pub categories: Vec<String>,
    #[serde(rename = "payment_status", deserialize_with = "one_or_many")]
    pub payment_statuses: Vec<String>,
    #[serde(rename = "payment_method", deserialize_with = "one_or_many")]
    pub payment_methods: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    pub customer_vendor: Option<String>,
    #[serde(rename = "search")]
    pub description: Option<String>,
    pub reference_number: Option<String>,
    pub invoice_number: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub min_due_amount: Option<f64>,
    pub max_due_amount: Option<f64>,
    pub is_recurring: Option<bool>,
    pub has_tax: Option<bool>,
    pub has_discount: Option<bool>,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsParams {
    pub created_by: String,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub total_transactions: i64,
    pub total_income_count: i64,
    pub total_expense_count: i64,
    pub average_transaction: f64,
    pub pending_income: f64,
    pub pending_expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: Option<String>,
    pub category: String,
    pub r#type: String,
    pub count: i64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub value: String,
    pub frequency: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryParams {
    pub name: String,
    pub r#type: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: bool,
}

impl Default for CategoryParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            r#type: String::new(),
            color: None,
            icon: None,
            parent_id: None,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethodParams {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl Default for PaymentMethodParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            is_active: true,
        }
    }
}

/// Frontend payloads carry `null` for unset lists and numbers.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The frontend sends multi-value filters either as a single string or as
/// an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(Option<()>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) if s.is_empty() => Vec::new(),
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Null(_) => Vec::new(),
    })
}
