// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Frontend-facing surface: plain params in, flat response records out.

use crate::commands::{categories, filters, payment_methods, reports, suggestions, transactions};
use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::models::{
    Category, CategoryParams, CategorySummary, CreateTransactionParams, ListTransactionParams,
    PaymentMethod, PaymentMethodParams, StatsParams, SuggestionItem, Transaction,
    TransactionStats, UpdateTransactionParams,
};
use crate::utils::{decode_list, get_base_currency, set_base_currency};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: String,
    pub r#type: String,
    pub description: String,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub category: Option<String>,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
    pub customer_vendor: Option<String>,
    pub payment_method: Option<String>,
    pub payment_method_id: Option<String>,
    pub payment_status: String,
    pub reference_number: Option<String>,
    pub invoice_number: Option<String>,
    pub notes: Option<String>,
    pub attachments: Vec<String>,
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
}

pub type CategoryResponse = Category;
pub type PaymentMethodResponse = PaymentMethod;

/// Owns the single database connection and answers frontend requests.
pub struct App {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl App {
    /// Open (and initialise) the database named by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let conn = db::open_or_init(&config.db_path)?;
        Ok(Self {
            conn,
            db_path: Some(config.db_path.clone()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
            db_path: None,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            db_path: None,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn database_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    // Transactions

    pub fn create_transaction(
        &self,
        params: CreateTransactionParams,
    ) -> Result<TransactionResponse> {
        let t = transactions::create(&self.conn, params)?;
        Ok(self.convert_transaction(t))
    }

    pub fn get_transaction(&self, id: &str) -> Result<TransactionResponse> {
        let t = transactions::get(&self.conn, id)?;
        Ok(self.convert_transaction(t))
    }

    pub fn list_transactions(
        &self,
        params: &ListTransactionParams,
    ) -> Result<Vec<TransactionResponse>> {
        let rows = filters::list(&self.conn, params)?;
        Ok(self.convert_all(rows))
    }

    pub fn update_transaction(
        &self,
        id: &str,
        params: UpdateTransactionParams,
    ) -> Result<TransactionResponse> {
        let t = transactions::update(&self.conn, id, params)?;
        Ok(self.convert_transaction(t))
    }

    pub fn delete_transaction(&self, id: &str) -> Result<()> {
        transactions::delete(&self.conn, id)
    }

    pub fn get_transaction_stats(&self, params: &StatsParams) -> Result<TransactionStats> {
        reports::stats(&self.conn, params)
    }

    pub fn get_transactions_by_category(
        &self,
        params: &StatsParams,
    ) -> Result<Vec<CategorySummary>> {
        reports::by_category(&self.conn, params)
    }

    pub fn search_transactions(
        &self,
        created_by: &str,
        term: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TransactionResponse>> {
        let rows = transactions::search(&self.conn, created_by, term, limit, offset)?;
        Ok(self.convert_all(rows))
    }

    pub fn get_recent_transactions(
        &self,
        created_by: &str,
        limit: usize,
    ) -> Result<Vec<TransactionResponse>> {
        let rows = transactions::recent(&self.conn, created_by, limit)?;
        Ok(self.convert_all(rows))
    }

    pub fn get_description_suggestions(
        &self,
        created_by: &str,
        r#type: &str,
        search: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>> {
        suggestions::descriptions(&self.conn, created_by, r#type, search, limit)
    }

    pub fn get_customer_vendor_suggestions(
        &self,
        created_by: &str,
        r#type: &str,
        search: &str,
        limit: usize,
    ) -> Result<Vec<SuggestionItem>> {
        suggestions::customer_vendors(&self.conn, created_by, r#type, search, limit)
    }

    // Categories

    pub fn create_category(&self, params: &CategoryParams) -> Result<CategoryResponse> {
        categories::create(&self.conn, params)
    }

    pub fn get_category(&self, id: &str) -> Result<CategoryResponse> {
        categories::get(&self.conn, id)
    }

    pub fn get_category_by_name(&self, name: &str) -> Result<CategoryResponse> {
        categories::get_by_name(&self.conn, name)
    }

    pub fn list_categories(&self) -> Result<Vec<CategoryResponse>> {
        categories::list(&self.conn)
    }

    pub fn list_active_categories(&self) -> Result<Vec<CategoryResponse>> {
        categories::list_active(&self.conn)
    }

    pub fn list_categories_by_type(&self, r#type: &str) -> Result<Vec<CategoryResponse>> {
        categories::list_by_type(&self.conn, r#type)
    }

    pub fn update_category(&self, id: &str, params: &CategoryParams) -> Result<CategoryResponse> {
        categories::update(&self.conn, id, params)
    }

    pub fn delete_category(&self, id: &str) -> Result<()> {
        categories::delete(&self.conn, id)
    }

    pub fn deactivate_category(&self, id: &str) -> Result<()> {
        categories::deactivate(&self.conn, id)
    }

    pub fn check_category_dependencies(&self, id: &str) -> Result<i64> {
        categories::dependencies(&self.conn, id)
    }

    // Payment methods

    pub fn create_payment_method(
        &self,
        params: &PaymentMethodParams,
    ) -> Result<PaymentMethodResponse> {
        payment_methods::create(&self.conn, params)
    }

    pub fn get_payment_method(&self, id: &str) -> Result<PaymentMethodResponse> {
        payment_methods::get(&self.conn, id)
    }

    pub fn list_payment_methods(&self) -> Result<Vec<PaymentMethodResponse>> {
        payment_methods::list(&self.conn)
    }

    pub fn list_active_payment_methods(&self) -> Result<Vec<PaymentMethodResponse>> {
        payment_methods::list_active(&self.conn)
    }

    pub fn update_payment_method(
        &self,
        id: &str,
        params: &PaymentMethodParams,
    ) -> Result<PaymentMethodResponse> {
        payment_methods::update(&self.conn, id, params)
    }

    pub fn delete_payment_method(&self, id: &str) -> Result<()> {
        payment_methods::delete(&self.conn, id)
    }

    pub fn deactivate_payment_method(&self, id: &str) -> Result<()> {
        payment_methods::deactivate(&self.conn, id)
    }

    pub fn check_payment_method_dependencies(&self, id: &str) -> Result<i64> {
        payment_methods::dependencies(&self.conn, id)
    }

    // Settings

    pub fn base_currency(&self) -> Result<String> {
        get_base_currency(&self.conn)
    }

    pub fn set_base_currency(&self, ccy: &str) -> Result<()> {
        set_base_currency(&self.conn, ccy)
    }

    fn convert_all(&self, rows: Vec<Transaction>) -> Vec<TransactionResponse> {
        rows.into_iter()
            .map(|t| self.convert_transaction(t))
            .collect()
    }

    /// Name lookups are enrichment only: a failed lookup leaves the name empty.
    pub fn convert_transaction(&self, t: Transaction) -> TransactionResponse {
        let category = t
            .category_id
            .as_deref()
            .and_then(|id| lookup_name(categories::name_of(&self.conn, id), "category", id));
        let payment_method = t.payment_method_id.as_deref().and_then(|id| {
            lookup_name(
                payment_methods::name_of(&self.conn, id),
                "payment method",
                id,
            )
        });

        TransactionResponse {
            tags: decode_list(t.tags.as_deref()),
            attachments: decode_list(t.attachments.as_deref()),
            category,
            payment_method,
            id: t.id,
            r#type: t.r#type,
            description: t.description,
            amount: t.amount,
            transaction_date: t.transaction_date,
            category_id: t.category_id,
            customer_vendor: t.customer_vendor,
            payment_method_id: t.payment_method_id,
            payment_status: t.payment_status,
            reference_number: t.reference_number,
            invoice_number: t.invoice_number,
            notes: t.notes,
            tax_amount: t.tax_amount,
            discount_amount: t.discount_amount,
            due_amount: t.due_amount,
            net_amount: t.net_amount,
            currency: t.currency,
            exchange_rate: t.exchange_rate,
            is_recurring: t.is_recurring,
            recurring_frequency: t.recurring_frequency,
            recurring_end_date: t.recurring_end_date,
            parent_transaction_id: t.parent_transaction_id,
            created_by: t.created_by,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

fn lookup_name(found: Result<Option<String>>, what: &str, id: &str) -> Option<String> {
    match found {
        Ok(name) => name,
        Err(err) => {
            tracing::debug!("could not resolve {} name for {}: {}", what, id, err);
            None
        }
    }
}
