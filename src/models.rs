// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
}

/// Direction of a transaction. The amount itself is always non-negative;
/// this is the only thing that decides the sign of its contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Income,
    Expense,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Income => "income",
            FlowType::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<FlowType> {
        match s {
            "income" => Some(FlowType::Income),
            "expense" => Some(FlowType::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub flow_type: FlowType,
    pub amount: Decimal,
    pub mode: Option<String>,
    /// None when the stored value was missing or unparseable; such rows
    /// sort after every dated row.
    pub occurred_at: Option<NaiveDateTime>,
    pub collection_id: i64,
    pub user_id: i64,
}

/// A transaction tagged with the name of the collection it came from,
/// as shown in the merged cross-collection history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub collection_name: String,
    #[serde(flatten)]
    pub transaction: Transaction,
}

/// Per-user settings document. Category lists are what input forms offer;
/// transactions outside the lists still aggregate normally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub currency: String,
    pub dark_theme: bool,
    pub expense_categories: Vec<String>,
    pub income_categories: Vec<String>,
    pub transaction_modes: Vec<String>,
    /// Whether the category breakdown also buckets income transactions.
    pub chart_include_income: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: "₹".to_string(),
            dark_theme: false,
            expense_categories: [
                "Rent", "Bill", "Food", "Clothes", "Bike", "Fuel", "Shopping", "Savings",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            income_categories: [
                "Salary",
                "Freelance",
                "Bonus",
                "Investment",
                "Interest",
                "Other",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            transaction_modes: ["Cash", "Card", "UPI"].into_iter().map(String::from).collect(),
            chart_include_income: false,
        }
    }
}
