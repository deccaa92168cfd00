// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::BudgetError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categories offered when setting a budget. Others are accepted as well.
pub const SUGGESTED_CATEGORIES: [&str; 8] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Utilities",
    "Healthcare",
    "Education",
    "Other",
];

/// What the evaluator needs to know about one budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub category: String,
    pub amount: Decimal,
    pub month: String, // YYYY-MM
}

impl BudgetEntry {
    pub fn new(category: impl Into<String>, amount: Decimal, month: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            amount,
            month: month.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user: String,
    pub category: String,
    pub month: String,
    pub amount: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Budget> for BudgetEntry {
    fn from(b: &Budget) -> Self {
        BudgetEntry::new(b.category.clone(), b.amount, b.month.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(BudgetError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub kind: TxKind,
}

/// Count and spread of a user's budgets for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_categories: usize,
    pub total_budget: Decimal,
    pub min_budget: Option<Decimal>,
    pub max_budget: Option<Decimal>,
    pub avg_budget: Option<Decimal>,
}
