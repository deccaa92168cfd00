// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected input to the checked progress evaluator.
#[derive(Debug, Error, PartialEq)]
pub enum ProgressError {
    #[error("Invalid {field} amount {amount} for category '{category}'")]
    InvalidAmount {
        field: &'static str,
        category: String,
        amount: Decimal,
    },
}

/// Validation failures raised by the budget store and commands.
#[derive(Debug, Error, PartialEq)]
pub enum BudgetError {
    #[error("Budget amount must be greater than 0 (got {0})")]
    InvalidAmount(Decimal),
    #[error("Transaction amount must be greater than 0 (got {0})")]
    InvalidTransactionAmount(Decimal),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Category must not be empty")]
    EmptyCategory,
    #[error("Budget not found")]
    NotFound,
    #[error("Unknown transaction kind '{0}' (use income|expense)")]
    UnknownKind(String),
    #[error("Unknown format: {0} (use csv|json)")]
    UnknownFormat(String),
    #[error("Unknown setting '{0}' (use default_user|currency)")]
    UnknownSetting(String),
}
