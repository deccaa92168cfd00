// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget progress evaluation.
//!
//! Turns a budget limit and the amount spent against it into a classified
//! [`ProgressRecord`], and a month's worth of budgets into a sorted
//! [`ProgressReport`] with [`AggregateStats`]. Everything here is pure: no
//! I/O, no clock, no shared state.

use crate::errors::ProgressError;
use crate::models::BudgetEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const ON_TRACK_MAX: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const CAUTION_MAX: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
const WARNING_MAX: Decimal = Decimal::ONE_HUNDRED;
const ALERT_INFO_MIN: Decimal = CAUTION_MAX;
const ALERT_WARNING_MIN: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    OnTrack,
    Caution,
    Warning,
    OverBudget,
}

impl ProgressStatus {
    /// Bands are inclusive at the upper edge; first match wins.
    pub fn classify(percentage: Decimal) -> Self {
        if percentage <= ON_TRACK_MAX {
            ProgressStatus::OnTrack
        } else if percentage <= CAUTION_MAX {
            ProgressStatus::Caution
        } else if percentage <= WARNING_MAX {
            ProgressStatus::Warning
        } else {
            ProgressStatus::OverBudget
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProgressStatus::OnTrack => "On Track",
            ProgressStatus::Caution => "Caution",
            ProgressStatus::Warning => "Warning",
            ProgressStatus::OverBudget => "Over Budget!",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ProgressStatus::OnTrack => "success",
            ProgressStatus::Caution => "warning",
            ProgressStatus::Warning => "danger-orange",
            ProgressStatus::OverBudget => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub category: String,
    pub budget_amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// Uncapped utilization; used for sorting and reporting.
    pub percentage: Decimal,
    /// `percentage` clamped to 100, for bounded indicators.
    pub display_percentage: Decimal,
    pub status: ProgressStatus,
    pub is_over: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub overall_percentage: Decimal,
    pub categories_over_budget: usize,
    pub categories_on_track: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub records: Vec<ProgressRecord>,
    pub stats: AggregateStats,
}

/// `part / whole * 100`, or zero when `whole` is zero. Saturates instead of
/// overflowing.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .unwrap_or_else(|| saturate(part, whole))
}

fn saturate(part: Decimal, whole: Decimal) -> Decimal {
    if part.is_sign_negative() != whole.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

pub fn evaluate(budget: &BudgetEntry, spent: Decimal) -> ProgressRecord {
    let percentage = percent_of(spent, budget.amount);
    ProgressRecord {
        category: budget.category.clone(),
        budget_amount: budget.amount,
        spent,
        remaining: budget.amount.saturating_sub(spent),
        percentage,
        display_percentage: percentage.min(Decimal::ONE_HUNDRED),
        status: ProgressStatus::classify(percentage),
        is_over: spent > budget.amount,
    }
}

/// Like [`evaluate`], but refuses negative inputs.
pub fn evaluate_checked(
    budget: &BudgetEntry,
    spent: Decimal,
) -> Result<ProgressRecord, ProgressError> {
    if budget.amount < Decimal::ZERO {
        return Err(ProgressError::InvalidAmount {
            field: "budget",
            category: budget.category.clone(),
            amount: budget.amount,
        });
    }
    if spent < Decimal::ZERO {
        return Err(ProgressError::InvalidAmount {
            field: "spent",
            category: budget.category.clone(),
            amount: spent,
        });
    }
    Ok(evaluate(budget, spent))
}

/// Evaluates every budget, then orders the records most-utilized first.
///
/// Categories missing from `spend_for` count as zero spend. Equal
/// percentages keep the caller's relative order.
pub fn evaluate_all<F>(budgets: &[BudgetEntry], spend_for: F) -> ProgressReport
where
    F: Fn(&str) -> Option<Decimal>,
{
    let mut records: Vec<ProgressRecord> = budgets
        .iter()
        .map(|b| evaluate(b, spend_for(&b.category).unwrap_or(Decimal::ZERO)))
        .collect();
    records.sort_by(|a, b| b.percentage.cmp(&a.percentage));

    let mut stats = AggregateStats::default();
    for r in &records {
        stats.total_budget = stats.total_budget.saturating_add(r.budget_amount);
        stats.total_spent = stats.total_spent.saturating_add(r.spent);
        if r.is_over {
            stats.categories_over_budget += 1;
        }
        if r.display_percentage <= ON_TRACK_MAX {
            stats.categories_on_track += 1;
        }
    }
    stats.total_remaining = stats.total_budget.saturating_sub(stats.total_spent);
    stats.overall_percentage = percent_of(stats.total_spent, stats.total_budget);

    ProgressReport { records, stats }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub level: AlertLevel,
    pub message: String,
    pub percentage: Decimal,
}

/// Categories past 80% utilization, most-utilized first.
pub fn alerts(records: &[ProgressRecord], currency: &str) -> Vec<BudgetAlert> {
    let mut hot: Vec<&ProgressRecord> = records
        .iter()
        .filter(|r| r.percentage > ALERT_INFO_MIN)
        .collect();
    hot.sort_by(|a, b| b.percentage.cmp(&a.percentage));

    hot.into_iter()
        .map(|r| {
            let (level, message) = if r.percentage > WARNING_MAX {
                (
                    AlertLevel::Danger,
                    format!(
                        "Over budget by {:.2} {}",
                        r.spent.saturating_sub(r.budget_amount),
                        currency
                    ),
                )
            } else if r.percentage > ALERT_WARNING_MIN {
                (
                    AlertLevel::Warning,
                    format!("Only {:.2} {} remaining", r.remaining, currency),
                )
            } else {
                (
                    AlertLevel::Info,
                    format!("{}% of budget used", r.percentage.round_dp(0)),
                )
            };
            BudgetAlert {
                category: r.category.clone(),
                level,
                message,
                percentage: r.percentage,
            }
        })
        .collect()
}
