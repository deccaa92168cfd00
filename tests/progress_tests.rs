// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetpace::errors::ProgressError;
use budgetpace::models::BudgetEntry;
use budgetpace::progress::{
    AggregateStats, AlertLevel, ProgressStatus, alerts, evaluate, evaluate_all, evaluate_checked,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

fn d(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn entry(category: &str, amount: &str) -> BudgetEntry {
    BudgetEntry::new(category, d(amount), "2025-10")
}

#[test]
fn half_spent_is_on_track() {
    let r = evaluate(&entry("Food", "500.00"), d("250.00"));
    assert_eq!(r.percentage, d("50"));
    assert_eq!(r.display_percentage, d("50"));
    assert_eq!(r.remaining, d("250.00"));
    assert_eq!(r.status, ProgressStatus::OnTrack);
    assert!(!r.is_over);
}

#[test]
fn overspend_caps_display_but_not_percentage() {
    let r = evaluate(&entry("Transport", "200.00"), d("220.00"));
    assert_eq!(r.percentage, d("110"));
    assert_eq!(r.display_percentage, d("100"));
    assert_eq!(r.status, ProgressStatus::OverBudget);
    assert_eq!(r.remaining, d("-20.00"));
    assert!(r.is_over);
}

#[test]
fn zero_budget_reports_zero_percent_but_is_over() {
    let r = evaluate(&entry("Gifts", "0"), d("50.00"));
    assert_eq!(r.percentage, Decimal::ZERO);
    assert_eq!(r.display_percentage, Decimal::ZERO);
    assert_eq!(r.status, ProgressStatus::OnTrack);
    assert_eq!(r.remaining, d("-50.00"));
    assert!(r.is_over);
}

#[test]
fn spending_exactly_the_budget_is_not_over() {
    let r = evaluate(&entry("Food", "500"), d("500"));
    assert!(!r.is_over);
    assert_eq!(r.status, ProgressStatus::Warning);
    assert_eq!(r.remaining, Decimal::ZERO);
}

#[test]
fn band_edges_are_inclusive() {
    let cases = [
        ("50", ProgressStatus::OnTrack),
        ("50.0001", ProgressStatus::Caution),
        ("80", ProgressStatus::Caution),
        ("80.0001", ProgressStatus::Warning),
        ("100", ProgressStatus::Warning),
        ("100.0001", ProgressStatus::OverBudget),
    ];
    for (spent, expected) in cases {
        // A budget of 100 makes the spend equal to the percentage.
        let r = evaluate(&entry("Food", "100"), d(spent));
        assert_eq!(r.percentage, d(spent), "percentage for {}", spent);
        assert_eq!(r.status, expected, "status for {}", spent);
    }
}

#[test]
fn classify_matches_labels_and_colors() {
    let cases = [
        ("25", "On Track", "success"),
        ("70", "Caution", "warning"),
        ("85", "Warning", "danger-orange"),
        ("110", "Over Budget!", "danger"),
    ];
    for (pct, label, color) in cases {
        let status = ProgressStatus::classify(d(pct));
        assert_eq!(status.label(), label);
        assert_eq!(status.color(), color);
    }
}

#[test]
fn percentage_keeps_full_precision() {
    let r = evaluate(&entry("Food", "3"), d("1"));
    assert_eq!(r.percentage.round_dp(4), d("33.3333"));
    assert_eq!(r.status, ProgressStatus::OnTrack);
}

#[test]
fn huge_ratios_saturate_instead_of_panicking() {
    let tiny = BudgetEntry::new("Dust", Decimal::new(1, 28), "2025-10");
    let r = evaluate(&tiny, Decimal::MAX);
    assert_eq!(r.percentage, Decimal::MAX);
    assert_eq!(r.display_percentage, d("100"));
    assert_eq!(r.status, ProgressStatus::OverBudget);
    assert!(r.is_over);
}

#[test]
fn checked_evaluation_rejects_negative_amounts() {
    let err = evaluate_checked(&entry("Food", "-1"), d("10")).unwrap_err();
    assert!(matches!(err, ProgressError::InvalidAmount { field: "budget", .. }));

    let err = evaluate_checked(&entry("Food", "100"), d("-0.01")).unwrap_err();
    assert!(matches!(err, ProgressError::InvalidAmount { field: "spent", .. }));

    let ok = evaluate_checked(&entry("Food", "100"), Decimal::ZERO).unwrap();
    assert_eq!(ok, evaluate(&entry("Food", "100"), Decimal::ZERO));
}

#[test]
fn evaluate_all_sorts_and_aggregates() {
    let budgets = vec![entry("Food", "500"), entry("Transport", "200")];
    let spent: HashMap<&str, Decimal> = [("Food", d("400")), ("Transport", d("50"))].into();
    let report = evaluate_all(&budgets, |c| spent.get(c).copied());

    let order: Vec<&str> = report.records.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(order, ["Food", "Transport"]);
    assert_eq!(report.records[0].percentage, d("80"));
    assert_eq!(report.records[1].percentage, d("25"));

    let s = &report.stats;
    assert_eq!(s.total_budget, d("700"));
    assert_eq!(s.total_spent, d("450"));
    assert_eq!(s.total_remaining, d("250"));
    assert_eq!(s.overall_percentage.round_dp(2), d("64.29"));
    assert_eq!(s.categories_over_budget, 0);
    assert_eq!(s.categories_on_track, 1);
}

#[test]
fn evaluate_all_puts_most_utilized_first_and_keeps_ties_stable() {
    let budgets = vec![
        entry("Books", "100"),
        entry("Coffee", "10"),
        entry("Dining", "200"),
        entry("Games", "40"),
    ];
    let spent: HashMap<&str, Decimal> = [
        ("Books", d("50")),
        ("Coffee", d("12")),
        ("Dining", d("100")),
    ]
    .into();
    let report = evaluate_all(&budgets, |c| spent.get(c).copied());

    let order: Vec<&str> = report.records.iter().map(|r| r.category.as_str()).collect();
    // Books and Dining are both at 50%; Games has no spend at all.
    assert_eq!(order, ["Coffee", "Books", "Dining", "Games"]);
    assert_eq!(report.records[3].spent, Decimal::ZERO);
    assert_eq!(report.stats.categories_over_budget, 1);
    assert_eq!(report.stats.categories_on_track, 3);

    let budget_sum: Decimal = report.records.iter().map(|r| r.budget_amount).sum();
    let spent_sum: Decimal = report.records.iter().map(|r| r.spent).sum();
    assert_eq!(budget_sum, report.stats.total_budget);
    assert_eq!(spent_sum, report.stats.total_spent);
}

#[test]
fn evaluate_all_on_empty_input_is_all_zero() {
    let report = evaluate_all(&[], |_| Some(d("10")));
    assert!(report.records.is_empty());
    assert_eq!(report.stats, AggregateStats::default());
    assert_eq!(report.stats.overall_percentage, Decimal::ZERO);
}

#[test]
fn alerts_grade_categories_past_eighty_percent() {
    let budgets = vec![
        entry("Fun", "100"),
        entry("Gifts", "0"),
        entry("Misc", "100"),
        entry("Rent", "100"),
        entry("Food", "100"),
    ];
    let spent: HashMap<&str, Decimal> = [
        ("Fun", d("85")),
        ("Gifts", d("50")),
        ("Misc", d("80")),
        ("Rent", d("95")),
        ("Food", d("110")),
    ]
    .into();
    let report = evaluate_all(&budgets, |c| spent.get(c).copied());
    let list = alerts(&report.records, "USD");

    let got: Vec<(&str, AlertLevel, &str)> = list
        .iter()
        .map(|a| (a.category.as_str(), a.level, a.message.as_str()))
        .collect();
    assert_eq!(
        got,
        [
            ("Food", AlertLevel::Danger, "Over budget by 10.00 USD"),
            ("Rent", AlertLevel::Warning, "Only 5.00 USD remaining"),
            ("Fun", AlertLevel::Info, "85% of budget used"),
        ]
    );
}

#[test]
fn records_serialize_with_snake_case_status() {
    let r = evaluate(&entry("Food", "100"), d("120"));
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["status"], "over_budget");
    assert_eq!(v["is_over"], true);
    assert_eq!(v["category"], "Food");
}

#[test]
fn alert_levels_switch_just_past_ninety_and_one_hundred() {
    let budgets = vec![
        entry("Ninety", "100"),
        entry("Full", "100"),
        entry("Past", "100"),
    ];
    let spent: HashMap<&str, Decimal> = [
        ("Ninety", d("90")),
        ("Full", d("100")),
        ("Past", d("100.01")),
    ]
    .into();
    let report = evaluate_all(&budgets, |c| spent.get(c).copied());
    let list = alerts(&report.records, "USD");

    let got: Vec<(&str, AlertLevel, &str)> = list
        .iter()
        .map(|a| (a.category.as_str(), a.level, a.message.as_str()))
        .collect();
    assert_eq!(
        got,
        [
            ("Past", AlertLevel::Danger, "Over budget by 0.01 USD"),
            ("Full", AlertLevel::Warning, "Only 0.00 USD remaining"),
            ("Ninety", AlertLevel::Info, "90% of budget used"),
        ]
    );
}
