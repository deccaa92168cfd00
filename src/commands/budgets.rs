// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::spend_by_category;
use crate::errors::BudgetError;
use crate::models::{Budget, BudgetEntry, BudgetSummary, SUGGESTED_CATEGORIES};
use crate::progress::{self, ProgressReport};
use crate::utils::{
    decimal_column, fmt_money, get_currency, maybe_print_json, parse_decimal, parse_month,
    pretty_table, progress_bar, resolve_month, resolve_user,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

const BAR_WIDTH: usize = 20;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("progress", sub)) => show_progress(conn, sub)?,
        Some(("alerts", sub)) => alerts(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("categories", _)) => categories(),
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Created,
    Updated,
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(BudgetError::InvalidAmount(amount).into());
    }
    Ok(())
}

/// Inserts the budget, or replaces the amount of the one already set for
/// the same user, category and month.
pub fn set_budget(
    conn: &Connection,
    user: &str,
    category: &str,
    month: &str,
    amount: Decimal,
) -> Result<SetOutcome> {
    let category = category.trim();
    if category.is_empty() {
        return Err(BudgetError::EmptyCategory.into());
    }
    let month = parse_month(month)?;
    ensure_positive(amount)?;

    let tx = conn.unchecked_transaction()?;
    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM budgets WHERE user=?1 AND category=?2 AND month=?3",
            params![user, category, &month],
            |r| r.get(0),
        )
        .optional()?;
    tx.execute(
        "INSERT INTO budgets(user, category, month, amount) VALUES (?1,?2,?3,?4)
         ON CONFLICT(user, category, month)
         DO UPDATE SET amount=excluded.amount, updated_at=datetime('now')",
        params![user, category, &month, amount.to_string()],
    )?;
    tx.commit()?;
    let outcome = if existing.is_some() {
        SetOutcome::Updated
    } else {
        SetOutcome::Created
    };
    tracing::info!(user, category, month = %month, %amount, ?outcome, "budget set");
    Ok(outcome)
}

pub fn edit_budget(conn: &Connection, user: &str, id: i64, amount: Decimal) -> Result<()> {
    ensure_positive(amount)?;
    let n = conn.execute(
        "UPDATE budgets SET amount=?1, updated_at=datetime('now') WHERE id=?2 AND user=?3",
        params![amount.to_string(), id, user],
    )?;
    if n == 0 {
        return Err(BudgetError::NotFound.into());
    }
    tracing::info!(user, id, %amount, "budget updated");
    Ok(())
}

pub fn delete_budget(conn: &Connection, user: &str, id: i64) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM budgets WHERE id=?1 AND user=?2",
        params![id, user],
    )?;
    if n == 0 {
        return Err(BudgetError::NotFound.into());
    }
    tracing::info!(user, id, "budget deleted");
    Ok(())
}

pub fn find_budget(conn: &Connection, user: &str, id: i64) -> Result<Option<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, user, category, month, amount, created_at, updated_at
         FROM budgets WHERE id=?1 AND user=?2",
    )?;
    let mut rows = stmt.query(params![id, user])?;
    match rows.next()? {
        Some(r) => Ok(Some(budget_from_row(r)?)),
        None => Ok(None),
    }
}

fn budget_from_row(r: &rusqlite::Row<'_>) -> Result<Budget> {
    let amount: String = r.get(4)?;
    Ok(Budget {
        id: r.get(0)?,
        user: r.get(1)?,
        category: r.get(2)?,
        month: r.get(3)?,
        amount: decimal_column(&amount, "budget amount")?,
        created_at: r.get(5)?,
        updated_at: r.get(6)?,
    })
}

/// Budgets for one user, newest month first and alphabetical within a month.
pub fn list_budgets(conn: &Connection, user: &str, month: Option<&str>) -> Result<Vec<Budget>> {
    let mut sql = String::from(
        "SELECT id, user, category, month, amount, created_at, updated_at
         FROM budgets WHERE user=?1",
    );
    let mut stmt;
    let mut rows = if let Some(month) = month {
        sql.push_str(" AND month=?2 ORDER BY category");
        stmt = conn.prepare(&sql)?;
        stmt.query(params![user, month])?
    } else {
        sql.push_str(" ORDER BY month DESC, category");
        stmt = conn.prepare(&sql)?;
        stmt.query(params![user])?
    };
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(budget_from_row(r)?);
    }
    Ok(data)
}

/// Evaluator input for one user and month, ordered by category.
pub fn budget_entries(conn: &Connection, user: &str, month: &str) -> Result<Vec<BudgetEntry>> {
    Ok(list_budgets(conn, user, Some(month))?
        .iter()
        .map(BudgetEntry::from)
        .collect())
}

pub fn progress_report(conn: &Connection, user: &str, month: &str) -> Result<ProgressReport> {
    let entries = budget_entries(conn, user, month)?;
    let spent = spend_by_category(conn, user, month)?;
    let report = progress::evaluate_all(&entries, |cat| spent.get(cat).copied());
    tracing::debug!(
        user,
        month,
        categories = report.records.len(),
        over = report.stats.categories_over_budget,
        "evaluated budget progress"
    );
    Ok(report)
}

/// Progress of a single category, in the shape served to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProgress {
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub status: &'static str,
}

pub fn category_progress(
    conn: &Connection,
    user: &str,
    month: &str,
    category: &str,
) -> Result<CategoryProgress> {
    let category = category.trim();
    let entry = budget_entries(conn, user, month)?
        .into_iter()
        .find(|e| e.category == category)
        .ok_or(BudgetError::NotFound)?;
    let spent = spend_by_category(conn, user, month)?
        .get(category)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let record = progress::evaluate(&entry, spent);
    Ok(CategoryProgress {
        category: record.category,
        budget: record.budget_amount,
        spent: record.spent,
        remaining: record.remaining,
        percentage: record.percentage,
        status: if record.is_over { "over" } else { "ok" },
    })
}

pub fn budget_summary(conn: &Connection, user: &str, month: &str) -> Result<BudgetSummary> {
    let amounts: Vec<Decimal> = budget_entries(conn, user, month)?
        .into_iter()
        .map(|e| e.amount)
        .collect();
    if amounts.is_empty() {
        return Ok(BudgetSummary::default());
    }
    let total = amounts
        .iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(*a));
    Ok(BudgetSummary {
        total_categories: amounts.len(),
        total_budget: total,
        min_budget: amounts.iter().min().copied(),
        max_budget: amounts.iter().max().copied(),
        avg_budget: Some(total / Decimal::from(amounts.len())),
    })
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let month = resolve_month(sub)?;
    let cat = sub
        .get_one::<String>("category")
        .context("--category is required")?;
    let amount = parse_decimal(sub.get_one::<String>("amount").context("--amount is required")?)?;
    let verb = match set_budget(conn, &user, cat, &month, amount)? {
        SetOutcome::Created => "set",
        SetOutcome::Updated => "updated",
    };
    println!("Budget for {} / {} {} to {}", cat.trim(), month, verb, amount);
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let id = *sub.get_one::<i64>("id").context("--id is required")?;
    let amount = parse_decimal(sub.get_one::<String>("amount").context("--amount is required")?)?;
    let before = find_budget(conn, &user, id)?.ok_or(BudgetError::NotFound)?;
    edit_budget(conn, &user, id, amount)?;
    println!(
        "Budget for {} / {} updated from {} to {}",
        before.category, before.month, before.amount, amount
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let id = *sub.get_one::<i64>("id").context("--id is required")?;
    delete_budget(conn, &user, id)?;
    println!("Budget {} deleted", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = resolve_user(conn, sub)?;
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let data = list_budgets(conn, &user, month.as_deref())?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.month.clone(),
                    b.category.clone(),
                    format!("{:.2}", b.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Month", "Category", "Budget"], rows)
        );
    }
    Ok(())
}

/// A record plus the display label and color of its status.
#[derive(Debug, Serialize)]
pub struct ProgressRow<'a> {
    #[serde(flatten)]
    pub record: &'a progress::ProgressRecord,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn progress_row(record: &progress::ProgressRecord) -> ProgressRow<'_> {
    ProgressRow {
        record,
        label: record.status.label(),
        color: record.status.color(),
    }
}

#[derive(Serialize)]
struct ProgressOutput<'a> {
    month: &'a str,
    progress: Vec<ProgressRow<'a>>,
    stats: &'a progress::AggregateStats,
}

fn show_progress(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = resolve_user(conn, sub)?;
    let month = resolve_month(sub)?;

    if let Some(cat) = sub.get_one::<String>("category") {
        let p = category_progress(conn, &user, &month, cat)?;
        if !maybe_print_json(json_flag, jsonl_flag, &p)? {
            let rows = vec![vec![
                p.category.clone(),
                format!("{:.2}", p.budget),
                format!("{:.2}", p.spent),
                format!("{:.2}", p.remaining),
                format!("{:.1}%", p.percentage),
                p.status.to_string(),
            ]];
            println!(
                "{}",
                pretty_table(
                    &["Category", "Budget", "Spent", "Remaining", "Used", "Status"],
                    rows
                )
            );
        }
        return Ok(());
    }

    let report = progress_report(conn, &user, &month)?;
    let out = ProgressOutput {
        month: &month,
        progress: report
            .records
            .iter()
            .map(progress_row)
            .collect(),
        stats: &report.stats,
    };
    if json_flag || jsonl_flag {
        if jsonl_flag {
            maybe_print_json(false, true, &out.progress)?;
        } else {
            maybe_print_json(true, false, &out)?;
        }
        return Ok(());
    }

    let ccy = get_currency(conn)?;
    let rows = report
        .records
        .iter()
        .map(|r| {
            vec![
                r.category.clone(),
                format!("{:.2}", r.budget_amount),
                format!("{:.2}", r.spent),
                format!("{:.2}", r.remaining),
                format!("{} {:.1}%", progress_bar(r.display_percentage, BAR_WIDTH), r.percentage),
                r.status.label().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Budget", "Spent", "Remaining", "Progress", "Status"],
            rows
        )
    );
    let s = &report.stats;
    println!(
        "{}: budget {}, spent {} ({:.1}%), remaining {}; {} over budget, {} on track",
        month,
        fmt_money(&s.total_budget, &ccy),
        fmt_money(&s.total_spent, &ccy),
        s.overall_percentage,
        fmt_money(&s.total_remaining, &ccy),
        s.categories_over_budget,
        s.categories_on_track
    );
    Ok(())
}

fn alerts(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = resolve_user(conn, sub)?;
    let month = resolve_month(sub)?;
    let report = progress_report(conn, &user, &month)?;
    let list = progress::alerts(&report.records, &get_currency(conn)?);
    if !maybe_print_json(json_flag, jsonl_flag, &list)? {
        if list.is_empty() {
            println!("No budget alerts for {}", month);
            return Ok(());
        }
        let rows = list
            .iter()
            .map(|a| {
                vec![
                    a.level.as_str().to_string(),
                    a.category.clone(),
                    a.message.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Level", "Category", "Message"], rows));
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let month = resolve_month(sub)?;
    let s = budget_summary(conn, &user, &month)?;
    if !maybe_print_json(sub.get_flag("json"), false, &s)? {
        let opt = |v: Option<Decimal>| v.map(|d| format!("{:.2}", d)).unwrap_or("-".into());
        let rows = vec![vec![
            s.total_categories.to_string(),
            format!("{:.2}", s.total_budget),
            opt(s.min_budget),
            opt(s.max_budget),
            opt(s.avg_budget),
        ]];
        println!(
            "{}",
            pretty_table(&["Categories", "Total", "Min", "Max", "Average"], rows)
        );
    }
    Ok(())
}

fn categories() {
    let rows = SUGGESTED_CATEGORIES
        .iter()
        .map(|c| vec![c.to_string()])
        .collect();
    println!("{}", pretty_table(&["Category"], rows));
}
