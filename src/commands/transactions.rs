// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::BudgetError;
use crate::models::{Transaction, TxKind};
use crate::utils::{
    decimal_column, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
    resolve_user,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let date = parse_date(sub.get_one::<String>("date").context("--date is required")?)?;
    let category = sub
        .get_one::<String>("category")
        .context("--category is required")?;
    let amount = parse_decimal(sub.get_one::<String>("amount").context("--amount is required")?)?;
    let kind = sub
        .get_one::<String>("kind")
        .context("--kind is required")?
        .parse::<TxKind>()?;
    let description = sub.get_one::<String>("description").map(|s| s.as_str());

    add_transaction(conn, &user, date, category, amount, kind, description)?;
    println!(
        "Recorded {} of {} in '{}' on {} (user: {})",
        kind,
        amount,
        category.trim(),
        date,
        user
    );
    Ok(())
}

pub fn add_transaction(
    conn: &Connection,
    user: &str,
    date: NaiveDate,
    category: &str,
    amount: Decimal,
    kind: TxKind,
    description: Option<&str>,
) -> Result<i64> {
    let category = category.trim();
    if category.is_empty() {
        return Err(BudgetError::EmptyCategory.into());
    }
    if amount <= Decimal::ZERO {
        return Err(BudgetError::InvalidTransactionAmount(amount).into());
    }
    conn.execute(
        "INSERT INTO transactions(user, date, amount, category, description, kind)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            date.to_string(),
            amount.to_string(),
            category,
            description,
            kind.as_str()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, user, category, %amount, %kind, "transaction recorded");
    Ok(id)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = resolve_user(conn, sub)?;
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|c| c.trim());
    let limit = sub.get_one::<usize>("limit").copied();

    let data = list_transactions(conn, &user, month.as_deref(), category, limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.category.clone(),
                    format!("{:.2}", t.amount),
                    t.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Category", "Amount", "Description"],
                rows
            )
        );
    }
    Ok(())
}

pub fn list_transactions(
    conn: &Connection,
    user: &str,
    month: Option<&str>,
    category: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, user, date, amount, category, description, kind FROM transactions WHERE user=?",
    );
    let mut params_vec: Vec<String> = vec![user.to_string()];

    if let Some(month) = month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = category {
        sql.push_str(" AND category=?");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = limit {
        let limit = i64::try_from(limit)
            .map_err(|_| anyhow::anyhow!("--limit {} is too large", limit))?;
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let d: String = r.get(2)?;
        let amt: String = r.get(3)?;
        let kind: String = r.get(6)?;
        data.push(Transaction {
            id: r.get(0)?,
            user: r.get(1)?,
            date: parse_date(&d)?,
            amount: decimal_column(&amt, "transaction amount")?,
            category: r.get(4)?,
            description: r.get(5)?,
            kind: kind.parse()?,
        });
    }
    Ok(data)
}

/// Sum of expense amounts per category for one user and month.
pub fn spend_by_category(
    conn: &Connection,
    user: &str,
    month: &str,
) -> Result<HashMap<String, Decimal>> {
    let mut stmt = conn.prepare_cached(
        "SELECT category, amount FROM transactions
         WHERE user=?1 AND substr(date,1,7)=?2 AND kind='expense'",
    )?;
    let mut rows = stmt.query(params![user, month])?;
    let mut spent: HashMap<String, Decimal> = HashMap::new();
    while let Some(r) = rows.next()? {
        let category: String = r.get(0)?;
        let amt: String = r.get(1)?;
        let amt = decimal_column(&amt, "transaction amount")?;
        let total = spent.entry(category).or_insert(Decimal::ZERO);
        *total = total.saturating_add(amt);
    }
    tracing::debug!(user, month, categories = spent.len(), "summed expenses");
    Ok(spent)
}
