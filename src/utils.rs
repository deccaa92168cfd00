// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::BudgetError;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub const SETTING_DEFAULT_USER: &str = "default_user";
pub const SETTING_CURRENCY: &str = "currency";
pub const KNOWN_SETTINGS: [&str; 2] = [SETTING_DEFAULT_USER, SETTING_CURRENCY];

const FALLBACK_USER: &str = "default";
const FALLBACK_CURRENCY: &str = "USD";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts exactly `YYYY-MM` with a real month number.
pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    let shaped = s.len() == 7 && s.as_bytes()[4] == b'-';
    if !shaped || NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").is_err() {
        return Err(BudgetError::InvalidMonth(s.to_string()).into());
    }
    Ok(s.to_string())
}

/// The month containing today's local date. Only the CLI edge calls this.
pub fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

pub fn resolve_month(sub: &clap::ArgMatches) -> Result<String> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m),
        None => Ok(current_month()),
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn decimal_column(raw: &str, what: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in database", what, raw))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{:.2} {}", d, ccy)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !KNOWN_SETTINGS.contains(&key) {
        return Err(BudgetError::UnknownSetting(key.to_string()).into());
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    tracing::info!(key, value, "setting updated");
    Ok(())
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, SETTING_CURRENCY)?.unwrap_or_else(|| FALLBACK_CURRENCY.to_string()))
}

pub fn default_user(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, SETTING_DEFAULT_USER)?.unwrap_or_else(|| FALLBACK_USER.to_string()))
}

/// `--user` wins over the `default_user` setting.
pub fn resolve_user(conn: &Connection, sub: &clap::ArgMatches) -> Result<String> {
    match sub.try_get_one::<String>("user").ok().flatten() {
        Some(u) if !u.trim().is_empty() => Ok(u.trim().to_string()),
        _ => default_user(conn),
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Text bar for a percentage already clamped to `0..=100`.
pub fn progress_bar(display_percentage: Decimal, width: usize) -> String {
    let filled = (display_percentage.max(Decimal::ZERO) * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .trunc()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
