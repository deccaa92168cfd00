// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::budgets::progress_report;
use crate::errors::BudgetError;
use crate::utils::{resolve_month, resolve_user};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("progress", sub)) => export_progress(conn, sub),
        _ => Ok(()),
    }
}

fn export_progress(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .context("--format is required")?
        .to_lowercase();
    let out = sub.get_one::<String>("out").context("--out is required")?;
    if fmt != "csv" && fmt != "json" {
        return Err(BudgetError::UnknownFormat(fmt).into());
    }
    let user = resolve_user(conn, sub)?;
    let month = resolve_month(sub)?;
    let report = progress_report(conn, &user, &month)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out))?;
            wtr.write_record([
                "month",
                "category",
                "budget",
                "spent",
                "remaining",
                "percentage",
                "status",
                "over",
            ])?;
            for r in &report.records {
                wtr.write_record([
                    month.clone(),
                    r.category.clone(),
                    format!("{:.2}", r.budget_amount),
                    format!("{:.2}", r.spent),
                    format!("{:.2}", r.remaining),
                    format!("{:.2}", r.percentage),
                    r.status.label().to_string(),
                    r.is_over.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = report
                .records
                .iter()
                .map(|r| {
                    json!({
                        "category": r.category,
                        "budget": format!("{:.2}", r.budget_amount),
                        "spent": format!("{:.2}", r.spent),
                        "remaining": format!("{:.2}", r.remaining),
                        "percentage": format!("{:.2}", r.percentage),
                        "status": r.status.label(),
                        "color": r.status.color(),
                        "over": r.is_over,
                    })
                })
                .collect();
            let doc = json!({
                "user": user,
                "month": month,
                "progress": items,
                "stats": report.stats,
            });
            std::fs::write(out, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("Failed to write {}", out))?;
        }
    }
    tracing::info!(out = %out, format = %fmt, rows = report.records.len(), "progress exported");
    println!("Exported {} progress to {}", month, out);
    Ok(())
}
