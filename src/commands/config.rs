// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::db_path;
use crate::utils::{KNOWN_SETTINGS, get_setting, pretty_table, set_setting};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn)?,
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").context("--key is required")?;
            let value = sub
                .get_one::<String>("value")
                .context("--value is required")?;
            let value = if key.trim() == crate::utils::SETTING_CURRENCY {
                value.trim().to_uppercase()
            } else {
                value.trim().to_string()
            };
            set_setting(conn, key.trim(), &value)?;
            println!("{} = {}", key.trim(), value);
        }
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();
    for key in KNOWN_SETTINGS {
        let v = get_setting(conn, key)?.unwrap_or_else(|| "(unset)".into());
        rows.push(vec![key.to_string(), v]);
    }
    rows.push(vec!["database".into(), db_path()?.display().to_string()]);
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
