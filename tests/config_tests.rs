// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetpace::commands::config;
use budgetpace::errors::BudgetError;
use budgetpace::utils::{default_user, get_currency, get_setting, parse_month, set_setting};
use budgetpace::{cli, db, logging};

#[test]
fn settings_fall_back_until_set() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(default_user(&conn).unwrap(), "default");
    assert_eq!(get_currency(&conn).unwrap(), "USD");

    set_setting(&conn, "default_user", "qiao").unwrap();
    set_setting(&conn, "default_user", "ash").unwrap();
    assert_eq!(default_user(&conn).unwrap(), "ash");
}

#[test]
fn unknown_settings_are_refused() {
    let conn = db::open_in_memory().unwrap();
    let err = set_setting(&conn, "theme", "dark").unwrap_err();
    assert_eq!(
        err.downcast::<BudgetError>().unwrap(),
        BudgetError::UnknownSetting("theme".into())
    );
    assert!(get_setting(&conn, "theme").unwrap().is_none());
}

#[test]
fn cli_config_set_uppercases_currency() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from([
        "budgetpace",
        "config",
        "set",
        "--key",
        "currency",
        "--value",
        " eur ",
    ]);
    if let Some(("config", config_m)) = matches.subcommand() {
        config::handle(&conn, config_m).unwrap();
    } else {
        panic!("config command not parsed");
    }
    assert_eq!(get_currency(&conn).unwrap(), "EUR");
}

#[test]
fn month_must_be_year_dash_month() {
    assert_eq!(parse_month(" 2025-02 ").unwrap(), "2025-02");
    assert!(parse_month("2025-00").is_err());
    assert!(parse_month("2025/02").is_err());
}

#[test]
fn tracing_init_is_idempotent() {
    logging::init_tracing();
    logging::init_tracing();
}
