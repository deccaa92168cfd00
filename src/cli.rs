// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Budget month (defaults to the current month)")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Monthly per-category budgets and their progress")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .about("Set or update the budget for a category and month")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("edit")
                .about("Change the amount of an existing budget")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(
            Command::new("rm").about("Delete a budget").arg(
                Arg::new("id")
                    .long("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
        .subcommand(
            Command::new("list")
                .about("List budgets, optionally for one month")
                .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("progress")
                .about("Show spending against each budget")
                .arg(month_arg())
                .arg(Arg::new("category").long("category"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("alerts")
                .about("Categories approaching or over their limit")
                .arg(month_arg())
                .args(json_args()),
        )
        .subcommand(
            Command::new("summary")
                .about("Count, total and spread of a month's budgets")
                .arg(month_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print pretty JSON"),
                ),
        )
        .subcommand(Command::new("categories").about("Suggested budget categories"))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and list income and expenses")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .value_name("YYYY-MM-DD"),
                )
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .default_value("expense")
                        .help("income|expense"),
                )
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                )
                .args(json_args()),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data to a file")
        .subcommand_required(true)
        .subcommand(
            Command::new("progress")
                .about("Export a month's budget progress")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .required(true)
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true))
                .arg(month_arg()),
        )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Show or change settings")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Print all settings"))
        .subcommand(
            Command::new("set")
                .about("Change a setting (default_user, currency)")
                .arg(Arg::new("key").long("key").required(true))
                .arg(Arg::new("value").long("value").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("budgetpace")
        .version(clap::crate_version!())
        .about("Monthly budgets with progress tracking and alerts")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Whose budgets to use (defaults to the default_user setting)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(budget_cmd())
        .subcommand(tx_cmd())
        .subcommand(export_cmd())
        .subcommand(config_cmd())
}
