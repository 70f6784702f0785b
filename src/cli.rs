// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn with_json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("cashbook")
        .about("Personal income/expense ledgers with dashboards and history")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(user_cmd())
        .subcommand(collection_cmd())
        .subcommand(tx_cmd())
        .subcommand(dashboard_cmd())
        .subcommand(history_cmd())
        .subcommand(report_cmd())
        .subcommand(settings_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Scan the ledger for data quality issues"))
}

fn user_cmd() -> Command {
    Command::new("user")
        .about("Manage local user profiles")
        .subcommand(
            Command::new("add")
                .about("Add a user (becomes active if none is)")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("email").long("email")),
        )
        .subcommand(Command::new("list").about("List users"))
        .subcommand(
            Command::new("switch")
                .about("Set the active user")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(Command::new("current").about("Show the active user"))
}

fn collection_cmd() -> Command {
    Command::new("collection")
        .about("Manage transaction collections")
        .subcommand(
            Command::new("add")
                .about("Create a collection")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(with_json_flags(
            Command::new("list")
                .about("List collections with their balances")
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Filter by name substring"),
                ),
        ))
        .subcommand(
            Command::new("rename")
                .about("Rename a collection")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("new_name").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a collection and its transactions")
                .arg(Arg::new("name").required(true)),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("collection")
                        .long("collection")
                        .short('c')
                        .required(true),
                )
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("flow")
                        .long("flow")
                        .required(true)
                        .help("income|expense"),
                )
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("mode").long("mode").help("e.g. Cash, Card, UPI"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD, defaults to today"),
                )
                .arg(
                    Arg::new("time")
                        .long("time")
                        .help("HH:MM[:SS], defaults to now"),
                ),
        )
        .subcommand(with_json_flags(
            Command::new("list")
                .about("List a collection's transactions, newest first")
                .arg(
                    Arg::new("collection")
                        .long("collection")
                        .short('c')
                        .required(true),
                )
                .arg(Arg::new("flow").long("flow").help("income|expense"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Update fields of a transaction")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("flow").long("flow").help("income|expense"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("mode").long("mode"))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
                .arg(
                    Arg::new("time")
                        .long("time")
                        .help("HH:MM[:SS], requires --date"),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").required(true)),
        )
}

fn dashboard_cmd() -> Command {
    with_json_flags(
        Command::new("dashboard")
            .about("Totals, category breakdown, and recent transactions")
            .arg(
                Arg::new("collection")
                    .long("collection")
                    .short('c')
                    .help("Defaults to the first collection"),
            )
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .help("Recent window size (default 10)"),
            )
            .arg(
                Arg::new("include-income")
                    .long("include-income")
                    .action(ArgAction::SetTrue)
                    .help("Also bucket income categories in the breakdown"),
            ),
    )
}

fn history_cmd() -> Command {
    with_json_flags(
        Command::new("history")
            .about("Merged transaction history across all collections")
            .arg(
                Arg::new("search")
                    .long("search")
                    .help("Regex matched against name, category, mode, and amount"),
            )
            .arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize)),
            ),
    )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Aggregated reports across all collections")
        .subcommand(with_json_flags(
            Command::new("cashflow")
                .about("Monthly income/expense totals")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(with_json_flags(
            Command::new("spend-by-category")
                .about("Expense totals per category for one month")
                .arg(Arg::new("month").long("month").required(true).help("YYYY-MM")),
        ))
}

fn settings_cmd() -> Command {
    Command::new("settings")
        .about("Per-user settings")
        .subcommand(Command::new("show").about("Show current settings"))
        .subcommand(
            Command::new("currency")
                .about("Set the currency symbol")
                .arg(Arg::new("symbol").required(true)),
        )
        .subcommand(
            Command::new("theme")
                .about("Set the theme")
                .arg(Arg::new("value").required(true).help("dark|light")),
        )
        .subcommand(
            Command::new("chart")
                .about("Include income categories in the breakdown chart")
                .arg(Arg::new("value").required(true).help("on|off")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage category allow-lists")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("flow")
                                .long("flow")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("flow")
                                .long("flow")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("mode")
                .about("Manage transaction modes")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data")
        .subcommand(
            Command::new("transactions")
                .about("Export a collection's transactions")
                .arg(
                    Arg::new("collection")
                        .long("collection")
                        .short('c')
                        .required(true),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}
