// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::FlowType;
use crate::store;
use crate::utils::{active_user, parse_flow, pretty_table, require_category, require_name};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn)?;
    let mut settings = store::load_settings(conn, user.id)?;

    match m.subcommand() {
        Some(("show", _)) => {
            let data = vec![
                vec!["Currency".to_string(), settings.currency.clone()],
                vec![
                    "Theme".to_string(),
                    if settings.dark_theme { "dark" } else { "light" }.to_string(),
                ],
                vec![
                    "Chart includes income".to_string(),
                    if settings.chart_include_income { "on" } else { "off" }.to_string(),
                ],
                vec![
                    "Expense categories".to_string(),
                    settings.expense_categories.join(", "),
                ],
                vec![
                    "Income categories".to_string(),
                    settings.income_categories.join(", "),
                ],
                vec![
                    "Transaction modes".to_string(),
                    settings.transaction_modes.join(", "),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], data));
        }
        Some(("currency", sub)) => {
            let symbol = sub.get_one::<String>("symbol").unwrap().trim().to_string();
            settings.currency = symbol.clone();
            store::save_settings(conn, user.id, &settings)?;
            println!("Currency set to '{}'", symbol);
        }
        Some(("theme", sub)) => {
            let value = sub.get_one::<String>("value").unwrap();
            settings.dark_theme = match value.as_str() {
                "dark" => true,
                "light" => false,
                other => anyhow::bail!("Theme must be 'dark' or 'light', got '{}'", other),
            };
            store::save_settings(conn, user.id, &settings)?;
            println!("Theme set to {}", value);
        }
        Some(("chart", sub)) => {
            let value = sub.get_one::<String>("value").unwrap();
            settings.chart_include_income = match value.as_str() {
                "on" => true,
                "off" => false,
                other => anyhow::bail!("Chart flag must be 'on' or 'off', got '{}'", other),
            };
            store::save_settings(conn, user.id, &settings)?;
            println!("Breakdown now {} income categories", if settings.chart_include_income { "includes" } else { "excludes" });
        }
        Some(("category", sub)) => {
            category(conn, user.id, &mut settings, sub)?;
        }
        Some(("mode", sub)) => {
            mode(conn, user.id, &mut settings, sub)?;
        }
        _ => {}
    }
    Ok(())
}

fn category(
    conn: &Connection,
    user_id: i64,
    settings: &mut crate::models::Settings,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let flow = parse_flow(sub.get_one::<String>("flow").unwrap())?;
            let name = require_category(sub.get_one::<String>("name").unwrap())?;
            let list = match flow {
                FlowType::Expense => &mut settings.expense_categories,
                FlowType::Income => &mut settings.income_categories,
            };
            if list.iter().any(|c| c.eq_ignore_ascii_case(&name)) {
                println!("Category '{}' already listed for {}", name, flow.as_str());
            } else {
                list.push(name.clone());
                store::save_settings(conn, user_id, settings)?;
                println!("Added {} category '{}'", flow.as_str(), name);
            }
        }
        Some(("rm", sub)) => {
            let flow = parse_flow(sub.get_one::<String>("flow").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap();
            let list = match flow {
                FlowType::Expense => &mut settings.expense_categories,
                FlowType::Income => &mut settings.income_categories,
            };
            let before = list.len();
            list.retain(|c| !c.eq_ignore_ascii_case(name));
            if list.len() == before {
                println!("No {} category '{}' listed", flow.as_str(), name);
            } else {
                store::save_settings(conn, user_id, settings)?;
                println!("Removed {} category '{}'", flow.as_str(), name);
            }
        }
        _ => {}
    }
    Ok(())
}

fn mode(
    conn: &Connection,
    user_id: i64,
    settings: &mut crate::models::Settings,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = require_name(sub.get_one::<String>("name").unwrap())?;
            if settings
                .transaction_modes
                .iter()
                .any(|v| v.eq_ignore_ascii_case(&name))
            {
                println!("Mode '{}' already listed", name);
            } else {
                settings.transaction_modes.push(name.clone());
                store::save_settings(conn, user_id, settings)?;
                println!("Added mode '{}'", name);
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let before = settings.transaction_modes.len();
            settings
                .transaction_modes
                .retain(|v| !v.eq_ignore_ascii_case(name));
            if settings.transaction_modes.len() == before {
                println!("No mode '{}' listed", name);
            } else {
                store::save_settings(conn, user_id, settings)?;
                println!("Removed mode '{}'", name);
            }
        }
        _ => {}
    }
    Ok(())
}
