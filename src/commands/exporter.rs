// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::store;
use crate::utils::{active_user, display_datetime, id_for_collection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let collection_name = sub.get_one::<String>("collection").unwrap();

    let user = active_user(conn)?;
    let collection_id = id_for_collection(conn, user.id, collection_name)?;
    let fetched = store::transactions_for_collection(conn, collection_id, user.id)?;
    for warning in &fetched.warnings {
        eprintln!("warning: {}", warning);
    }

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "occurred_at", "name", "category", "flow", "amount", "mode"])?;
            for t in &fetched.transactions {
                wtr.write_record([
                    t.id.to_string(),
                    display_datetime(t.occurred_at),
                    t.name.clone(),
                    t.category.clone(),
                    t.flow_type.as_str().to_string(),
                    t.amount.to_string(),
                    t.mode.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for t in &fetched.transactions {
                items.push(json!({
                    "id": t.id,
                    "occurred_at": display_datetime(t.occurred_at),
                    "name": t.name,
                    "category": t.category,
                    "flow": t.flow_type.as_str(),
                    "amount": t.amount.to_string(),
                    "mode": t.mode,
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
