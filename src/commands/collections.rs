// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::aggregate;
use crate::store;
use crate::utils::{
    active_user, format_amount, id_for_collection, maybe_print_json, pretty_table, require_name,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = require_name(sub.get_one::<String>("name").unwrap())?;
            let user = active_user(conn)?;
            store::insert_collection(conn, &name, user.id)?;
            println!("Added collection '{}'", name);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let new_name = require_name(sub.get_one::<String>("new_name").unwrap())?;
            let user = active_user(conn)?;
            let id = id_for_collection(conn, user.id, name)?;
            store::rename_collection(conn, id, &new_name)?;
            println!("Renamed collection '{}' to '{}'", name, new_name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let user = active_user(conn)?;
            let id = id_for_collection(conn, user.id, name)?;
            store::delete_collection(conn, id)?;
            println!("Removed collection '{}' and its transactions", name);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct CollectionRow {
    name: String,
    balance: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let search = sub.get_one::<String>("search").map(|s| s.to_lowercase());
    let user = active_user(conn)?;
    let settings = store::load_settings(conn, user.id)?;

    let mut rows = Vec::new();
    for collection in store::collections_for_user(conn, user.id)? {
        if let Some(ref needle) = search {
            if !collection.name.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }
        // Each collection resolves independently; one unreadable collection
        // fails the listing rather than masquerading as a zero balance.
        let balance = aggregate::collection_balance(conn, collection.id, user.id)?;
        rows.push(CollectionRow {
            name: collection.name,
            balance: format_amount(Some(balance), &settings.currency),
        });
    }

    if rows.is_empty() && search.is_some() {
        println!("No collection name matches the search.");
        return Ok(());
    }
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .into_iter()
            .map(|r| vec![r.name, r.balance])
            .collect::<Vec<_>>();
        println!("{}", pretty_table(&["Collection", "Balance"], data));
    }
    Ok(())
}
