// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use regex::RegexBuilder;
use rusqlite::Connection;
use serde::Serialize;

use crate::aggregate;
use crate::store;
use crate::utils::{active_user, display_datetime, maybe_print_json, pretty_table};

#[derive(Serialize)]
struct HistoryRow {
    id: i64,
    when: String,
    collection: String,
    name: String,
    category: String,
    flow: String,
    amount: String,
    mode: String,
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = active_user(conn)?;
    let settings = store::load_settings(conn, user.id)?;

    let merged = aggregate::user_history(conn, user.id)?;
    for note in &merged.skipped {
        eprintln!("warning: {}", note);
    }
    for warning in &merged.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut entries = merged.entries;
    if let Some(pattern) = sub.get_one::<String>("search") {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;
        entries.retain(|e| {
            let t = &e.transaction;
            re.is_match(&t.name)
                || re.is_match(&t.category)
                || t.mode.as_deref().map(|m| re.is_match(m)).unwrap_or(false)
                || re.is_match(&t.amount.to_string())
        });
    }
    if let Some(&limit) = sub.get_one::<usize>("limit") {
        entries.truncate(limit);
    }

    let rows: Vec<HistoryRow> = entries
        .into_iter()
        .map(|e| {
            let t = e.transaction;
            HistoryRow {
                id: t.id,
                when: display_datetime(t.occurred_at),
                collection: e.collection_name,
                name: t.name,
                category: t.category,
                flow: t.flow_type.as_str().to_string(),
                amount: format!("{} {}", settings.currency, t.amount),
                mode: t.mode.unwrap_or_default(),
            }
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.when,
                    r.collection,
                    r.name,
                    r.category,
                    r.flow,
                    r.amount,
                    r.mode,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID",
                    "When",
                    "Collection",
                    "Name",
                    "Category",
                    "Flow",
                    "Amount",
                    "Mode",
                ],
                data,
            )
        );
    }
    Ok(())
}
