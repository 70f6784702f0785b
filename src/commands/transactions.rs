// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::aggregate;
use crate::store::{self, NewTransaction, TransactionPatch};
use crate::utils::{
    active_user, display_datetime, id_for_collection, maybe_print_json, parse_date, parse_flow,
    parse_time, positive_amount, pretty_table, require_category, require_name,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn)?;
    let collection_name = sub.get_one::<String>("collection").unwrap();
    let collection_id = id_for_collection(conn, user.id, collection_name)?;

    let name = require_name(sub.get_one::<String>("name").unwrap())?;
    let category = require_category(sub.get_one::<String>("category").unwrap())?;
    let flow_type = parse_flow(sub.get_one::<String>("flow").unwrap())?;
    let amount = positive_amount(sub.get_one::<String>("amount").unwrap())?;
    let mode = sub.get_one::<String>("mode").map(|s| s.to_string());

    // Date and time are combined exactly once, here at the input edge.
    let now = chrono::Local::now().naive_local();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => now.date(),
    };
    let time = match sub.get_one::<String>("time") {
        Some(s) => parse_time(s)?,
        None => now.time(),
    };

    store::insert_transaction(
        conn,
        &NewTransaction {
            name: &name,
            category: &category,
            flow_type,
            amount,
            mode: mode.as_deref(),
            occurred_at: date.and_time(time),
            collection_id,
            user_id: user.id,
        },
    )?;
    println!(
        "Recorded {} {} '{}' in '{}'",
        flow_type.as_str(),
        amount,
        name,
        collection_name
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.when.clone(),
                    r.name.clone(),
                    r.category.clone(),
                    r.flow.clone(),
                    r.amount.clone(),
                    r.mode.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "When", "Name", "Category", "Flow", "Amount", "Mode"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub when: String,
    pub name: String,
    pub category: String,
    pub flow: String,
    pub amount: String,
    pub mode: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = active_user(conn)?;
    let collection_name = sub.get_one::<String>("collection").unwrap();
    let collection_id = id_for_collection(conn, user.id, collection_name)?;

    let fetched = store::transactions_for_collection(conn, collection_id, user.id)?;
    for warning in &fetched.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut transactions = fetched.transactions;
    if let Some(flow) = sub.get_one::<String>("flow") {
        let flow = parse_flow(flow)?;
        transactions.retain(|t| t.flow_type == flow);
    }
    if let Some(category) = sub.get_one::<String>("category") {
        transactions.retain(|t| t.category.eq_ignore_ascii_case(category));
    }
    transactions.sort_by(|a, b| aggregate::cmp_newest_first(a.occurred_at, b.occurred_at));
    if let Some(&limit) = sub.get_one::<usize>("limit") {
        transactions.truncate(limit);
    }

    Ok(transactions
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            when: display_datetime(t.occurred_at),
            name: t.name,
            category: t.category,
            flow: t.flow_type.as_str().to_string(),
            amount: t.amount.to_string(),
            mode: t.mode.unwrap_or_default(),
        })
        .collect())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn)?;
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;

    let mut patch = TransactionPatch::default();
    if let Some(name) = sub.get_one::<String>("name") {
        patch.name = Some(require_name(name)?);
    }
    if let Some(category) = sub.get_one::<String>("category") {
        patch.category = Some(require_category(category)?);
    }
    if let Some(flow) = sub.get_one::<String>("flow") {
        patch.flow_type = Some(parse_flow(flow)?);
    }
    if let Some(amount) = sub.get_one::<String>("amount") {
        patch.amount = Some(positive_amount(amount)?);
    }
    if let Some(mode) = sub.get_one::<String>("mode") {
        patch.mode = Some(mode.to_string());
    }
    match (sub.get_one::<String>("date"), sub.get_one::<String>("time")) {
        (Some(d), Some(t)) => patch.occurred_at = Some(parse_date(d)?.and_time(parse_time(t)?)),
        (Some(d), None) => patch.occurred_at = Some(parse_date(d)?.and_time(NaiveTime::MIN)),
        (None, Some(_)) => anyhow::bail!("--time requires --date"),
        (None, None) => {}
    }
    if patch.is_empty() {
        anyhow::bail!("Nothing to update; pass at least one field");
    }

    let updated = store::update_transaction(conn, id, user.id, &patch)?;
    if updated == 0 {
        anyhow::bail!("No transaction {} for the active user", id);
    }
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = active_user(conn)?;
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let deleted = store::delete_transaction(conn, id, user.id)?;
    if deleted == 0 {
        anyhow::bail!("No transaction {} for the active user", id);
    }
    println!("Removed transaction {}", id);
    Ok(())
}
