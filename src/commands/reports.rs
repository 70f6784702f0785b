// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::FlowType;
use crate::store;
use crate::utils::{active_user, maybe_print_json, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = sub.get_one::<usize>("months").copied().unwrap_or(12);
    let user = active_user(conn)?;

    let fetched = store::transactions_for_user(conn, user.id)?;
    for warning in &fetched.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in &fetched.transactions {
        let month = t
            .occurred_at
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_else(|| "(undated)".to_string());
        let entry = map.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.flow_type {
            FlowType::Income => entry.0 += t.amount,
            FlowType::Expense => entry.1 += t.amount,
        }
    }

    let mut data = Vec::new();
    for (month, (income, expense)) in map.iter().rev().take(months) {
        data.push(vec![
            month.clone(),
            format!("{:.2}", income),
            format!("{:.2}", expense),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Month", "Income", "Expense"], data));
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let user = active_user(conn)?;

    let fetched = store::transactions_for_user(conn, user.id)?;
    for warning in &fetched.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for t in &fetched.transactions {
        if t.flow_type != FlowType::Expense {
            continue;
        }
        let Some(occurred_at) = t.occurred_at else {
            continue;
        };
        if occurred_at.format("%Y-%m").to_string() != month {
            continue;
        }
        *agg.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
    }

    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    let data: Vec<Vec<String>> = items
        .into_iter()
        .map(|(category, amount)| vec![category, format!("{:.2}", amount)])
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}
