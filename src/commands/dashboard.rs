// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::aggregate::{self, AggregateOptions, DEFAULT_RECENT_LIMIT};
use crate::store;
use crate::utils::{
    active_user, display_datetime, format_amount, maybe_print_json, pretty_table,
};

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = active_user(conn)?;
    let settings = store::load_settings(conn, user.id)?;

    let collections = store::collections_for_user(conn, user.id)?;
    let collection = match sub.get_one::<String>("collection") {
        Some(name) => collections
            .iter()
            .find(|c| &c.name == name)
            .with_context(|| format!("Collection '{}' not found", name))?,
        // Same default as the app screen: the first collection.
        None => collections
            .first()
            .context("No collections yet; run 'cashbook collection add <name>'")?,
    };

    let opts = AggregateOptions {
        recent_limit: sub
            .get_one::<usize>("limit")
            .copied()
            .unwrap_or(DEFAULT_RECENT_LIMIT),
        breakdown_includes_income: sub.get_flag("include-income")
            || settings.chart_include_income,
    };
    let summary = aggregate::collection_summary(conn, collection.id, user.id, &opts)?;
    for warning in &summary.warnings {
        eprintln!("warning: {}", warning);
    }
    let agg = summary.aggregation;

    if maybe_print_json(json_flag, jsonl_flag, &agg)? {
        return Ok(());
    }

    let ccy = &settings.currency;
    println!("Collection: {}", collection.name);
    println!("Balance:  {}", format_amount(Some(agg.balance), ccy));
    println!("Income:   {}", format_amount(Some(agg.total_income), ccy));
    println!("Spending: {}", format_amount(Some(agg.total_expense), ccy));

    if !agg.by_category.is_empty() {
        let mut items: Vec<_> = agg.by_category.iter().collect();
        items.sort_by(|a, b| b.1.cmp(a.1));
        let data = items
            .into_iter()
            .map(|(category, amount)| vec![category.clone(), format_amount(Some(*amount), ccy)])
            .collect();
        println!("{}", pretty_table(&["Category", "Amount"], data));
    }

    let data: Vec<Vec<String>> = agg
        .recent
        .iter()
        .map(|t| {
            vec![
                display_datetime(t.occurred_at),
                t.name.clone(),
                t.category.clone(),
                format_amount(Some(t.amount), ccy),
                t.flow_type.as_str().to_string(),
            ]
        })
        .collect();
    println!("Last {} transactions", data.len());
    println!(
        "{}",
        pretty_table(&["When", "Details", "Category", "Amount", "Type"], data)
    );
    Ok(())
}
