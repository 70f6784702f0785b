// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::models::{FlowType, Settings};
use crate::store;
use crate::utils::{active_user, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let user = active_user(conn)?;
    let settings = store::load_settings(conn, user.id)?;
    let rows = scan(conn, user.id, &settings)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn scan(conn: &Connection, user_id: i64, settings: &Settings) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Rows the lenient parser had to patch up
    let fetched = store::transactions_for_user(conn, user_id)?;
    for warning in &fetched.warnings {
        rows.push(vec![
            format!("malformed_{}", warning.field),
            warning.to_string(),
        ]);
    }

    // 2) Categories and modes outside the allow-lists (still aggregated,
    //    but no longer offered by input forms)
    for t in &fetched.transactions {
        let list = match t.flow_type {
            FlowType::Expense => &settings.expense_categories,
            FlowType::Income => &settings.income_categories,
        };
        if !list.iter().any(|c| c.eq_ignore_ascii_case(&t.category)) {
            rows.push(vec![
                "unlisted_category".into(),
                format!(
                    "transaction {}: '{}' ({})",
                    t.id,
                    t.category,
                    t.flow_type.as_str()
                ),
            ]);
        }
        if let Some(ref mode) = t.mode {
            if !settings
                .transaction_modes
                .iter()
                .any(|v| v.eq_ignore_ascii_case(mode))
            {
                rows.push(vec![
                    "unlisted_mode".into(),
                    format!("transaction {}: '{}'", t.id, mode),
                ]);
            }
        }
    }

    // 3) Transactions pointing at a collection that no longer exists.
    //    Unreachable while foreign keys are on; cheap to check anyway.
    let mut stmt = conn.prepare(
        "SELECT t.id FROM transactions t LEFT JOIN collections c ON t.collection_id=c.id
         WHERE c.id IS NULL AND t.user_id=?1",
    )?;
    let mut cur = stmt.query([user_id])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "orphaned_transaction".into(),
            format!("transaction {} has no collection", id),
        ]);
    }

    Ok(rows)
}
