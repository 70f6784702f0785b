// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::aggregate::{merge_history, user_history};
use cashbook::db;
use cashbook::errors::StoreError;
use cashbook::models::{Collection, FlowType, Transaction};
use cashbook::store::{self, FetchedTransactions, NewTransaction};
use chrono::NaiveDateTime;
use rusqlite::Connection;

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn collection(id: i64, name: &str) -> Collection {
    Collection {
        id,
        name: name.to_string(),
        user_id: 1,
    }
}

fn tx(id: i64, collection_id: i64, name: &str, when: Option<NaiveDateTime>) -> Transaction {
    Transaction {
        id,
        name: name.to_string(),
        category: "Food".to_string(),
        flow_type: FlowType::Expense,
        amount: "10".parse().unwrap(),
        mode: None,
        occurred_at: when,
        collection_id,
        user_id: 1,
    }
}

#[test]
fn merge_tags_concatenates_and_orders() {
    let collections = vec![collection(1, "Groceries"), collection(2, "Travel")];
    let merged = merge_history(&collections, |c| {
        let transactions = match c.id {
            1 => vec![
                tx(1, 1, "Veg", Some(dt("2025-07-01 10:00:00"))),
                tx(2, 1, "Rice", Some(dt("2025-07-03 10:00:00"))),
            ],
            _ => vec![tx(3, 2, "Bus", Some(dt("2025-07-02 10:00:00")))],
        };
        Ok(FetchedTransactions {
            transactions,
            warnings: Vec::new(),
        })
    });

    assert!(merged.skipped.is_empty());
    assert_eq!(merged.entries.len(), 3);
    let ids: Vec<i64> = merged.entries.iter().map(|e| e.transaction.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert_eq!(merged.entries[0].collection_name, "Groceries");
    assert_eq!(merged.entries[1].collection_name, "Travel");
}

#[test]
fn undated_entries_sort_after_dated_ones() {
    let collections = vec![collection(1, "Groceries")];
    let merged = merge_history(&collections, |_| {
        Ok(FetchedTransactions {
            transactions: vec![
                tx(1, 1, "Undated", None),
                tx(2, 1, "Dated", Some(dt("2025-07-01 10:00:00"))),
            ],
            warnings: Vec::new(),
        })
    });
    let ids: Vec<i64> = merged.entries.iter().map(|e| e.transaction.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn failed_collection_is_skipped_not_fatal() {
    let collections = vec![collection(1, "Groceries"), collection(2, "Broken")];
    let merged = merge_history(&collections, |c| {
        if c.id == 2 {
            Err(StoreError::fetch(rusqlite::Error::QueryReturnedNoRows))
        } else {
            Ok(FetchedTransactions {
                transactions: vec![tx(1, 1, "Veg", Some(dt("2025-07-01 10:00:00")))],
                warnings: Vec::new(),
            })
        }
    });

    assert_eq!(merged.entries.len(), 1);
    assert_eq!(merged.entries[0].collection_name, "Groceries");
    assert_eq!(merged.skipped.len(), 1);
    assert!(merged.skipped[0].contains("Broken"));
}

#[test]
fn user_history_reads_every_collection() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let user_id = store::insert_user(&conn, "asha", None).unwrap();
    let groceries = store::insert_collection(&conn, "Groceries", user_id).unwrap();
    let travel = store::insert_collection(&conn, "Travel", user_id).unwrap();

    for (collection_id, name, when) in [
        (groceries, "Veg", "2025-07-01 10:00:00"),
        (groceries, "Rice", "2025-07-03 10:00:00"),
        (travel, "Bus", "2025-07-02 10:00:00"),
    ] {
        store::insert_transaction(
            &conn,
            &NewTransaction {
                name,
                category: "Food",
                flow_type: FlowType::Expense,
                amount: "10".parse().unwrap(),
                mode: None,
                occurred_at: dt(when),
                collection_id,
                user_id,
            },
        )
        .unwrap();
    }

    let merged = user_history(&conn, user_id).unwrap();
    assert!(merged.skipped.is_empty());
    assert!(merged.warnings.is_empty());
    assert_eq!(merged.entries.len(), 3);
    let names: Vec<&str> = merged
        .entries
        .iter()
        .map(|e| e.transaction.name.as_str())
        .collect();
    assert_eq!(names, vec!["Rice", "Bus", "Veg"]);
    assert_eq!(merged.entries[1].collection_name, "Travel");
}
