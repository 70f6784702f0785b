// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::commands::doctor;
use cashbook::db;
use cashbook::models::{FlowType, Settings};
use cashbook::store::{self, NewTransaction, TransactionPatch};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn setup() -> (Connection, i64, i64) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let user_id = store::insert_user(&conn, "asha", Some("asha@example.com")).unwrap();
    let collection_id = store::insert_collection(&conn, "Groceries", user_id).unwrap();
    (conn, user_id, collection_id)
}

#[test]
fn malformed_amount_counts_as_zero_with_warning() {
    let (conn, user_id, collection_id) = setup();
    conn.execute(
        "INSERT INTO transactions(name, category, flow_type, amount, occurred_at, collection_id, user_id)
         VALUES ('Bad', 'Food', 'expense', 'abc', '2025-07-01 10:00:00', ?1, ?2)",
        params![collection_id, user_id],
    )
    .unwrap();

    let fetched = store::transactions_for_collection(&conn, collection_id, user_id).unwrap();
    assert_eq!(fetched.transactions.len(), 1);
    assert_eq!(fetched.transactions[0].amount, Decimal::ZERO);
    assert_eq!(fetched.warnings.len(), 1);
    assert_eq!(fetched.warnings[0].field, "amount");
}

#[test]
fn malformed_timestamp_clears_with_warning() {
    let (conn, user_id, collection_id) = setup();
    conn.execute(
        "INSERT INTO transactions(name, category, flow_type, amount, occurred_at, collection_id, user_id)
         VALUES ('Odd', 'Food', 'expense', '10', 'yesterday-ish', ?1, ?2)",
        params![collection_id, user_id],
    )
    .unwrap();

    let fetched = store::transactions_for_collection(&conn, collection_id, user_id).unwrap();
    assert_eq!(fetched.transactions.len(), 1);
    assert!(fetched.transactions[0].occurred_at.is_none());
    assert_eq!(fetched.warnings.len(), 1);
    assert_eq!(fetched.warnings[0].field, "occurred_at");
}

#[test]
fn unrecognized_flow_type_skips_the_row() {
    // Schema without the CHECK constraint, as an older database might carry.
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            flow_type TEXT NOT NULL,
            amount TEXT NOT NULL,
            mode TEXT,
            occurred_at TEXT,
            collection_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(name, category, flow_type, amount, occurred_at, collection_id, user_id)
         VALUES ('Strange', 'Food', 'transfer', '10', '2025-07-01 10:00:00', 1, 1)",
        [],
    )
    .unwrap();

    let fetched = store::transactions_for_collection(&conn, 1, 1).unwrap();
    assert!(fetched.transactions.is_empty());
    assert_eq!(fetched.warnings.len(), 1);
    assert_eq!(fetched.warnings[0].field, "flow_type");
}

#[test]
fn queries_are_scoped_to_the_user() {
    let (conn, user_id, collection_id) = setup();
    let other_user = store::insert_user(&conn, "noor", None).unwrap();
    let other_collection = store::insert_collection(&conn, "Groceries", other_user).unwrap();

    for (cid, uid, name) in [
        (collection_id, user_id, "Mine"),
        (other_collection, other_user, "Theirs"),
    ] {
        store::insert_transaction(
            &conn,
            &NewTransaction {
                name,
                category: "Food",
                flow_type: FlowType::Expense,
                amount: "10".parse().unwrap(),
                mode: None,
                occurred_at: dt("2025-07-01 10:00:00"),
                collection_id: cid,
                user_id: uid,
            },
        )
        .unwrap();
    }

    let fetched = store::transactions_for_user(&conn, user_id).unwrap();
    assert_eq!(fetched.transactions.len(), 1);
    assert_eq!(fetched.transactions[0].name, "Mine");
}

#[test]
fn update_and_delete_are_scoped_too() {
    let (conn, user_id, collection_id) = setup();
    let id = store::insert_transaction(
        &conn,
        &NewTransaction {
            name: "Veg",
            category: "Food",
            flow_type: FlowType::Expense,
            amount: "10".parse().unwrap(),
            mode: None,
            occurred_at: dt("2025-07-01 10:00:00"),
            collection_id,
            user_id,
        },
    )
    .unwrap();

    let patch = TransactionPatch {
        name: Some("Vegetables".to_string()),
        amount: Some("12.50".parse().unwrap()),
        ..TransactionPatch::default()
    };
    assert_eq!(store::update_transaction(&conn, id, user_id, &patch).unwrap(), 1);

    let fetched = store::transactions_for_collection(&conn, collection_id, user_id).unwrap();
    assert_eq!(fetched.transactions[0].name, "Vegetables");
    assert_eq!(fetched.transactions[0].amount, "12.50".parse().unwrap());

    // Another user can neither update nor delete it
    assert_eq!(store::update_transaction(&conn, id, user_id + 1, &patch).unwrap(), 0);
    assert_eq!(store::delete_transaction(&conn, id, user_id + 1).unwrap(), 0);
    assert_eq!(store::delete_transaction(&conn, id, user_id).unwrap(), 1);
    let fetched = store::transactions_for_collection(&conn, collection_id, user_id).unwrap();
    assert!(fetched.transactions.is_empty());
}

#[test]
fn deleting_a_collection_cascades_to_its_transactions() {
    let (conn, user_id, collection_id) = setup();
    store::insert_transaction(
        &conn,
        &NewTransaction {
            name: "Veg",
            category: "Food",
            flow_type: FlowType::Expense,
            amount: "10".parse().unwrap(),
            mode: None,
            occurred_at: dt("2025-07-01 10:00:00"),
            collection_id,
            user_id,
        },
    )
    .unwrap();

    assert_eq!(store::delete_collection(&conn, collection_id).unwrap(), 1);
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn doctor_scan_flags_unlisted_categories_and_modes() {
    let (conn, user_id, collection_id) = setup();
    store::insert_transaction(
        &conn,
        &NewTransaction {
            name: "Boat",
            category: "Yacht",
            flow_type: FlowType::Expense,
            amount: "10".parse().unwrap(),
            mode: Some("Barter"),
            occurred_at: dt("2025-07-01 10:00:00"),
            collection_id,
            user_id,
        },
    )
    .unwrap();

    let rows = doctor::scan(&conn, user_id, &Settings::default()).unwrap();
    let issues: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert!(issues.contains(&"unlisted_category"));
    assert!(issues.contains(&"unlisted_mode"));

    // A listed category and mode comes back clean
    store::delete_collection(&conn, collection_id).unwrap();
    let rows = doctor::scan(&conn, user_id, &Settings::default()).unwrap();
    assert!(rows.is_empty());
}
