// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The derivation core: turns raw transaction records into the figures the
//! screens render. `aggregate` is pure; the resolver and merger orchestrate
//! store fetches around it and keep fetch failures distinct from empty data.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::{RecordWarning, StoreError};
use crate::models::{Collection, FlowType, HistoryEntry, Transaction};
use crate::store::{self, FetchedTransactions};

/// Cap on the recent-transactions view shown on the dashboard.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub recent_limit: usize,
    /// When set, income transactions get category buckets too. Off by
    /// default: the breakdown chart is a spending chart.
    pub breakdown_includes_income: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions {
            recent_limit: DEFAULT_RECENT_LIMIT,
            breakdown_includes_income: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    /// Category label -> summed amount. Categories with no contributing
    /// transactions are absent, never present with zero.
    pub by_category: BTreeMap<String, Decimal>,
    pub recent: Vec<Transaction>,
}

/// Pure fold over a transaction list. Safe to call repeatedly; the input is
/// not reordered or mutated.
pub fn aggregate(transactions: &[Transaction], opts: &AggregateOptions) -> Aggregation {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    for tx in transactions {
        match tx.flow_type {
            FlowType::Income => total_income += tx.amount,
            FlowType::Expense => total_expense += tx.amount,
        }
        if tx.flow_type == FlowType::Expense || opts.breakdown_includes_income {
            *by_category.entry(tx.category.clone()).or_insert(Decimal::ZERO) += tx.amount;
        }
    }

    let mut recent: Vec<Transaction> = transactions.to_vec();
    recent.sort_by(|a, b| cmp_newest_first(a.occurred_at, b.occurred_at));
    recent.truncate(opts.recent_limit);

    Aggregation {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        by_category,
        recent,
    }
}

/// Newest first; rows without a usable timestamp after every dated row.
/// Equal keys compare `Equal`, and the callers use stable sorts, so ties
/// keep their input order.
pub fn cmp_newest_first(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One collection's aggregation plus the data-quality warnings picked up
/// while reading it.
#[derive(Debug)]
pub struct CollectionSummary {
    pub aggregation: Aggregation,
    pub warnings: Vec<RecordWarning>,
}

pub fn collection_summary(
    conn: &Connection,
    collection_id: i64,
    user_id: i64,
    opts: &AggregateOptions,
) -> Result<CollectionSummary, StoreError> {
    let FetchedTransactions {
        transactions,
        warnings,
    } = store::transactions_for_collection(conn, collection_id, user_id)?;
    Ok(CollectionSummary {
        aggregation: aggregate(&transactions, opts),
        warnings,
    })
}

/// Balance only. A fetch failure stays an error: an unreadable collection is
/// not the same thing as an empty one.
pub fn collection_balance(
    conn: &Connection,
    collection_id: i64,
    user_id: i64,
) -> Result<Decimal, StoreError> {
    let summary = collection_summary(conn, collection_id, user_id, &AggregateOptions::default())?;
    Ok(summary.aggregation.balance)
}

/// Merged cross-collection history. `skipped` holds one note per collection
/// whose fetch failed under the fail-soft policy.
#[derive(Debug, Default)]
pub struct MergedHistory {
    pub entries: Vec<HistoryEntry>,
    pub warnings: Vec<RecordWarning>,
    pub skipped: Vec<String>,
}

/// Fetches each collection's transactions through `fetch`, tags them with the
/// collection name, concatenates, and orders newest first. A collection whose
/// fetch fails is skipped with a note; the rest of the history still comes
/// back. Listing the collections themselves is the caller's problem — with no
/// list there is nothing to be soft about.
pub fn merge_history<F>(collections: &[Collection], mut fetch: F) -> MergedHistory
where
    F: FnMut(&Collection) -> Result<FetchedTransactions, StoreError>,
{
    let mut merged = MergedHistory::default();
    for collection in collections {
        match fetch(collection) {
            Ok(FetchedTransactions {
                transactions,
                mut warnings,
            }) => {
                merged.warnings.append(&mut warnings);
                merged
                    .entries
                    .extend(transactions.into_iter().map(|transaction| HistoryEntry {
                        collection_name: collection.name.clone(),
                        transaction,
                    }));
            }
            Err(err) => merged
                .skipped
                .push(format!("collection '{}' skipped: {}", collection.name, err)),
        }
    }
    merged
        .entries
        .sort_by(|a, b| cmp_newest_first(a.transaction.occurred_at, b.transaction.occurred_at));
    merged
}

pub fn user_history(conn: &Connection, user_id: i64) -> Result<MergedHistory, StoreError> {
    let collections = store::collections_for_user(conn, user_id)?;
    Ok(merge_history(&collections, |c| {
        store::transactions_for_collection(conn, c.id, user_id)
    }))
}
