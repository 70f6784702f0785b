// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures crossing the store boundary. Reads and writes are separate
/// variants so callers can tell "balance unknown" from "change not applied".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reading from the ledger store failed: {source}")]
    Fetch {
        #[source]
        source: rusqlite::Error,
    },
    #[error("writing to the ledger store failed: {source}")]
    Write {
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub fn fetch(source: rusqlite::Error) -> Self {
        StoreError::Fetch { source }
    }

    pub fn write(source: rusqlite::Error) -> Self {
        StoreError::Write { source }
    }
}

/// Rejected form input. Raised at the command edge, before any store call,
/// so it never reaches the aggregation layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
    #[error("amount must be greater than zero, got '{0}'")]
    NonPositiveAmount(String),
    #[error("flow type must be 'income' or 'expense', got '{0}'")]
    UnknownFlowType(String),
}

/// A fetched row that did not parse cleanly. The row still participates in
/// aggregation (zero amount, no timestamp); the blemish travels with the
/// result so the caller can surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordWarning {
    pub transaction_id: i64,
    pub field: &'static str,
    pub detail: String,
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transaction {}: bad {} ({})",
            self.transaction_id, self.field, self.detail
        )
    }
}
