// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::errors::{RecordWarning, StoreError};
use crate::models::{Collection, FlowType, Settings, Transaction, User};
use crate::utils::parse_datetime;

/// Result of a lenient transaction fetch. Rows are never dropped for a bad
/// amount or timestamp; the blemish is recorded alongside instead. Only a row
/// whose flow type is unrecognizable is skipped, since it cannot be summed
/// in either direction.
#[derive(Debug, Default)]
pub struct FetchedTransactions {
    pub transactions: Vec<Transaction>,
    pub warnings: Vec<RecordWarning>,
}

const TX_COLUMNS: &str =
    "id, name, category, flow_type, amount, mode, occurred_at, collection_id, user_id";

pub fn transactions_for_collection(
    conn: &Connection,
    collection_id: i64,
    user_id: i64,
) -> Result<FetchedTransactions, StoreError> {
    let sql = format!(
        "SELECT {TX_COLUMNS} FROM transactions WHERE collection_id=?1 AND user_id=?2 ORDER BY id"
    );
    fetch_transactions(conn, &sql, params![collection_id, user_id])
}

pub fn transactions_for_user(
    conn: &Connection,
    user_id: i64,
) -> Result<FetchedTransactions, StoreError> {
    let sql = format!("SELECT {TX_COLUMNS} FROM transactions WHERE user_id=?1 ORDER BY id");
    fetch_transactions(conn, &sql, params![user_id])
}

fn fetch_transactions<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<FetchedTransactions, StoreError> {
    let mut stmt = conn.prepare(sql).map_err(StoreError::fetch)?;
    let mut rows = stmt.query(params).map_err(StoreError::fetch)?;
    let mut out = FetchedTransactions::default();
    while let Some(row) = rows.next().map_err(StoreError::fetch)? {
        read_transaction_row(row, &mut out).map_err(StoreError::fetch)?;
    }
    Ok(out)
}

/// The single place raw rows become typed records. Parsing is lenient by
/// contract: a malformed amount counts as zero, a malformed timestamp sorts
/// the row last, and each such case yields a `RecordWarning`.
fn read_transaction_row(row: &Row, out: &mut FetchedTransactions) -> rusqlite::Result<()> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let category: String = row.get(2)?;
    let flow_raw: String = row.get(3)?;
    let amount_raw: String = row.get(4)?;
    let mode: Option<String> = row.get(5)?;
    let occurred_raw: Option<String> = row.get(6)?;
    let collection_id: i64 = row.get(7)?;
    let user_id: i64 = row.get(8)?;

    let Some(flow_type) = FlowType::parse(&flow_raw) else {
        out.warnings.push(RecordWarning {
            transaction_id: id,
            field: "flow_type",
            detail: format!("unrecognized value '{}', row skipped", flow_raw),
        });
        return Ok(());
    };

    let amount = match amount_raw.parse::<Decimal>() {
        Ok(a) => a,
        Err(_) => {
            out.warnings.push(RecordWarning {
                transaction_id: id,
                field: "amount",
                detail: format!("'{}' is not a number, counted as zero", amount_raw),
            });
            Decimal::ZERO
        }
    };

    let occurred_at: Option<NaiveDateTime> = match occurred_raw {
        Some(raw) => match parse_datetime(&raw) {
            Ok(dt) => Some(dt),
            Err(_) => {
                out.warnings.push(RecordWarning {
                    transaction_id: id,
                    field: "occurred_at",
                    detail: format!("'{}' is not a timestamp, row sorts last", raw),
                });
                None
            }
        },
        None => {
            out.warnings.push(RecordWarning {
                transaction_id: id,
                field: "occurred_at",
                detail: "missing timestamp, row sorts last".to_string(),
            });
            None
        }
    };

    out.transactions.push(Transaction {
        id,
        name,
        category,
        flow_type,
        amount,
        mode,
        occurred_at,
        collection_id,
        user_id,
    });
    Ok(())
}

pub struct NewTransaction<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub flow_type: FlowType,
    pub amount: Decimal,
    pub mode: Option<&'a str>,
    pub occurred_at: NaiveDateTime,
    pub collection_id: i64,
    pub user_id: i64,
}

pub fn insert_transaction(conn: &Connection, tx: &NewTransaction) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO transactions(name, category, flow_type, amount, mode, occurred_at, collection_id, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tx.name,
            tx.category,
            tx.flow_type.as_str(),
            tx.amount.to_string(),
            tx.mode,
            tx.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            tx.collection_id,
            tx.user_id
        ],
    )
    .map_err(StoreError::write)?;
    Ok(conn.last_insert_rowid())
}

#[derive(Debug, Default)]
pub struct TransactionPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub flow_type: Option<FlowType>,
    pub amount: Option<Decimal>,
    pub mode: Option<String>,
    pub occurred_at: Option<NaiveDateTime>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.flow_type.is_none()
            && self.amount.is_none()
            && self.mode.is_none()
            && self.occurred_at.is_none()
    }
}

/// Returns the number of rows updated (0 when the id does not exist or
/// belongs to another user).
pub fn update_transaction(
    conn: &Connection,
    id: i64,
    user_id: i64,
    patch: &TransactionPatch,
) -> Result<usize, StoreError> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(ref name) = patch.name {
        sets.push("name=?");
        values.push(name.clone());
    }
    if let Some(ref category) = patch.category {
        sets.push("category=?");
        values.push(category.clone());
    }
    if let Some(flow) = patch.flow_type {
        sets.push("flow_type=?");
        values.push(flow.as_str().to_string());
    }
    if let Some(amount) = patch.amount {
        sets.push("amount=?");
        values.push(amount.to_string());
    }
    if let Some(ref mode) = patch.mode {
        sets.push("mode=?");
        values.push(mode.clone());
    }
    if let Some(occurred_at) = patch.occurred_at {
        sets.push("occurred_at=?");
        values.push(occurred_at.format("%Y-%m-%d %H:%M:%S").to_string());
    }
    if sets.is_empty() {
        return Ok(0);
    }

    let sql = format!(
        "UPDATE transactions SET {} WHERE id=? AND user_id=?",
        sets.join(", ")
    );
    values.push(id.to_string());
    values.push(user_id.to_string());
    let bind: Vec<&dyn rusqlite::ToSql> =
        values.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
    conn.execute(&sql, rusqlite::params_from_iter(bind))
        .map_err(StoreError::write)
}

pub fn delete_transaction(conn: &Connection, id: i64, user_id: i64) -> Result<usize, StoreError> {
    conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )
    .map_err(StoreError::write)
}

pub fn insert_collection(conn: &Connection, name: &str, user_id: i64) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO collections(name, user_id) VALUES (?1, ?2)",
        params![name, user_id],
    )
    .map_err(StoreError::write)?;
    Ok(conn.last_insert_rowid())
}

pub fn collections_for_user(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<Collection>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id, name, user_id FROM collections WHERE user_id=?1 ORDER BY id")
        .map_err(StoreError::fetch)?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            Ok(Collection {
                id: r.get(0)?,
                name: r.get(1)?,
                user_id: r.get(2)?,
            })
        })
        .map_err(StoreError::fetch)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(StoreError::fetch)?);
    }
    Ok(out)
}

pub fn collection_by_name(
    conn: &Connection,
    user_id: i64,
    name: &str,
) -> Result<Option<Collection>, StoreError> {
    conn.query_row(
        "SELECT id, name, user_id FROM collections WHERE user_id=?1 AND name=?2",
        params![user_id, name],
        |r| {
            Ok(Collection {
                id: r.get(0)?,
                name: r.get(1)?,
                user_id: r.get(2)?,
            })
        },
    )
    .optional()
    .map_err(StoreError::fetch)
}

pub fn rename_collection(
    conn: &Connection,
    id: i64,
    new_name: &str,
) -> Result<usize, StoreError> {
    conn.execute(
        "UPDATE collections SET name=?1, updated_at=datetime('now') WHERE id=?2",
        params![new_name, id],
    )
    .map_err(StoreError::write)
}

/// Removes the collection; the schema cascades to its transactions.
pub fn delete_collection(conn: &Connection, id: i64) -> Result<usize, StoreError> {
    conn.execute("DELETE FROM collections WHERE id=?1", params![id])
        .map_err(StoreError::write)
}

pub fn insert_user(conn: &Connection, name: &str, email: Option<&str>) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO users(name, email) VALUES (?1, ?2)",
        params![name, email],
    )
    .map_err(StoreError::write)?;
    Ok(conn.last_insert_rowid())
}

pub fn users(conn: &Connection) -> Result<Vec<User>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id, name, email FROM users ORDER BY name")
        .map_err(StoreError::fetch)?;
    let rows = stmt
        .query_map([], |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
                email: r.get(2)?,
            })
        })
        .map_err(StoreError::fetch)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(StoreError::fetch)?);
    }
    Ok(out)
}

pub fn user_by_name(conn: &Connection, name: &str) -> Result<Option<User>, StoreError> {
    conn.query_row(
        "SELECT id, name, email FROM users WHERE name=?1",
        params![name],
        |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
                email: r.get(2)?,
            })
        },
    )
    .optional()
    .map_err(StoreError::fetch)
}

pub fn user_by_id(conn: &Connection, id: i64) -> Result<Option<User>, StoreError> {
    conn.query_row(
        "SELECT id, name, email FROM users WHERE id=?1",
        params![id],
        |r| {
            Ok(User {
                id: r.get(0)?,
                name: r.get(1)?,
                email: r.get(2)?,
            })
        },
    )
    .optional()
    .map_err(StoreError::fetch)
}

pub fn get_app_state(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    conn.query_row(
        "SELECT value FROM app_state WHERE key=?1",
        params![key],
        |r| r.get(0),
    )
    .optional()
    .map_err(StoreError::fetch)
}

pub fn set_app_state(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO app_state(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )
    .map_err(StoreError::write)?;
    Ok(())
}

/// Loads the settings document for a user, falling back to defaults for any
/// key that has never been written.
pub fn load_settings(conn: &Connection, user_id: i64) -> Result<Settings, StoreError> {
    let mut settings = Settings::default();
    let mut stmt = conn
        .prepare("SELECT key, value FROM settings WHERE user_id=?1")
        .map_err(StoreError::fetch)?;
    let rows = stmt
        .query_map(params![user_id], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })
        .map_err(StoreError::fetch)?;
    for row in rows {
        let (key, value) = row.map_err(StoreError::fetch)?;
        match key.as_str() {
            "currency" => settings.currency = value,
            "dark_theme" => settings.dark_theme = value == "true",
            "chart_include_income" => settings.chart_include_income = value == "true",
            "expense_categories" => {
                if let Ok(list) = serde_json::from_str(&value) {
                    settings.expense_categories = list;
                }
            }
            "income_categories" => {
                if let Ok(list) = serde_json::from_str(&value) {
                    settings.income_categories = list;
                }
            }
            "transaction_modes" => {
                if let Ok(list) = serde_json::from_str(&value) {
                    settings.transaction_modes = list;
                }
            }
            _ => {}
        }
    }
    Ok(settings)
}

pub fn save_settings(
    conn: &Connection,
    user_id: i64,
    settings: &Settings,
) -> Result<(), StoreError> {
    let lists = [
        ("expense_categories", &settings.expense_categories),
        ("income_categories", &settings.income_categories),
        ("transaction_modes", &settings.transaction_modes),
    ];
    let mut pairs: Vec<(&str, String)> = vec![
        ("currency", settings.currency.clone()),
        ("dark_theme", settings.dark_theme.to_string()),
        (
            "chart_include_income",
            settings.chart_include_income.to_string(),
        ),
    ];
    for (key, list) in lists {
        let value = serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string());
        pairs.push((key, value));
    }
    for (key, value) in pairs {
        conn.execute(
            "INSERT INTO settings(user_id, key, value) VALUES(?1, ?2, ?3)
             ON CONFLICT(user_id, key) DO UPDATE SET value=excluded.value",
            params![user_id, key, value],
        )
        .map_err(StoreError::write)?;
    }
    Ok(())
}
