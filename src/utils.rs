// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use num_format::{Locale, ToFormattedString};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::errors::ValidationError;
use crate::models::{FlowType, User};
use crate::store;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }
    Err(anyhow!("Invalid time '{}', expected HH:MM[:SS]", s))
}

/// One absolute timestamp format end-to-end; a bare date means midnight.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN));
    }
    Err(anyhow!(
        "Invalid timestamp '{}', expected YYYY-MM-DD [HH:MM[:SS]]",
        s
    ))
}

pub fn parse_month(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn display_datetime(dt: Option<NaiveDateTime>) -> String {
    dt.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn require_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn require_category(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyCategory)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Amounts are magnitudes; direction comes from the flow type alone.
pub fn positive_amount(value: &str) -> Result<Decimal, ValidationError> {
    let amount = value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount(value.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(value.to_string()));
    }
    Ok(amount)
}

pub fn parse_flow(value: &str) -> Result<FlowType, ValidationError> {
    FlowType::parse(value.trim())
        .ok_or_else(|| ValidationError::UnknownFlowType(value.to_string()))
}

/// Two decimal places, en-IN digit grouping, symbol prefix. A missing amount
/// renders as zero; this never fails.
pub fn format_amount(amount: Option<Decimal>, symbol: &str) -> String {
    let rounded = amount.unwrap_or(Decimal::ZERO).round_dp(2);
    let units = rounded.trunc().abs().to_i64().unwrap_or(0);
    let cents = ((rounded - rounded.trunc()) * Decimal::ONE_HUNDRED)
        .abs()
        .to_i64()
        .unwrap_or(0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{} {}{}.{:02}",
        symbol,
        sign,
        units.to_formatted_string(&Locale::en_IN),
        cents
    )
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn active_user(conn: &Connection) -> Result<User> {
    let id = store::get_app_state(conn, "active_user")?
        .and_then(|v| v.parse::<i64>().ok())
        .context("No active user; run 'cashbook user add <name>' first")?;
    let user = store::user_by_id(conn, id)?
        .context("Active user no longer exists; run 'cashbook user switch <name>'")?;
    Ok(user)
}

pub fn id_for_collection(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
    let collection = store::collection_by_name(conn, user_id, name)?
        .with_context(|| format!("Collection '{}' not found", name))?;
    Ok(collection.id)
}
