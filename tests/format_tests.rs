// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashbook::errors::ValidationError;
use cashbook::models::FlowType;
use cashbook::utils::{
    format_amount, parse_datetime, parse_flow, positive_amount, require_name,
};
use chrono::NaiveDateTime;

#[test]
fn missing_amount_formats_as_zero() {
    assert_eq!(format_amount(None, "₹"), "₹ 0.00");
}

#[test]
fn amounts_group_indian_style_with_two_decimals() {
    assert_eq!(
        format_amount(Some("123456.78".parse().unwrap()), "₹"),
        "₹ 1,23,456.78"
    );
    assert_eq!(format_amount(Some("999.5".parse().unwrap()), "₹"), "₹ 999.50");
    assert_eq!(format_amount(Some("1000".parse().unwrap()), "$"), "$ 1,000.00");
}

#[test]
fn negative_balances_keep_their_sign() {
    assert_eq!(
        format_amount(Some("-1234".parse().unwrap()), "₹"),
        "₹ -1,234.00"
    );
    assert_eq!(format_amount(Some("-0.5".parse().unwrap()), "₹"), "₹ -0.50");
}

#[test]
fn rounding_happens_only_at_display() {
    assert_eq!(format_amount(Some("10.239".parse().unwrap()), "₹"), "₹ 10.24");
}

#[test]
fn datetimes_parse_with_or_without_seconds() {
    let full = parse_datetime("2025-07-01 10:15:30").unwrap();
    assert_eq!(
        full,
        NaiveDateTime::parse_from_str("2025-07-01 10:15:30", "%Y-%m-%d %H:%M:%S").unwrap()
    );
    let minutes = parse_datetime("2025-07-01 10:15").unwrap();
    assert_eq!(minutes.format("%H:%M:%S").to_string(), "10:15:00");
    let date_only = parse_datetime("2025-07-01").unwrap();
    assert_eq!(date_only.format("%H:%M:%S").to_string(), "00:00:00");
    assert!(parse_datetime("01/07/2025").is_err());
}

#[test]
fn amount_validation_rejects_garbage_and_nonpositive() {
    assert_eq!(positive_amount("12.50").unwrap(), "12.50".parse().unwrap());
    assert_eq!(
        positive_amount("abc").unwrap_err(),
        ValidationError::InvalidAmount("abc".to_string())
    );
    assert_eq!(
        positive_amount("0").unwrap_err(),
        ValidationError::NonPositiveAmount("0".to_string())
    );
    assert_eq!(
        positive_amount("-5").unwrap_err(),
        ValidationError::NonPositiveAmount("-5".to_string())
    );
}

#[test]
fn flow_and_name_validation() {
    assert_eq!(parse_flow("income").unwrap(), FlowType::Income);
    assert_eq!(parse_flow("expense").unwrap(), FlowType::Expense);
    assert_eq!(
        parse_flow("transfer").unwrap_err(),
        ValidationError::UnknownFlowType("transfer".to_string())
    );
    assert_eq!(require_name("  Veg  ").unwrap(), "Veg");
    assert_eq!(require_name("   ").unwrap_err(), ValidationError::EmptyName);
}
