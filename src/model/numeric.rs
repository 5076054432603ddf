//! Lenient numeric input.
//!
//! Numbers typed by the operator or read from a saved document never fail: anything that cannot
//! be read as a number becomes zero, and quantities that cannot be negative are clamped at zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::convert::Infallible;
use std::str::FromStr;

/// Parses a decimal from operator text. Accepts `90000`, `12.5`, `$ 1.5e3`, and receipt-style
/// `1.234,5`. Plain decimal notation wins when a string reads both ways.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(&cleaned) {
        return Some(d);
    }
    if let Ok(d) = Decimal::from_scientific(&cleaned) {
        return Some(d);
    }
    if cleaned.contains(',') {
        let swapped = cleaned.replace('.', "").replace(',', ".");
        return Decimal::from_str(&swapped).ok();
    }
    None
}

/// A signed amount; anything unreadable is zero.
pub fn signed(s: &str) -> Decimal {
    parse_decimal(s).unwrap_or_default()
}

/// A non-negative amount; unreadable values and negatives become zero.
pub fn money(s: &str) -> Decimal {
    floor(signed(s))
}

/// A non-negative whole count; fractions are truncated.
pub fn count(s: &str) -> u32 {
    to_count(signed(s))
}

pub(crate) fn floor(d: Decimal) -> Decimal {
    if d.is_sign_negative() {
        Decimal::ZERO
    } else {
        d
    }
}

/// Adds up amounts, saturating at `Decimal::MAX` or `Decimal::MIN` instead of overflowing.
pub fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

fn to_count(d: Decimal) -> u32 {
    floor(d).trunc().to_u32().unwrap_or(u32::MAX)
}

/// `clap` value parser for non-negative amounts.
pub fn money_arg(s: &str) -> Result<Decimal, Infallible> {
    Ok(money(s))
}

/// `clap` value parser for signed amounts.
pub fn signed_arg(s: &str) -> Result<Decimal, Infallible> {
    Ok(signed(s))
}

/// `clap` value parser for occupant counts.
pub fn count_arg(s: &str) -> Result<u32, Infallible> {
    Ok(count(s))
}

fn from_value(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserializes a non-negative amount from a JSON number or string.
pub(crate) fn de_money<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(floor(from_value(&v).unwrap_or_default()))
}

/// Deserializes a signed amount from a JSON number or string.
pub(crate) fn de_signed<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(from_value(&v).unwrap_or_default())
}

/// Deserializes an occupant count from a JSON number or string.
pub(crate) fn de_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(to_count(from_value(&v).unwrap_or_default()))
}

/// Deserializes an optional amount. `null` and unreadable values are `None`.
pub(crate) fn de_opt_signed<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(from_value(&v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_decimal("90000"), Some(dec("90000")));
        assert_eq!(parse_decimal(" 12.5 "), Some(dec("12.5")));
    }

    #[test]
    fn test_parse_currency_and_receipt_style() {
        assert_eq!(parse_decimal("$ 1.234,5"), Some(dec("1234.5")));
        assert_eq!(parse_decimal("$90000"), Some(dec("90000")));
    }

    #[test]
    fn test_parse_scientific() {
        assert_eq!(parse_decimal("1.5e3"), Some(dec("1500")));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_money_coerces_and_clamps() {
        assert_eq!(money("abc"), Decimal::ZERO);
        assert_eq!(money("-50"), Decimal::ZERO);
        assert_eq!(money("50"), dec("50"));
    }

    #[test]
    fn test_signed_keeps_negative() {
        assert_eq!(signed("-50"), dec("-50"));
        assert_eq!(signed("x"), Decimal::ZERO);
    }

    #[test]
    fn test_count() {
        assert_eq!(count("3"), 3);
        assert_eq!(count("-2"), 0);
        assert_eq!(count("2.7"), 2);
        assert_eq!(count("many"), 0);
    }

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "de_money")]
        money: Decimal,
        #[serde(deserialize_with = "de_count")]
        people: u32,
        #[serde(default, deserialize_with = "de_opt_signed")]
        maybe: Option<Decimal>,
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let p: Sample = serde_json::from_str(r#"{"money": 12.5, "people": "3", "maybe": "-4"}"#)
            .unwrap();
        assert_eq!(p.money, dec("12.5"));
        assert_eq!(p.people, 3);
        assert_eq!(p.maybe, Some(dec("-4")));
    }

    #[test]
    fn test_deserialize_malformed_is_zero() {
        let p: Sample =
            serde_json::from_str(r#"{"money": "lots", "people": -1, "maybe": null}"#).unwrap();
        assert_eq!(p.money, Decimal::ZERO);
        assert_eq!(p.people, 0);
        assert_eq!(p.maybe, None);
    }

    #[test]
    fn test_deserialize_missing_option() {
        let p: Sample = serde_json::from_str(r#"{"money": 1, "people": 1}"#).unwrap();
        assert_eq!(p.maybe, None);
    }

    #[test]
    fn test_saturating_sum() {
        assert_eq!(saturating_sum([dec("1.5"), dec("2")]), dec("3.5"));
        assert_eq!(saturating_sum([Decimal::MAX, Decimal::ONE]), Decimal::MAX);
        assert_eq!(saturating_sum([Decimal::MIN, dec("-1")]), Decimal::MIN);
        assert_eq!(saturating_sum(Vec::new()), Decimal::ZERO);
    }
}
