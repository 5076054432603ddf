//! Amount type for displaying money the way the building's receipts are written.
//!
//! Receipts use `.` as the thousands separator and `,` as the decimal separator, and they drop
//! trailing decimal zeros: `1.234.567,5`, `9.000`, `12,35`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;

/// The number of decimal places that money is rounded to.
pub const MONEY_DP: u32 = 2;

/// Rounds `value` to cents, half-up (midpoint away from zero).
pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Represents how an amount should be written.
///
/// # Examples
///  - `AmountFormat{ currency: true }` -> `$ 60.000,5`
///  - `AmountFormat{ currency: false }` -> `60.000,5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether the `$ ` prefix is written.
    currency: bool,
}

impl AmountFormat {
    pub const fn new(currency: bool) -> Self {
        Self { currency }
    }
}

impl Default for AmountFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

/// The default format has the currency prefix: e.g. `$ 60.000`.
const DEFAULT_FORMAT: AmountFormat = AmountFormat { currency: true };

/// A money value paired with the way it should be displayed.
///
/// The value is kept at full precision. Rounding to cents happens only when it is displayed.
///
/// ```
/// # use building_bills::model::{Amount, AmountFormat};
/// # use rust_decimal::Decimal;
/// # use std::str::FromStr;
/// let amount = Amount::new(Decimal::from_str("1234567.504").unwrap());
/// assert_eq!(amount.to_string(), "$ 1.234.567,5");
///
/// let plain = Amount::new_with_format(Decimal::from(9000), AmountFormat::new(false));
/// assert_eq!(plain.to_string(), "9.000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    value: Decimal,
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount with the default format.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: DEFAULT_FORMAT,
        }
    }

    /// Creates a new Amount with the specified format.
    pub const fn new_with_format(value: Decimal, format: AmountFormat) -> Self {
        Self { value, format }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        round(self.value).is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = round(self.value);
        let (sign, num) = if rounded.is_sign_negative() && !rounded.is_zero() {
            ("-", rounded.abs())
        } else {
            ("", rounded.abs())
        };

        let cur = if self.format.currency { "$ " } else { "" };

        // `Decimal` displays as `1234567.50`; regroup the integer part and trim the cents.
        let digits = num.to_string();
        let (int_part, dec_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        let int_part = group_thousands(int_part);
        let dec_part = dec_part.trim_end_matches('0');

        if dec_part.is_empty() {
            write!(f, "{sign}{cur}{int_part}")
        } else {
            write!(f, "{sign}{cur}{int_part},{dec_part}")
        }
    }
}

/// `1234567` -> `1.234.567`
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round(dec("0.125")), dec("0.13"));
        assert_eq!(round(dec("0.124999")), dec("0.12"));
        assert_eq!(round(dec("2.5")), dec("2.50"));
    }

    #[test]
    fn test_display_thousands() {
        let amount = Amount::new(dec("9000"));
        assert_eq!(amount.to_string(), "$ 9.000");
    }

    #[test]
    fn test_display_millions_with_cents() {
        let amount = Amount::new(dec("1234567.5"));
        assert_eq!(amount.to_string(), "$ 1.234.567,5");
    }

    #[test]
    fn test_display_trims_zero_cents() {
        let amount = Amount::new(dec("81000.00"));
        assert_eq!(amount.to_string(), "$ 81.000");
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let amount = Amount::new(dec("3333.33333"));
        assert_eq!(amount.to_string(), "$ 3.333,33");
    }

    #[test]
    fn test_display_keeps_cents_beyond_f64_precision() {
        let amount = Amount::new(dec("12345678901234567.89"));
        assert_eq!(amount.to_string(), "$ 12.345.678.901.234.567,89");
        let amount = Amount::new(Decimal::MAX);
        assert_eq!(
            amount.to_string(),
            "$ 79.228.162.514.264.337.593.543.950.335"
        );
    }

    #[test]
    fn test_display_small() {
        let amount = Amount::new(dec("12.3"));
        assert_eq!(amount.to_string(), "$ 12,3");
    }

    #[test]
    fn test_display_zero() {
        let amount = Amount::new(Decimal::ZERO);
        assert_eq!(amount.to_string(), "$ 0");
        assert!(amount.is_zero());
    }

    #[test]
    fn test_display_negative() {
        let amount = Amount::new(dec("-1500"));
        assert_eq!(amount.to_string(), "-$ 1.500");
    }

    #[test]
    fn test_display_without_currency() {
        let amount = Amount::new_with_format(dec("300"), AmountFormat::new(false));
        assert_eq!(amount.to_string(), "300");
    }

    #[test]
    fn test_tiny_negative_is_zero() {
        let amount = Amount::new(dec("-0.001"));
        assert_eq!(amount.to_string(), "$ 0");
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::new(dec("5000"));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"$ 5.000\"");
    }
}
