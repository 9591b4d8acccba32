//! Monetary amounts.
//!
//! Totals are exact decimals in memory, in the database and on the wire. JSON
//! carries them as plain numbers (`19.99`, not `"19.99"`) written digit for
//! digit, so no amount passes through `f64`. This relies on serde_json's
//! `arbitrary_precision` feature.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A currency-agnostic monetary amount.
///
/// # Examples
///
/// ```
/// use microshop_core::Money;
/// use std::str::FromStr;
///
/// let total = Money::from_str("19.99").unwrap();
/// assert_eq!(serde_json::to_string(&total).unwrap(), "19.99");
///
/// let parsed: Money = serde_json::from_str("19.99").unwrap();
/// assert_eq!(parsed, total);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Round to `dp` decimal places, half away from zero (as a `NUMERIC`
    /// column does on insert).
    #[must_use]
    pub fn round_to(self, dp: u32) -> Self {
        Self(self.0.round_dp_with_strategy(
            dp,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        ))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_json_number() {
        let money = Money::from_str("19.99").unwrap();
        assert_eq!(serde_json::to_value(money).unwrap(), serde_json::json!(19.99));
    }

    #[test]
    fn serialization_keeps_every_digit_and_the_scale() {
        let money = Money::from_str("1234567890123456.78").unwrap();
        assert_eq!(serde_json::to_string(&money).unwrap(), "1234567890123456.78");

        let stored = Money::from_str("10.00").unwrap();
        assert_eq!(serde_json::to_string(&stored).unwrap(), "10.00");
    }

    #[test]
    fn long_amounts_parse_exactly() {
        let parsed: Money = serde_json::from_str("99999999999999999.99").unwrap();
        assert_eq!(parsed, Money::from_str("99999999999999999.99").unwrap());

        let nested: serde_json::Value =
            serde_json::from_str(r#"{"total":1234567890123456.78}"#).unwrap();
        let from_value: Money = serde_json::from_value(nested["total"].clone()).unwrap();
        assert_eq!(from_value, Money::from_str("1234567890123456.78").unwrap());
    }

    #[test]
    fn parses_number_string_and_integer() {
        let from_float: Money = serde_json::from_str("0.1").unwrap();
        let from_str: Money = serde_json::from_str("\"0.1\"").unwrap();
        let from_int: Money = serde_json::from_str("3").unwrap();

        assert_eq!(from_float, Money::from_str("0.1").unwrap());
        assert_eq!(from_str, from_float);
        assert_eq!(from_int, Money::from_str("3").unwrap());
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(serde_json::from_str::<Money>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn negativity() {
        assert!(Money::from_str("-0.01").unwrap().is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::from_str("-0").unwrap().is_negative());
    }

    #[test]
    fn rounds_like_numeric_column() {
        let money = Money::from_str("19.995").unwrap().round_to(2);
        assert_eq!(money, Money::from_str("20.00").unwrap());
    }
}
