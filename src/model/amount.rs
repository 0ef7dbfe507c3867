//! Amount type for monetary values from the CSV export.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Amounts in
//! the export use the invariant format (`-10.00`), negative for expenses.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// A signed monetary amount with the scale it was parsed with.
///
/// Wrapping `Decimal` keeps the original number of decimal places, so an
/// amount read as `-10.00` is also displayed as `-10.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative, i.e. an expense.
    pub fn is_expense(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-10.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-10.00").unwrap());
        assert!(amount.is_expense());
    }

    #[test]
    fn test_parse_positive() {
        let amount = Amount::from_str("1250.35").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("1250.35").unwrap());
        assert!(!amount.is_expense());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  -5.00 ").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-5.00").unwrap());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("ten francs").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_display_keeps_scale() {
        let amount = Amount::from_str("-10.00").unwrap();
        assert_eq!(amount.to_string(), "-10.00");
    }

    #[test]
    fn test_add() {
        let mut total = Amount::ZERO;
        total += Amount::from_str("-10.00").unwrap();
        total += Amount::from_str("-5.00").unwrap();
        assert_eq!(total.to_string(), "-15.00");
    }

    #[test]
    fn test_zero_is_not_an_expense() {
        assert!(!Amount::ZERO.is_expense());
        assert!(Amount::ZERO.is_zero());
    }

    #[test]
    fn test_serde_round_trip() {
        let amount = Amount::from_str("-20.50").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"-20.50\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
