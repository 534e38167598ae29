//! Amount type for handling signed monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal`. The transaction store sends
//! amounts as decimal strings (e.g. `"-40.00"`), though plain JSON numbers are accepted as well.
//! Amounts are displayed the way the statement prints them, e.g. `R 1250.00`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// The currency symbol printed in front of every amount.
pub const CURRENCY: &str = "R";

/// The number of decimal places the transaction store keeps for an amount.
pub const DECIMAL_PLACES: u32 = 2;

/// Represents a signed amount of money. Positive amounts are income, negative amounts are
/// expenses.
///
/// # Examples
///
/// ```
/// # use finance_tracker::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-40").unwrap();
/// assert_eq!(amount.to_string(), "R -40.00");
/// assert_eq!(amount.abs().to_string(), "R 40.00");
/// ```
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

    /// Returns true if the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// The magnitude of the amount.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// True when the amount has no more than the two decimal places kept by the transaction
    /// store. Trailing zeros do not count, so `12.500` fits.
    pub fn fits_cents(&self) -> bool {
        self.0.normalize().scale() <= DECIMAL_PLACES
    }

    /// Lossy conversion for drawing code that works in floating point.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(AmountErrorKind);

enum AmountErrorKind {
    Empty,
    Decimal(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AmountErrorKind::Empty => f.write_str("Empty"),
            AmountErrorKind::Decimal(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AmountErrorKind::Empty => f.write_str("An amount is required"),
            AmountErrorKind::Decimal(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.0 {
            AmountErrorKind::Empty => None,
            AmountErrorKind::Decimal(e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses `-40`, `-40.00`, `R -40.00` or `1,250.50`. An empty string is an error because an
    /// amount is never optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let without_currency = trimmed.strip_prefix(CURRENCY).unwrap_or(trimmed).trim();
        if without_currency.is_empty() {
            return Err(AmountError(AmountErrorKind::Empty));
        }
        let without_commas = without_currency.replace(',', "");
        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(|e| AmountError(AmountErrorKind::Decimal(e)))?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY} {:.2}", self.0.round_dp(DECIMAL_PLACES))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // The store expects a plain decimal string without the currency symbol.
        serializer.serialize_str(&format!("{:.2}", self.0.round_dp(DECIMAL_PLACES)))
    }
}

/// What an amount looks like on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(s) => s,
            RawAmount::Number(n) => n.to_string(),
        };
        Amount::from_str(&s).map_err(serde::de::Error::custom)
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

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-40").unwrap();
        assert_eq!(amount.value(), dec("-40"));
    }

    #[test]
    fn test_parse_with_currency_and_commas() {
        let amount = Amount::from_str("R 1,234,567.89").unwrap();
        assert_eq!(amount.value(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
        assert!(Amount::from_str("R").is_err());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(Amount::from_str("twelve").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::new(dec("100")).to_string(), "R 100.00");
        assert_eq!(Amount::new(dec("-40.5")).to_string(), "R -40.50");
        assert_eq!(Amount::ZERO.to_string(), "R 0.00");
    }

    #[test]
    fn test_display_rounds() {
        assert_eq!(Amount::new(dec("10.005")).to_string(), "R 10.00");
        assert_eq!(Amount::new(dec("10.015")).to_string(), "R 10.02");
    }

    #[test]
    fn test_fits_cents() {
        assert!(Amount::new(dec("12")).fits_cents());
        assert!(Amount::new(dec("-12.34")).fits_cents());
        assert!(Amount::new(dec("12.500")).fits_cents());
        assert!(!Amount::new(dec("12.345")).fits_cents());
        assert!(!Amount::new(dec("0.001")).fits_cents());
    }

    #[test]
    fn test_serialize() {
        let amount = Amount::new(dec("-40"));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"-40.00\"");
    }

    #[test]
    fn test_deserialize_string() {
        let amount: Amount = serde_json::from_str("\"-40.00\"").unwrap();
        assert_eq!(amount.value(), dec("-40.00"));
    }

    #[test]
    fn test_deserialize_number() {
        let amount: Amount = serde_json::from_str("100.25").unwrap();
        assert_eq!(amount.value(), dec("100.25"));
        let amount: Amount = serde_json::from_str("-7").unwrap();
        assert_eq!(amount.value(), dec("-7"));
    }

    #[test]
    fn test_sign_predicates() {
        let zero = Amount::ZERO;
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let income = Amount::from_str("5").unwrap();
        assert!(income.is_positive());
        assert!(!income.is_negative());

        let expense = Amount::from_str("-5").unwrap();
        assert!(expense.is_negative());
        assert!(!expense.is_positive());
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let amount = Amount::from_str("-0.00").unwrap();
        assert!(amount.is_zero());
        assert!(!amount.is_negative());
    }

    #[test]
    fn test_sum() {
        let amounts = ["100", "-40", "0.5"].map(|s| Amount::from_str(s).unwrap());
        let total: Amount = amounts.iter().sum();
        assert_eq!(total.value(), dec("60.5"));
    }
}
