//! Currency amounts.
//!
//! Every price and budget is held in integer minor units (cents) so that the
//! budget invariant is checked with exact arithmetic. Amounts render as
//! `"123.45"` and serialize to JSON as decimal numbers.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A non-negative currency amount in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units, e.g. `Money::from_units(45)` is `45.00`.
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Whether `self + price` stays within `budget`.
    ///
    /// An overflowing sum never fits.
    pub fn fits_within(self, price: Self, budget: Self) -> bool {
        self.checked_add(price).is_some_and(|total| total <= budget)
    }

    /// Scale by `(100 + percent) / 100`, rounding up to the next cent.
    pub fn with_buffer_percent(self, percent: u32) -> Self {
        let scaled = i128::from(self.0) * (100 + i128::from(percent));
        let rounded = (scaled + 99).div_euclid(100);
        Self(i64::try_from(rounded).unwrap_or(i64::MAX))
    }

    /// Parse a decimal amount such as `"120"`, `"120.5"` or `"120.50"`.
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        if s.starts_with('-') {
            return Err(MoneyParseError::Negative(s.to_string()));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(MoneyParseError::Invalid(s.to_string()));
        }
        if frac.len() > 2 {
            return Err(MoneyParseError::TooPrecise(s.to_string()));
        }
        let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) {
            return Err(MoneyParseError::Invalid(s.to_string()));
        }

        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| MoneyParseError::Invalid(s.to_string()))?
        };
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().unwrap_or(0) * 10,
            _ => frac.parse::<i64>().unwrap_or(0),
        };

        whole_units
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Self)
            .ok_or_else(|| MoneyParseError::Invalid(s.to_string()))
    }

    /// Convert a JSON-style float, rounding to the nearest cent.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > (i64::MAX / 100) as f64 {
            return None;
        }
        Some(Self((value * 100.0).round() as i64))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Errors raised when parsing a money amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyParseError {
    #[error("amount is empty")]
    Empty,
    #[error("amount cannot be negative: {0}")]
    Negative(String),
    #[error("amount has more than two decimal places: {0}")]
    TooPrecise(String),
    #[error("invalid amount: {0}")]
    Invalid(String),
}

impl std::str::FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl Visitor<'_> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative amount as a number or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|units| units.checked_mul(100))
                    .map(Money)
                    .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                if v < 0 {
                    return Err(E::custom(format!("amount cannot be negative: {v}")));
                }
                v.checked_mul(100)
                    .map(Money)
                    .ok_or_else(|| E::custom(format!("amount out of range: {v}")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                Money::from_f64(v).ok_or_else(|| E::custom(format!("invalid amount: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                Money::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amounts() {
        assert_eq!(Money::parse("120").unwrap(), Money::from_cents(12_000));
        assert_eq!(Money::parse("120.5").unwrap(), Money::from_cents(12_050));
        assert_eq!(Money::parse("0.07").unwrap(), Money::from_cents(7));
        assert_eq!(Money::parse(" 45.00 ").unwrap(), Money::from_units(45));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Money::parse(""), Err(MoneyParseError::Empty));
        assert!(matches!(Money::parse("-1"), Err(MoneyParseError::Negative(_))));
        assert!(matches!(Money::parse("1.234"), Err(MoneyParseError::TooPrecise(_))));
        assert!(matches!(Money::parse("12a"), Err(MoneyParseError::Invalid(_))));
        assert!(matches!(Money::parse("."), Err(MoneyParseError::Invalid(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(4_505).to_string(), "45.05");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_buffer_rounds_up() {
        assert_eq!(Money::from_units(100).with_buffer_percent(5), Money::from_units(105));
        // 0.10 * 1.05 = 0.105 -> 0.11
        assert_eq!(Money::from_cents(10).with_buffer_percent(5), Money::from_cents(11));
        assert_eq!(Money::ZERO.with_buffer_percent(5), Money::ZERO);
    }

    #[test]
    fn test_fits_within() {
        let budget = Money::from_units(80);
        assert!(Money::from_units(70).fits_within(Money::from_units(10), budget));
        assert!(!Money::from_units(70).fits_within(Money::from_units(20), budget));
        assert!(!Money::from_cents(i64::MAX).fits_within(Money::from_cents(1), Money::from_cents(i64::MAX)));
    }

    #[test]
    fn test_json_roundtrip_accepts_numbers_and_strings() {
        let m: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(m, Money::from_cents(1_250));
        let m: Money = serde_json::from_str("30").unwrap();
        assert_eq!(m, Money::from_units(30));
        let m: Money = serde_json::from_str("\"19.99\"").unwrap();
        assert_eq!(m, Money::from_cents(1_999));
        assert!(serde_json::from_str::<Money>("-3").is_err());
        assert_eq!(serde_json::to_string(&Money::from_cents(1_250)).unwrap(), "12.5");
    }
}
