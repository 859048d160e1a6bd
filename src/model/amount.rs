//! Amount type for whole-currency-unit values.
//!
//! The ledger stores amounts as non-negative integers of the household's
//! currency unit. Values read back from the sheet may carry thousands
//! separators, which parsing strips.

use format_num::format_num;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A non-negative whole number of currency units.
///
/// # Examples
///
/// ```
/// # use hearth_ledger::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1,000").unwrap();
/// assert_eq!(amount.value(), 1000);
/// assert_eq!(amount.to_string(), "1,000");
/// ```
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new `Amount` from a count of currency units.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the number of currency units.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The unformatted digits, as written to the backing sheet.
    pub fn plain(&self) -> String {
        self.0.to_string()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AmountError(String);

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a non-negative whole amount", self.0)
    }
}

impl std::error::Error for AmountError {}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }

        // Strip thousands separators before parsing.
        let without_commas = trimmed.replace(',', "");
        if let Ok(value) = without_commas.parse::<u64>() {
            return Ok(Amount(value));
        }

        // Sheets sometimes render integers as floats ("1000.0"); truncate those.
        match without_commas.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => Ok(Amount(value as u64)),
            _ => Err(AmountError(s.to_string())),
        }
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_num!(",.0f", self.0 as f64))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("1000").unwrap();
        assert_eq!(amount.value(), 1000);
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("1,000").unwrap();
        assert_eq!(amount.value(), 1000);
    }

    #[test]
    fn test_parse_multiple_commas() {
        let amount = Amount::from_str("1,234,567").unwrap();
        assert_eq!(amount.value(), 1234567);
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  2000  ").unwrap();
        assert_eq!(amount.value(), 2000);
    }

    #[test]
    fn test_parse_float_rendering() {
        let amount = Amount::from_str("1000.0").unwrap();
        assert_eq!(amount.value(), 1000);
    }

    #[test]
    fn test_parse_negative_fails() {
        assert!(Amount::from_str("-500").is_err());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("lots").is_err());
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Amount::new(2000000).to_string(), "2,000,000");
        assert_eq!(Amount::new(950).to_string(), "950");
    }

    #[test]
    fn test_plain_has_no_separators() {
        assert_eq!(Amount::new(2000000).plain(), "2000000");
    }

    #[test]
    fn test_serde_roundtrip() {
        let amount = Amount::new(4500);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "4500");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
