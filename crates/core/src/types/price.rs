//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative price in the store currency (Indian rupees).
///
/// Serialized as a decimal string; deserialization accepts JSON numbers or
/// strings and rejects negative amounts.
///
/// ```
/// use lustre_core::Price;
///
/// let price: Price = "2499.50".parse().unwrap();
/// assert_eq!(price.display(), "₹2,499.50");
/// assert!("-1".parse::<Price>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Upper bound applied by search when no price ceiling is requested.
    pub const DEFAULT_CEILING: Self = Self(Decimal::from_parts(100_000, 0, 0, false, 0));

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: u32) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with a rupee sign and thousands separators,
    /// e.g. `₹12,500` or `₹2,499.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.0.round_dp(2);
        let text = rounded.to_string();
        let (whole, frac) = text.split_once('.').unwrap_or((&text, ""));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        match frac.len() {
            0 => format!("₹{grouped}"),
            1 => format!("₹{grouped}.{frac}0"),
            _ => format!("₹{grouped}.{frac}"),
        }
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(e.to_string()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_default_ceiling() {
        assert_eq!(Price::DEFAULT_CEILING, Price::from_rupees(100_000));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_rupees(500).display(), "₹500");
        assert_eq!(Price::from_rupees(12_500).display(), "₹12,500");
        assert_eq!("1999.5".parse::<Price>().unwrap().display(), "₹1,999.50");
    }

    #[test]
    fn test_deserialize_accepts_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("500").unwrap();
        let from_string: Price = serde_json::from_str("\"500\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "abc".parse::<Price>(),
            Err(PriceError::Invalid(_))
        ));
    }
}
