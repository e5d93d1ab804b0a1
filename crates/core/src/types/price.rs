//! Currency-agnostic price representation using decimal arithmetic.
//!
//! The catalog does not carry a currency; the storefront appends a
//! configured label (e.g. `ج.م`) when rendering.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price in the store's single, implicit currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with a currency label, e.g. `"1500 ج.م"`.
    ///
    /// Trailing fractional zeros are dropped so whole prices stay whole.
    #[must_use]
    pub fn display_with(&self, currency_label: &str) -> String {
        if currency_label.is_empty() {
            self.to_string()
        } else {
            format!("{self} {currency_label}")
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_drops_trailing_zeros() {
        let price = Price::new(Decimal::new(150_000, 2));
        assert_eq!(price.to_string(), "1500");

        let price = Price::new(Decimal::new(149_950, 2));
        assert_eq!(price.to_string(), "1499.5");
    }

    #[test]
    fn test_display_with_label() {
        let price = Price::new(Decimal::from(850));
        assert_eq!(price.display_with("ج.م"), "850 ج.م");
        assert_eq!(price.display_with(""), "850");
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("1200").unwrap();
        assert_eq!(price.amount(), Decimal::from(1200));
    }

    #[test]
    fn test_deserialize_from_json_string() {
        let price: Price = serde_json::from_str("\"99.90\"").unwrap();
        assert_eq!(price.amount(), Decimal::new(9990, 2));
    }
}
