//! Money type for representing prices.
//!
//! The shop trades in a single unit ("synapses") and only whole amounts,
//! so a price is an unsigned integer. Sums saturate instead of wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Name of the shop's currency unit.
pub const CURRENCY_UNIT: &str = "synapses";

/// Label shown for products without a price.
pub const PRICELESS_LABEL: &str = "Priceless";

/// A non-negative amount of synapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    amount: u64,
}

impl Money {
    /// Create a new Money value.
    pub const fn new(amount: u64) -> Self {
        Self { amount }
    }

    /// Zero synapses.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Get the raw amount.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Add without overflowing.
    pub fn saturating_add(self, other: Money) -> Money {
        Money::new(self.amount.saturating_add(other.amount))
    }

    /// Format as a display string (e.g., "750 synapses").
    pub fn display(&self) -> String {
        format!("{} {}", self.amount, CURRENCY_UNIT)
    }

    /// Format an optional price, using the priceless label for `None`.
    pub fn display_price(price: Option<Money>) -> String {
        match price {
            Some(price) => price.display(),
            None => PRICELESS_LABEL.to_string(),
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.saturating_add(other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl From<u64> for Money {
    fn from(amount: u64) -> Self {
        Money::new(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
