//! Checkout step sequence.

use serde::{Deserialize, Serialize};

/// Steps of the storefront workflow, in the order the user meets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Catalog browsing, no dialog open.
    #[default]
    Browsing,
    /// Basket review.
    Basket,
    /// Address and payment method.
    Delivery,
    /// Email and phone.
    Contacts,
    /// Order placed.
    Complete,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Browsing => "browsing",
            CheckoutStep::Basket => "basket",
            CheckoutStep::Delivery => "delivery",
            CheckoutStep::Contacts => "contacts",
            CheckoutStep::Complete => "complete",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Browsing => "Catalog",
            CheckoutStep::Basket => "Basket",
            CheckoutStep::Delivery => "Delivery",
            CheckoutStep::Contacts => "Contacts",
            CheckoutStep::Complete => "Complete",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Browsing => 1,
            CheckoutStep::Basket => 2,
            CheckoutStep::Delivery => 3,
            CheckoutStep::Contacts => 4,
            CheckoutStep::Complete => 5,
        }
    }

}
