//! Payment methods.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CommerceError;

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid online by card.
    Online,
    /// Paid in cash on delivery.
    Cash,
}

impl PaymentMethod {
    /// All payment methods, in display order.
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Online, PaymentMethod::Cash];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "Online",
            PaymentMethod::Cash => "Cash on delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" | "card" => Ok(PaymentMethod::Online),
            "cash" => Ok(PaymentMethod::Cash),
            _ => Err(CommerceError::UnknownPaymentMethod(s.to_string())),
        }
    }
}
