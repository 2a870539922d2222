//! Commerce error types.

use thiserror::Error;

/// Errors raised while interpreting domain values.
///
/// Form validation never produces these: it is reported through
/// [`ValidationError`](crate::checkout::ValidationError) lists instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Category label outside the closed set.
    #[error("Unknown product category: {0}")]
    UnknownCategory(String),

    /// Payment method outside the closed set.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// A model was written from a handler of its own change event.
    #[error("The {model} model cannot be modified from its own change handler")]
    ReentrantUpdate { model: &'static str },
}
