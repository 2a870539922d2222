//! Application error types.

use std::path::PathBuf;

use storefront_commerce::events::RejectionReason;
use storefront_commerce::ProductId;
use storefront_data::ApiError;
use thiserror::Error;

/// Errors raised while driving the checkout workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("An order is already being submitted")]
    SubmissionInFlight,

    #[error("The order form is incomplete")]
    InvalidOrder,

    #[error("The basket is empty")]
    EmptyBasket,

    #[error("Product {0} is not for sale")]
    NotForSale(ProductId),

    #[error("Product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    #[error("Remote API call failed: {0}")]
    Api(#[from] ApiError),

    /// A model was touched from inside one of its own change handlers.
    #[error("{model} model accessed while it is publishing a change")]
    ReentrantModelAccess { model: &'static str },
}

impl CheckoutError {
    /// The user-facing rejection this error stands for, if any.
    ///
    /// API failures and re-entrant access are not rejections: they are
    /// reported through their own channels.
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            CheckoutError::SubmissionInFlight => Some(RejectionReason::SubmissionInFlight),
            CheckoutError::InvalidOrder => Some(RejectionReason::InvalidOrder),
            CheckoutError::EmptyBasket => Some(RejectionReason::EmptyBasket),
            CheckoutError::NotForSale(id) => Some(RejectionReason::NotForSale(id.clone())),
            CheckoutError::UnknownProduct(id) => Some(RejectionReason::UnknownProduct(id.clone())),
            CheckoutError::Api(_) | CheckoutError::ReentrantModelAccess { .. } => None,
        }
    }
}

/// Errors loading configuration or bootstrapping logging.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}
