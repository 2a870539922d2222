//! Remote commerce API for the storefront.
//!
//! [`CommerceApi`] is the contract the checkout mediator calls;
//! [`HttpCommerceApi`] implements it over HTTP with timeouts and a
//! [`RetryPolicy`] for product fetches.
//!
//! # Example
//!
//! ```rust,no_run
//! use storefront_data::{CommerceApi, HttpCommerceApi, TimeoutConfig};
//!
//! # async fn run() -> Result<(), storefront_data::ApiError> {
//! let api = HttpCommerceApi::new(
//!     "https://larek-api.nomoreparties.co/api/weblarek",
//!     TimeoutConfig::default(),
//! )?;
//! let products = api.fetch_products().await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod error;
mod retry;
mod timeout;

pub mod dto;

pub use api::CommerceApi;
pub use client::{HttpCommerceApi, ORDERS_PATH, PRODUCTS_PATH};
pub use error::ApiError;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use timeout::TimeoutConfig;
