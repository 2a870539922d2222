//! Storefront application layer.
//!
//! - [`CheckoutMediator`]: sequences the catalog → basket → delivery →
//!   contacts → order workflow and is the only caller of the remote API
//! - [`render`]: the render collaborator and its event binding
//! - [`config`] and [`logging`]: ambient setup for the `storefront` binary

pub mod config;
pub mod error;
pub mod logging;
pub mod mediator;
pub mod render;

pub use config::StorefrontConfig;
pub use error::{CheckoutError, ConfigError};
pub use logging::{init_logging, LogFormat};
pub use mediator::CheckoutMediator;
pub use render::{Renderer, TextRenderer, ViewBinding};
