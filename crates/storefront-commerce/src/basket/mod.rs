//! Shopping basket module.
//!
//! The basket stores distinct product ids; prices are resolved through
//! the catalog at query time.

mod model;

pub use model::{BasketModel, BasketSnapshot};
