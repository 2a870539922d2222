//! Storefront domain types and change-notifying models.
//!
//! This crate holds everything the checkout core owns:
//!
//! - **Catalog**: products, categories and the `CatalogModel`
//! - **Basket**: the set of selected product ids and its `BasketModel`
//! - **Checkout**: payment methods, validation, the `OrderModel`, steps
//! - **Events**: the closed catalogue of broker topics and their payloads
//!
//! Every model receives the shared [`Broker`](storefront_events::Broker)
//! through its constructor and announces state changes with a
//! [`Notifier`].
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use storefront_commerce::prelude::*;
//! use storefront_events::Broker;
//!
//! let broker = Broker::shared();
//! let catalog = Rc::new(CatalogModel::new(Rc::clone(&broker)));
//! catalog.set_products(vec![
//!     Product::new("p1", "Rust handbook", Category::HardSkill).with_price(Money::new(100)),
//! ])?;
//!
//! let mut basket = BasketModel::new(Rc::clone(&broker), Rc::clone(&catalog));
//! basket.add(ProductId::new("p1"));
//! assert_eq!(basket.total_price(), Money::new(100));
//! assert_eq!(basket.count(), 1);
//! # Ok::<(), storefront_commerce::CommerceError>(())
//! ```

pub mod error;
pub mod events;
pub mod ids;
pub mod model;
pub mod money;

pub mod basket;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use model::Notifier;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::events::*;
    pub use crate::ids::*;
    pub use crate::model::Notifier;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{CatalogModel, Category, Product};

    // Basket
    pub use crate::basket::{BasketModel, BasketSnapshot};

    // Checkout
    pub use crate::checkout::{
        CheckoutStep, FormState, OrderDraft, OrderModel, OrderReceipt, OrderRequest,
        PaymentMethod, SubForm, ValidationError,
    };
}
