//! Product catalog module.
//!
//! Contains the product type, its category tags and the catalog model.

mod category;
mod model;
mod product;

pub use category::Category;
pub use model::CatalogModel;
pub use product::Product;
