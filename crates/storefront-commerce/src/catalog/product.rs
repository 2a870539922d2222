//! Product type.

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::ids::ProductId;
use crate::money::Money;

/// A product in the catalog.
///
/// Products are immutable once loaded. Other components hold a
/// [`ProductId`] and resolve it through the
/// [`CatalogModel`](crate::catalog::CatalogModel) when they need data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Image path relative to the CDN base.
    pub image: String,
    /// Price; `None` means the product is not for sale.
    pub price: Option<Money>,
    /// Category tag.
    pub category: Category,
}

impl Product {
    /// Create a priceless product with empty description and image.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image: String::new(),
            price: None,
            category,
        }
    }

    /// Set the price.
    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the image path.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Check if the product can be ordered.
    pub fn is_for_sale(&self) -> bool {
        self.price.is_some()
    }

    /// Price as counted in basket totals (priceless counts as zero).
    pub fn effective_price(&self) -> Money {
        self.price.unwrap_or_default()
    }

    /// Price label for display.
    pub fn price_label(&self) -> String {
        Money::display_price(self.price)
    }

    /// Absolute image URL under `cdn_base`.
    pub fn image_url(&self, cdn_base: &str) -> String {
        if self.image.starts_with("http://") || self.image.starts_with("https://") {
            return self.image.clone();
        }
        format!(
            "{}/{}",
            cdn_base.trim_end_matches('/'),
            self.image.trim_start_matches('/')
        )
    }
}
