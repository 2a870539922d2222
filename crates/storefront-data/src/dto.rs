//! Wire shapes of the commerce API.

use serde::{Deserialize, Serialize};
use storefront_commerce::catalog::{Category, Product};
use storefront_commerce::{Money, ProductId};

/// A product as the server sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub title: String,
    pub category: String,
    pub price: Option<u64>,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        let category = Category::from_label(&dto.category).unwrap_or_else(|| {
            tracing::warn!(
                product_id = %dto.id,
                category = %dto.category,
                "unknown product category, using default"
            );
            Category::default()
        });

        Product {
            id: ProductId::new(dto.id),
            title: dto.title,
            description: dto.description,
            image: dto.image,
            price: dto.price.map(Money::new),
            category,
        }
    }
}

/// Body of `GET /product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListDto {
    pub total: usize,
    pub items: Vec<ProductDto>,
}

impl ProductListDto {
    pub fn into_products(self) -> Vec<Product> {
        if self.total != self.items.len() {
            tracing::debug!(
                total = self.total,
                received = self.items.len(),
                "product list is partial"
            );
        }
        self.items.into_iter().map(Product::from).collect()
    }
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
