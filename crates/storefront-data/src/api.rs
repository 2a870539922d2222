//! The remote commerce API contract.

use async_trait::async_trait;
use storefront_commerce::catalog::Product;
use storefront_commerce::checkout::{OrderReceipt, OrderRequest};

use crate::ApiError;

/// Remote catalog and order service.
///
/// Futures are not `Send`: callers drive them on a single-threaded
/// runtime next to the models.
#[async_trait(?Send)]
pub trait CommerceApi {
    /// Fetch the full product list.
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Place an order.
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderReceipt, ApiError>;
}
