//! Basket model.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use storefront_events::{Broker, Dispatch};

use crate::catalog::{CatalogModel, Product};
use crate::events::BasketChanged;
use crate::ids::ProductId;
use crate::model::Notifier;
use crate::money::Money;

/// Resolved view of the basket carried by [`BasketChanged`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketSnapshot {
    /// Products currently in the basket, in insertion order. Entries the
    /// catalog cannot resolve are left out.
    pub items: Vec<Product>,
    /// Sum of current catalog prices; priceless products count as zero.
    pub total: Money,
    /// Number of distinct entries, resolved or not.
    pub count: usize,
}

/// The set of product ids selected for purchase.
///
/// Every mutation is announced with a [`BasketChanged`] snapshot, except a
/// `remove` that found nothing to remove.
#[derive(Debug)]
pub struct BasketModel {
    notifier: Notifier,
    catalog: Rc<CatalogModel>,
    items: Vec<ProductId>,
}

impl BasketModel {
    pub fn new(broker: Rc<Broker>, catalog: Rc<CatalogModel>) -> Self {
        Self {
            notifier: Notifier::new(broker),
            catalog,
            items: Vec::new(),
        }
    }

    /// Insert a product id if absent.
    ///
    /// Always publishes, so badge counters stay in sync on duplicate adds.
    /// Returns `true` if the id was newly inserted.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        let inserted = !self.items.contains(&product_id);
        if inserted {
            tracing::debug!(product_id = %product_id, "basket add");
            self.items.push(product_id);
        }
        self.notify();
        inserted
    }

    /// Delete a product id if present.
    ///
    /// Publishes only when something was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let Some(position) = self.items.iter().position(|id| id == product_id) else {
            return false;
        };
        self.items.remove(position);
        tracing::debug!(product_id = %product_id, "basket remove");
        self.notify();
        true
    }

    /// Empty the basket; always publishes.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify();
    }

    /// Check if a product is in the basket.
    pub fn has(&self, product_id: &ProductId) -> bool {
        self.items.contains(product_id)
    }

    /// Number of distinct entries.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored ids in insertion order.
    pub fn ids(&self) -> &[ProductId] {
        &self.items
    }

    /// Sum of the current catalog prices of all entries.
    pub fn total_price(&self) -> Money {
        self.items
            .iter()
            .filter_map(|id| self.catalog.get_product(id))
            .map(|product| product.effective_price())
            .sum()
    }

    /// Resolve the basket through the catalog.
    pub fn snapshot(&self) -> BasketSnapshot {
        let items: Vec<Product> = self
            .items
            .iter()
            .filter_map(|id| self.catalog.get_product(id))
            .collect();
        let total = items.iter().map(Product::effective_price).sum();
        BasketSnapshot {
            items,
            total,
            count: self.items.len(),
        }
    }

    fn notify(&self) -> Dispatch {
        self.notifier.notify::<BasketChanged>(self.snapshot())
    }
}
