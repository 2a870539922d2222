//! Catalog model: the authoritative copy of every loaded product.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use storefront_events::{Broker, Dispatch};

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::events::{CatalogLoaded, CatalogSnapshot};
use crate::ids::ProductId;
use crate::model::Notifier;

#[derive(Debug, Default)]
struct CatalogState {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

/// Holds the purchasable products, keyed by id.
///
/// The catalog is read from many places (the basket resolves prices through
/// it on every query) so it is shared as `Rc<CatalogModel>` and keeps its
/// state behind a `RefCell` that is never borrowed across a publish.
/// Reads are allowed from `CatalogLoaded` handlers; writes are not.
#[derive(Debug)]
pub struct CatalogModel {
    notifier: Notifier,
    state: RefCell<CatalogState>,
    publishing: Cell<bool>,
}

impl CatalogModel {
    pub fn new(broker: Rc<Broker>) -> Self {
        Self {
            notifier: Notifier::new(broker),
            state: RefCell::new(CatalogState::default()),
            publishing: Cell::new(false),
        }
    }

    /// Replace the whole product set and announce it.
    ///
    /// When ids repeat, the first occurrence wins. Fails without touching
    /// the catalog when called while `CatalogLoaded` is being dispatched.
    pub fn set_products(&self, products: Vec<Product>) -> Result<Dispatch, CommerceError> {
        if self.publishing.get() {
            tracing::error!("catalog replaced from its own change handler");
            return Err(CommerceError::ReentrantUpdate { model: "catalog" });
        }

        let mut index = HashMap::with_capacity(products.len());
        let mut unique = Vec::with_capacity(products.len());
        for product in products {
            if index.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "duplicate product id in catalog");
                continue;
            }
            index.insert(product.id.clone(), unique.len());
            unique.push(product);
        }

        let snapshot = CatalogSnapshot {
            products: unique.clone(),
        };
        {
            let mut state = self.state.borrow_mut();
            state.products = unique;
            state.index = index;
        }

        tracing::info!(products = snapshot.products.len(), "catalog loaded");
        self.publishing.set(true);
        let dispatch = self.notifier.notify::<CatalogLoaded>(snapshot);
        self.publishing.set(false);
        Ok(dispatch)
    }

    /// Look up a product; `None` when the id is unknown.
    pub fn get_product(&self, id: &ProductId) -> Option<Product> {
        let state = self.state.borrow();
        state
            .index
            .get(id)
            .and_then(|&i| state.products.get(i))
            .cloned()
    }

    /// Check if a product id is known.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.state.borrow().index.contains_key(id)
    }

    /// All products in load order.
    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().products.clone()
    }

    /// Number of loaded products.
    pub fn len(&self) -> usize {
        self.state.borrow().products.len()
    }

    /// Check if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().products.is_empty()
    }
}
