//! Product detail resolution.
//!
//! A derived view over the live catalog state: it never fetches on its own
//! and re-resolves whenever the state or the watched identifier changes.

use tokio::sync::watch;

use crate::domain::product::Product;
use crate::store::{CatalogState, CatalogStore};

/// Resolution of one product identifier against the catalog state.
#[derive(Clone, Debug, PartialEq)]
pub enum ProductDetail {
    /// The catalog is still loading.
    Loading,
    /// The catalog failed to load.
    Failed(String),
    /// The catalog is ready but holds no product with this identifier.
    NotFound,
    Found(Product),
}

impl ProductDetail {
    pub fn resolve(state: &CatalogState, id: &str) -> Self {
        match state {
            CatalogState::Loading => Self::Loading,
            CatalogState::Failed(message) => Self::Failed(message.clone()),
            CatalogState::Ready(products) => products
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .map_or(Self::NotFound, Self::Found),
        }
    }
}

/// Keeps one product identifier resolved against the live catalog.
pub struct DetailBinder {
    states: watch::Receiver<CatalogState>,
    id: String,
}

impl DetailBinder {
    pub fn new(store: &CatalogStore, id: impl Into<String>) -> Self {
        Self {
            states: store.subscribe(),
            id: id.into(),
        }
    }

    /// Resolution against the current state.
    pub fn current(&self) -> ProductDetail {
        ProductDetail::resolve(&self.states.borrow(), &self.id)
    }

    /// Switch the binder to another product identifier.
    pub fn watch_product(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Wait for the next catalog transition and resolve against it. If the
    /// store is gone, resolves against the last known state.
    pub async fn changed(&mut self) -> ProductDetail {
        let _ = self.states.changed().await;
        let state = self.states.borrow_and_update().clone();
        ProductDetail::resolve(&state, &self.id)
    }
}
