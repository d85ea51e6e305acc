//! The single shared source of truth for product data.
//!
//! One `CatalogStore` exists per process, built by the entry point and
//! handed to consumers by reference. State transitions are pushed to
//! subscribers through a watch channel; nothing polls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::product::Product;
use crate::gateway::CatalogBackend;
use crate::{CatalogError, Result};

/// Catalog state observed by every view.
#[derive(Clone, Debug, Default)]
pub enum CatalogState {
    /// A fetch is in flight; list and detail rendering block on it.
    #[default]
    Loading,
    /// The last fetch succeeded. Order is whatever the store returned and
    /// is not stable across refreshes.
    Ready(Vec<Product>),
    /// The last fetch failed; [`CatalogStore::refresh`] retries.
    Failed(String),
}

impl CatalogState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }

    pub fn products(&self) -> Option<&[Product]> {
        match self {
            CatalogState::Ready(products) => Some(products),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CatalogState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Shared catalog store over a remote backend.
pub struct CatalogStore {
    backend: Arc<dyn CatalogBackend>,
    state: watch::Sender<CatalogState>,
    issued: AtomicU64,
}

impl CatalogStore {
    /// New store in `Loading`. The owner performs the initial
    /// [`refresh`](Self::refresh).
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        let (state, _) = watch::channel(CatalogState::Loading);
        Self {
            backend,
            state,
            issued: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Observe every state transition.
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    /// Re-enter `Loading` and fetch the collection again.
    ///
    /// Overlapping calls are not coalesced; each issues its own fetch. A
    /// monotonically increasing ticket guards completion: a fetch that
    /// resolves after a newer one was issued is discarded, so the
    /// last-issued refresh wins regardless of resolution order.
    pub async fn refresh(&self) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(CatalogState::Loading);
        debug!(ticket, "catalog fetch issued");

        let outcome = self.backend.list_products().await;

        if self.issued.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "stale catalog fetch discarded");
            return;
        }

        match outcome {
            Ok(products) => {
                info!(count = products.len(), "catalog ready");
                self.state.send_replace(CatalogState::Ready(products));
            }
            Err(err) => {
                warn!(%err, "catalog fetch failed");
                self.state.send_replace(CatalogState::Failed(err.to_string()));
            }
        }
    }

    /// Decrement the stock of one product and broadcast the new state to
    /// every subscriber.
    ///
    /// Local to this process: the remote document is not updated. Returns
    /// the remaining stock on success.
    pub fn decrement_stock(&self, id: &str) -> Result<u32> {
        let mut outcome = Err(CatalogError::ProductNotFound(id.to_string()));
        self.state.send_if_modified(|state| {
            let CatalogState::Ready(products) = state else {
                return false;
            };
            let Some(product) = products.iter_mut().find(|p| p.id == id) else {
                return false;
            };
            if product.fields.cantidad_disponible == 0 {
                outcome = Err(CatalogError::InsufficientInventory);
                return false;
            }
            product.fields.cantidad_disponible -= 1;
            outcome = Ok(product.fields.cantidad_disponible);
            true
        });
        outcome
    }
}
