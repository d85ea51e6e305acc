//! Product ingestion pipeline.
//!
//! Validate first, then the two-phase remote write, then exactly one
//! catalog refresh so every consumer converges on the new collection.

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::domain::product::ProductDraft;
use crate::gateway::CatalogBackend;
use crate::store::CatalogStore;
use crate::{CatalogError, Result};

/// Validation-then-write pipeline for operator-created products.
pub struct ProductIngest {
    backend: Arc<dyn CatalogBackend>,
    store: Arc<CatalogStore>,
}

impl ProductIngest {
    pub fn new(backend: Arc<dyn CatalogBackend>, store: Arc<CatalogStore>) -> Self {
        Self { backend, store }
    }

    /// Create one product from a draft.
    ///
    /// An invalid draft fails with [`CatalogError::Validation`] before any
    /// network call. On success the store is refreshed exactly once and
    /// the new identifier is returned. On failure nothing is refreshed and
    /// no retry is attempted; the borrowed draft stays with the caller so
    /// it can be corrected and resubmitted.
    pub async fn submit(&self, draft: &ProductDraft) -> Result<String> {
        draft
            .validate()
            .map_err(|errors| CatalogError::Validation(flatten_errors(&errors)))?;

        let id = match self.backend.add_product(draft).await {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, nombre = %draft.nombre, "product ingestion failed");
                return Err(err);
            }
        };

        info!(%id, nombre = %draft.nombre, "product ingested");
        self.store.refresh().await;
        Ok(id)
    }
}

fn flatten_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let detail = field_errors
                .iter()
                .filter_map(|e| e.message.as_ref())
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            if detail.is_empty() {
                format!("{field} is invalid")
            } else {
                detail
            }
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{Product, ProductFields};
    use crate::store::CatalogState;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every remote call; outcomes are scripted per operation.
    struct RecordingBackend {
        upload: std::result::Result<String, String>,
        persist: std::result::Result<String, String>,
        uploads: Mutex<Vec<Vec<u8>>>,
        creates: Mutex<Vec<ProductFields>>,
        listings: AtomicUsize,
    }

    impl RecordingBackend {
        fn succeeding(url: &str, id: &str) -> Arc<Self> {
            Arc::new(Self {
                upload: Ok(url.to_string()),
                persist: Ok(id.to_string()),
                uploads: Mutex::new(vec![]),
                creates: Mutex::new(vec![]),
                listings: AtomicUsize::new(0),
            })
        }

        fn upload_failing(message: &str) -> Arc<Self> {
            let mut backend = Self::template();
            backend.upload = Err(message.to_string());
            Arc::new(backend)
        }

        fn persist_failing(url: &str, message: &str) -> Arc<Self> {
            let mut backend = Self::template();
            backend.upload = Ok(url.to_string());
            backend.persist = Err(message.to_string());
            Arc::new(backend)
        }

        fn template() -> Self {
            Self {
                upload: Ok(String::new()),
                persist: Ok(String::new()),
                uploads: Mutex::new(vec![]),
                creates: Mutex::new(vec![]),
                listings: AtomicUsize::new(0),
            }
        }

        fn network_calls(&self) -> usize {
            self.uploads.lock().unwrap().len()
                + self.creates.lock().unwrap().len()
                + self.listings.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogBackend for RecordingBackend {
        async fn list_products(&self) -> Result<Vec<Product>> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn upload_image(&self, imagen: &[u8]) -> Result<String> {
            self.uploads.lock().unwrap().push(imagen.to_vec());
            self.upload.clone().map_err(CatalogError::Upload)
        }

        async fn create_document(&self, fields: &ProductFields) -> Result<String> {
            self.creates.lock().unwrap().push(fields.clone());
            self.persist.clone().map_err(CatalogError::Persist)
        }
    }

    fn pipeline(backend: Arc<RecordingBackend>) -> (ProductIngest, Arc<CatalogStore>) {
        let store = Arc::new(CatalogStore::new(backend.clone()));
        (ProductIngest::new(backend, store.clone()), store)
    }

    fn watch_draft() -> ProductDraft {
        ProductDraft::new("Watch", vec![0xde, 0xad], Decimal::new(200, 0), 5)
            .with_oferta(Decimal::new(10, 0))
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_the_network() {
        let backend = RecordingBackend::succeeding("https://assets.example/u.png", "p1");
        let (ingest, _store) = pipeline(backend.clone());

        let mut draft = watch_draft();
        draft.nombre.clear();

        let err = ingest.submit(&draft).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(backend.network_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_before_persist() {
        let backend = RecordingBackend::upload_failing("asset host returned 500");
        let (ingest, store) = pipeline(backend.clone());
        let draft = watch_draft();

        let err = ingest.submit(&draft).await.unwrap_err();
        assert!(matches!(err, CatalogError::Upload(_)));
        assert!(backend.creates.lock().unwrap().is_empty());
        // No refresh was signalled and the caller still holds the draft.
        assert_eq!(backend.listings.load(Ordering::SeqCst), 0);
        assert!(store.state().is_loading());
        assert_eq!(draft.nombre, "Watch");
    }

    #[tokio::test]
    async fn test_persist_failure_after_upload_is_typed() {
        let backend =
            RecordingBackend::persist_failing("https://assets.example/u.png", "store down");
        let (ingest, _store) = pipeline(backend.clone());

        let err = ingest.submit(&watch_draft()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Persist(_)));
        // The upload happened; the asset is now orphaned on the host.
        assert_eq!(backend.uploads.lock().unwrap().len(), 1);
        assert_eq!(backend.listings.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_ingest_end_to_end() {
        let backend = RecordingBackend::succeeding("https://assets.example/u.png", "p1");
        let (ingest, store) = pipeline(backend.clone());

        let id = ingest.submit(&watch_draft()).await.unwrap();
        assert_eq!(id, "p1");

        let creates = backend.creates.lock().unwrap();
        assert_eq!(creates.len(), 1);
        assert_eq!(
            creates[0].imagen.as_deref(),
            Some("https://assets.example/u.png")
        );
        assert_eq!(creates[0].nombre, "Watch");
        assert_eq!(creates[0].precio, Decimal::new(200, 0));
        assert_eq!(creates[0].porcentaje_oferta, Decimal::new(10, 0));
        assert_eq!(creates[0].cantidad_disponible, 5);

        // Exactly one refresh, and the store converged on its result.
        assert_eq!(backend.listings.load(Ordering::SeqCst), 1);
        assert!(matches!(store.state(), CatalogState::Ready(_)));
    }
}
