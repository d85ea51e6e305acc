//! Tienda Catalog Core
//!
//! Shared catalog state and product ingestion for the Tienda storefront.
//!
//! ## Features
//! - Single shared catalog state with reactive subscribers
//! - Remote document store and asset host gateway
//! - Two-phase product creation (image upload, then document persist)
//! - Derived pricing and stock availability

use thiserror::Error;

pub mod config;
pub mod detail;
pub mod domain;
pub mod gateway;
pub mod ingest;
pub mod store;

pub use config::CatalogConfig;
pub use detail::{DetailBinder, ProductDetail};
pub use domain::pricing;
pub use domain::product::{Product, ProductDetails, ProductDraft, ProductFields};
pub use gateway::{CatalogBackend, RemoteCatalogGateway};
pub use ingest::ProductIngest;
pub use store::{CatalogState, CatalogStore};

// =============================================================================
// Error Types
// =============================================================================

/// Failures surfaced by the catalog core.
///
/// Remote failures are typed at the gateway boundary; no raw transport
/// errors reach store or pipeline callers.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Draft rejected before any network call was issued.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Listing the product collection failed.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Image upload to the asset host failed; nothing was persisted.
    #[error("Image upload failed: {0}")]
    Upload(String),

    /// Document write failed after a successful upload. The uploaded
    /// asset stays on the host with no referencing document.
    #[error("Persist failed: {0}")]
    Persist(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient inventory")]
    InsufficientInventory,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
