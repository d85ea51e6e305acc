//! Remote endpoint configuration.
//!
//! The core talks to exactly two collaborators: the document store holding
//! the `products` collection and the asset host storing uploaded images.
//! Both are configured from the environment at process start; there is no
//! other configuration surface and no persisted local state.

use std::time::Duration;

use crate::CatalogError;

/// Connection settings for the remote document store and asset host.
///
/// - `DOCUMENT_STORE_URL`: base URL of the document store (required)
/// - `ASSET_HOST_URL`: image upload endpoint (required)
/// - `ASSET_HOST_KEY`: fixed access credential for uploads (required)
/// - `HTTP_TIMEOUT_SECS`: optional request timeout in seconds (default: 30)
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub document_store_url: String,
    pub asset_host_url: String,
    pub asset_host_key: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(
        document_store_url: impl Into<String>,
        asset_host_url: impl Into<String>,
        asset_host_key: impl Into<String>,
    ) -> Self {
        Self {
            document_store_url: document_store_url.into(),
            asset_host_url: asset_host_url.into(),
            asset_host_key: asset_host_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, CatalogError> {
        let document_store_url = require_var("DOCUMENT_STORE_URL")?;
        let asset_host_url = require_var("ASSET_HOST_URL")?;
        let asset_host_key = require_var("ASSET_HOST_KEY")?;

        let timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            document_store_url,
            asset_host_url,
            asset_host_key,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn require_var(name: &str) -> Result<String, CatalogError> {
    std::env::var(name).map_err(|_| CatalogError::Config(format!("{name} not set")))
}
