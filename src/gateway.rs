//! Remote collaborators: the document store and the asset host.
//!
//! The gateway is stateless and cache-free. Every transport or decode
//! failure is converted into a typed [`CatalogError`] at this boundary;
//! no raw HTTP errors cross into the store or pipeline.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::domain::product::{Product, ProductDraft, ProductFields};
use crate::{CatalogError, Result};

/// Remote operations backing the catalog.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Fetch every document in the product collection, each decorated with
    /// its store-assigned identifier. Ordering is whatever the store
    /// returned; none is invented here.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Upload a binary image payload to the asset host, returning the
    /// public URL of the stored asset.
    async fn upload_image(&self, imagen: &[u8]) -> Result<String>;

    /// Persist a new product document, returning the assigned identifier.
    async fn create_document(&self, fields: &ProductFields) -> Result<String>;

    /// Two-phase create: upload the image, then persist the document with
    /// the resulting URL threaded into its fields. Not atomic: a persist
    /// failure after a successful upload leaves the asset orphaned on the
    /// host, surfaced as [`CatalogError::Persist`].
    async fn add_product(&self, draft: &ProductDraft) -> Result<String> {
        let url = self.upload_image(&draft.imagen).await?;
        self.create_document(&draft.fields_with_image(url)).await
    }
}

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    id: String,
}

/// HTTP implementation over the configured document store and asset host.
pub struct RemoteCatalogGateway {
    http: Client,
    config: CatalogConfig,
}

impl RemoteCatalogGateway {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    fn products_url(&self) -> String {
        format!(
            "{}/products",
            self.config.document_store_url.trim_end_matches('/')
        )
    }
}

fn asset_url(body: &serde_json::Value) -> Result<String> {
    body.pointer("/data/url")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| CatalogError::Upload("upload response missing data.url".to_string()))
}

#[async_trait]
impl CatalogBackend for RemoteCatalogGateway {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let url = self.products_url();
        debug!(%url, "listing products");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(format!("document store unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Fetch(format!(
                "document store returned {status}"
            )));
        }

        let products = response
            .json::<Vec<Product>>()
            .await
            .map_err(|e| CatalogError::Fetch(format!("invalid product listing: {e}")))?;

        debug!(count = products.len(), "product listing fetched");
        Ok(products)
    }

    async fn upload_image(&self, imagen: &[u8]) -> Result<String> {
        let form = Form::new()
            .text("key", self.config.asset_host_key.clone())
            .part("image", Part::bytes(imagen.to_vec()).file_name("imagen"));

        let response = self
            .http
            .post(&self.config.asset_host_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CatalogError::Upload(format!("asset host unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upload(format!("asset host returned {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CatalogError::Upload(format!("invalid upload response: {e}")))?;

        let url = asset_url(&body)?;
        debug!(%url, "image uploaded");
        Ok(url)
    }

    async fn create_document(&self, fields: &ProductFields) -> Result<String> {
        let url = self.products_url();

        let response = self
            .http
            .post(&url)
            .json(fields)
            .send()
            .await
            .map_err(|e| CatalogError::Persist(format!("document store unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Persist(format!(
                "document store returned {status}"
            )));
        }

        let created: CreatedDocument = response
            .json()
            .await
            .map_err(|e| CatalogError::Persist(format!("invalid create response: {e}")))?;

        info!(id = %created.id, "product document created");
        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_url_trims_trailing_slash() {
        let config = CatalogConfig::new("https://store.example/", "https://assets.example", "k");
        let gateway = RemoteCatalogGateway::new(config).unwrap();
        assert_eq!(gateway.products_url(), "https://store.example/products");
    }

    #[test]
    fn test_asset_url_extraction() {
        let body = serde_json::json!({"data": {"url": "https://assets.example/u.png"}});
        assert_eq!(asset_url(&body).unwrap(), "https://assets.example/u.png");
    }

    #[test]
    fn test_asset_url_missing_is_upload_error() {
        let body = serde_json::json!({"data": {"deleted": false}});
        assert!(matches!(asset_url(&body), Err(CatalogError::Upload(_))));

        let body = serde_json::json!({"status": 200});
        assert!(matches!(asset_url(&body), Err(CatalogError::Upload(_))));
    }
}
