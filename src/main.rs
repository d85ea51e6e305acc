//! Tienda Catalog Core - demo entry point
//!
//! Owns the process lifecycle: loads configuration, builds the gateway and
//! the single catalog store, performs the initial fetch and logs the
//! resulting snapshot. The presentation layer consumes the same handles.

use std::sync::Arc;

use anyhow::Result;
use tienda_catalogo::{CatalogConfig, CatalogState, CatalogStore, RemoteCatalogGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CatalogConfig::from_env()?;
    let gateway = Arc::new(RemoteCatalogGateway::new(config)?);
    let store = Arc::new(CatalogStore::new(gateway));

    tracing::info!("🚀 Tienda catalog core starting");
    store.refresh().await;

    match store.state() {
        CatalogState::Ready(products) => {
            for product in &products {
                tracing::info!(
                    id = %product.id,
                    nombre = %product.fields.nombre,
                    precio_final = %product.fields.precio_final(),
                    disponibilidad = %product.fields.disponibilidad(),
                    "producto"
                );
            }
        }
        CatalogState::Failed(message) => tracing::warn!(%message, "catalog unavailable"),
        CatalogState::Loading => {}
    }

    Ok(())
}
