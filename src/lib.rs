#![recursion_limit = "512"]

pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod metadata;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{CatalogError, CatalogResult};
pub use logic::{ListingQuery, SongCatalog, UpdatePlan};
pub use metadata::{HttpMetadataClient, MetadataClient};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, SongStore};

use axum::serve;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppConfig;

/// Connect the configured store and serve the API until the listener fails.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let metadata = HttpMetadataClient::new(&config.metadata)?;
    info!("Metadata service at {}", config.metadata.base_url);

    if config.database.in_memory {
        info!("Using in-memory song store");
        let catalog = Arc::new(SongCatalog::new(MemoryStore::new(), metadata));
        return serve_app(routes::create_router().with_state(catalog), &config).await;
    }

    info!("Connecting to PostgreSQL...");
    let store = PostgresStore::new(&config.database_url(), config.max_connections()).await?;
    store.migrate().await?;
    info!("Database connection established");

    let catalog = Arc::new(SongCatalog::new(store, metadata));
    serve_app(routes::create_router().with_state(catalog), &config).await
}

async fn serve_app(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("Song catalog server running on http://{}", bind_address);
    info!(
        "API documentation available at http://{}/swagger",
        bind_address
    );

    serve(listener, app).await?;

    Ok(())
}
