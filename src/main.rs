// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Layer Overlap API Server
//!
//! Serves the layer catalog, attribute search and point probes for the
//! peat-extraction and protected-area map.

use layer_overlap::{
    config::Config,
    services::{FeatureLayerStore, LayerCatalog},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        timeout_ms = config.query_timeout.as_millis() as u64,
        retries = config.query_retries,
        "Starting Layer Overlap API"
    );

    // Load layer catalog
    tracing::info!(path = %config.layers_path.display(), "Loading layer catalog");
    let catalog = LayerCatalog::load_from_file(&config.layers_path)?;

    // Load local layer data; failures are logged per layer
    let store = FeatureLayerStore::load(catalog.layers(), &config.data_dir);
    tracing::info!(
        local = store.len(),
        remote = catalog.layers().iter().filter(|l| l.is_remote()).count(),
        "Layer sources ready"
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("layer-overlap/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), catalog, store, http));

    // Build router
    let app = layer_overlap::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("layer_overlap=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
