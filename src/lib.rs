// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Layer Overlap: which map layers cover a clicked point?
//!
//! This crate provides the backend API for a layer map: the layer catalog
//! for the sidebar, attribute search over local layers, and a point probe
//! that queries every layer concurrently and reports which ones overlap.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{FeatureLayerStore, LayerCatalog, LayerSources, OverlapProber, ProbeSessions};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub catalog: LayerCatalog,
    pub prober: OverlapProber<LayerSources>,
    pub sessions: ProbeSessions,
}

impl AppState {
    /// Wire the prober to the local store and a remote client.
    pub fn new(
        config: Config,
        catalog: LayerCatalog,
        store: FeatureLayerStore,
        http: reqwest::Client,
    ) -> Self {
        let sources = LayerSources::new(
            services::FeatureServiceClient::new(http),
            Arc::new(store),
        );
        let prober = OverlapProber::new(sources, config.query_timeout, config.query_retries);

        Self {
            config,
            catalog,
            prober,
            sessions: ProbeSessions::new(),
        }
    }

    /// Local layer data, shared with the prober.
    pub fn store(&self) -> &FeatureLayerStore {
        self.prober.source().local()
    }
}
