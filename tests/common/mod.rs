// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use layer_overlap::config::Config;
use layer_overlap::models::{LayerDescriptor, ProbePoint};
use layer_overlap::routes::create_router;
use layer_overlap::services::{FeatureLayerStore, LayerCatalog, QueryError, SpatialSource};
use layer_overlap::AppState;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const FIXTURES: &str = "tests/fixtures";

/// Inside both the ERAF and the reclaimed polygon.
#[allow(dead_code)]
pub const LAT_BOTH: f64 = 56.87;
#[allow(dead_code)]
pub const LON_BOTH: f64 = 24.15;

/// Load the fixture catalog (one of its layers has no data file).
#[allow(dead_code)]
pub fn test_catalog() -> LayerCatalog {
    LayerCatalog::load_from_file(Path::new(FIXTURES).join("layers.json"))
        .expect("Failed to load fixture catalog - is tests/fixtures committed?")
}

/// Create a test app over the fixture layers.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config {
        data_dir: FIXTURES.into(),
        query_timeout: Duration::from_secs(2),
        query_retries: 0,
        ..Config::default()
    };
    let catalog = test_catalog();
    let store = FeatureLayerStore::load(catalog.layers(), &config.data_dir);

    let state = Arc::new(AppState::new(config, catalog, store, reqwest::Client::new()));
    (create_router(state.clone()), state)
}

/// Scripted answer for one layer.
#[derive(Clone)]
#[allow(dead_code)]
pub struct Scripted {
    pub delay: Duration,
    pub result: Result<bool, QueryError>,
}

/// Source that answers each layer by name from a script.
#[derive(Default)]
#[allow(dead_code)]
pub struct ScriptedSource {
    script: HashMap<String, Scripted>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn answer(mut self, layer: &str, delay_ms: u64, result: Result<bool, QueryError>) -> Self {
        self.script.insert(
            layer.to_string(),
            Scripted {
                delay: Duration::from_millis(delay_ms),
                result,
            },
        );
        self
    }
}

impl SpatialSource for ScriptedSource {
    async fn intersects(
        &self,
        layer: &LayerDescriptor,
        _point: &ProbePoint,
    ) -> Result<bool, QueryError> {
        let scripted = self.script.get(&layer.name).cloned().unwrap_or(Scripted {
            delay: Duration::ZERO,
            result: Ok(false),
        });
        tokio::time::sleep(scripted.delay).await;
        scripted.result
    }
}

/// Layers named L1..Ln with local-looking sources.
#[allow(dead_code)]
pub fn numbered_layers(n: usize) -> Vec<LayerDescriptor> {
    (1..=n)
        .map(|i| LayerDescriptor::new(format!("L{i}"), format!("l{i}.geojson")))
        .collect()
}
