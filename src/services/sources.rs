// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spatial query backends behind a single trait.

use crate::models::{LayerDescriptor, ProbePoint};
use crate::services::feature_layer::FeatureLayerStore;
use crate::services::feature_service::FeatureServiceClient;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A backend able to answer "does this point intersect any feature of the layer?".
pub trait SpatialSource: Send + Sync {
    fn intersects(
        &self,
        layer: &LayerDescriptor,
        point: &ProbePoint,
    ) -> impl Future<Output = Result<bool, QueryError>> + Send;
}

/// Errors from a single layer query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("undecodable response: {0}")]
    Decode(String),

    #[error("layer data not available: {0}")]
    UnknownSource(String),
}

impl QueryError {
    /// Whether retrying the same query may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Transport(_) => true,
            QueryError::Service { code, .. } => *code >= 500,
            _ => false,
        }
    }
}

/// Dispatches each layer to the remote client or the local store.
#[derive(Clone, Default)]
pub struct LayerSources {
    remote: FeatureServiceClient,
    local: Arc<FeatureLayerStore>,
}

impl LayerSources {
    pub fn new(remote: FeatureServiceClient, local: Arc<FeatureLayerStore>) -> Self {
        Self { remote, local }
    }

    pub fn local(&self) -> &FeatureLayerStore {
        &self.local
    }
}

impl SpatialSource for LayerSources {
    async fn intersects(
        &self,
        layer: &LayerDescriptor,
        point: &ProbePoint,
    ) -> Result<bool, QueryError> {
        if layer.is_remote() {
            let count = self.remote.count_intersecting(&layer.source, point).await?;
            return Ok(count > 0);
        }

        let data = self
            .local
            .get(&layer.source)
            .ok_or_else(|| QueryError::UnknownSource(layer.source.clone()))?;
        Ok(data.intersects(&point.to_geo()))
    }
}
