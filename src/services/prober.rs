// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spatial overlap prober: which configured layers contain a point?
//!
//! Every enabled layer is queried concurrently. Each query is bounded by
//! its own timeout and fails independently; the probe waits until all of
//! them have settled and reports outcomes in configuration order.

use crate::models::{LayerDescriptor, ProbeEntry, ProbeOutcome, ProbePoint, ProbeReport};
use crate::services::sources::{QueryError, SpatialSource};
use futures_util::future::join_all;
use std::time::Duration;

/// Default per-layer time bound.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(8);

/// Delay before the first retry; grows linearly with the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Fans a point query out over all layers and aggregates the outcomes.
#[derive(Clone)]
pub struct OverlapProber<S> {
    source: S,
    timeout: Duration,
    retries: u32,
}

impl<S: SpatialSource> OverlapProber<S> {
    pub fn new(source: S, timeout: Duration, retries: u32) -> Self {
        Self {
            source,
            timeout,
            retries,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe `point` against every enabled layer.
    ///
    /// Fails only for an invalid point, before any query is issued.
    /// Otherwise the report has exactly one entry per enabled layer.
    pub async fn probe(
        &self,
        point: &ProbePoint,
        layers: &[LayerDescriptor],
    ) -> Result<ProbeReport, ProbeError> {
        point.validate().map_err(ProbeError::InvalidPoint)?;

        let probed: Vec<&LayerDescriptor> = layers.iter().filter(|l| l.enabled).collect();
        let outcomes = join_all(probed.iter().map(|layer| self.probe_layer(layer, point))).await;

        let entries: Vec<ProbeEntry> = probed
            .into_iter()
            .zip(outcomes)
            .map(|(layer, outcome)| ProbeEntry {
                layer: layer.name.clone(),
                outcome,
            })
            .collect();
        let report = ProbeReport { entries };

        tracing::debug!(
            lat = point.lat,
            lon = point.lon,
            layers = report.len(),
            matched = report.matched().count(),
            failed = report.failed().count(),
            "Probe settled"
        );
        Ok(report)
    }

    /// Query a single layer; never fails, errors become `Failed`.
    async fn probe_layer(&self, layer: &LayerDescriptor, point: &ProbePoint) -> ProbeOutcome {
        let result = tokio::time::timeout(self.timeout, self.query_with_retry(layer, point))
            .await
            .unwrap_or(Err(QueryError::Timeout(self.timeout)));

        match result {
            Ok(true) => ProbeOutcome::Matched,
            Ok(false) => ProbeOutcome::NoMatch,
            Err(e) => {
                tracing::warn!(layer = %layer.name, error = %e, "Layer query failed");
                ProbeOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn query_with_retry(
        &self,
        layer: &LayerDescriptor,
        point: &ProbePoint,
    ) -> Result<bool, QueryError> {
        let mut attempt = 0;
        loop {
            match self.source.intersects(layer, point).await {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    tracing::debug!(
                        layer = %layer.name,
                        attempt,
                        error = %e,
                        "Retrying layer query"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                result => return result,
            }
        }
    }
}

/// Errors that reject a probe as a whole.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid point: {0}")]
    InvalidPoint(String),
}
