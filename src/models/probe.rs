// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Probe point, per-layer outcome and the aggregated report.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// CRS labels accepted as plain WGS84 longitude/latitude.
const WGS84_ALIASES: &[&str] = &["EPSG:4326", "4326", "CRS84", "OGC:CRS84"];

/// A single geographic coordinate supplied with a probe request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProbePoint {
    pub lat: f64,
    pub lon: f64,
    /// Coordinate reference label, WGS84 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
}

impl ProbePoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            crs: None,
        }
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    /// Check that the coordinates are finite, in range and in WGS84.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err("coordinates must be finite numbers".to_string());
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} outside [-90, 90]", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("longitude {} outside [-180, 180]", self.lon));
        }
        if let Some(crs) = &self.crs {
            if !WGS84_ALIASES
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(crs.trim()))
            {
                return Err(format!("unsupported coordinate reference system: {}", crs));
            }
        }
        Ok(())
    }

    /// The point as a `geo` point (x = longitude, y = latitude).
    pub fn to_geo(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

/// Result of probing one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ProbeOutcome {
    /// The point intersects at least one feature.
    Matched,
    /// The query succeeded and found nothing.
    NoMatch,
    /// The query could not be completed.
    Failed { reason: String },
}

impl ProbeOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, ProbeOutcome::Matched)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProbeOutcome::Failed { .. })
    }
}

/// One report line: the layer's display name and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProbeEntry {
    pub layer: String,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

/// Per-layer outcomes in configuration order, one entry per probed layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProbeReport {
    pub entries: Vec<ProbeEntry>,
}

impl ProbeReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of matched layers, in configuration order.
    pub fn matched(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_matched())
            .map(|e| e.layer.as_str())
    }

    /// Names of layers whose query failed, in configuration order.
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_failed())
            .map(|e| e.layer.as_str())
    }

    /// True when there is at least one entry and none of them resolved.
    pub fn all_failed(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|e| e.outcome.is_failed())
    }
}
