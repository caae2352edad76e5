// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Layer configuration model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Fill color used when a layer entry does not set one.
pub const DEFAULT_COLOR: &str = "#3388ff";

/// Geometry family a layer is drawn as in the sidebar legend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LayerKind {
    #[default]
    Polygon,
    Point,
}

/// A configured spatial layer (e.g., "DAP mikroliegumi un buferzonas").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// Display label; duplicates are allowed.
    pub name: String,
    /// Remote feature-service URL or local GeoJSON path.
    pub source: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Stable identifier for the frontend (falls back to `name`).
    #[serde(default)]
    pub key: Option<String>,
    /// Sidebar group heading.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub kind: LayerKind,
}

fn default_enabled() -> bool {
    true
}

impl LayerDescriptor {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            enabled: true,
            key: None,
            group: None,
            color: None,
            kind: LayerKind::Polygon,
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// True if the source names a remote feature service.
    pub fn is_remote(&self) -> bool {
        self.source.starts_with("http://") || self.source.starts_with("https://")
    }

    pub fn summary(&self) -> LayerSummary {
        LayerSummary {
            key: self.key().to_string(),
            title: self.name.clone(),
            color: self
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            kind: self.kind,
            enabled: self.enabled,
        }
    }
}

/// Sidebar entry for one layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LayerSummary {
    pub key: String,
    pub title: String,
    pub color: String,
    pub kind: LayerKind,
    pub enabled: bool,
}

/// Sidebar group of layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LayerGroup {
    pub name: String,
    pub layers: Vec<LayerSummary>,
}
