// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Layer catalog loading and sidebar grouping.

use crate::models::{LayerDescriptor, LayerGroup};
use std::fs;
use std::path::Path;

/// Group heading for layers that don't name one.
pub const DEFAULT_GROUP: &str = "Slāņi";

/// The configured layer set, read-only after startup.
#[derive(Debug, Default, Clone)]
pub struct LayerCatalog {
    layers: Vec<LayerDescriptor>,
    enabled: Vec<LayerDescriptor>,
}

impl LayerCatalog {
    pub fn new(layers: Vec<LayerDescriptor>) -> Self {
        let enabled = layers.iter().filter(|l| l.enabled).cloned().collect();
        Self { layers, enabled }
    }

    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON array of layer entries.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let layers: Vec<LayerDescriptor> = serde_json::from_str(json_data)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        for (index, layer) in layers.iter().enumerate() {
            if layer.name.trim().is_empty() {
                return Err(CatalogError::Invalid(format!("entry {} has no name", index)));
            }
            if layer.source.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "layer '{}' has no source",
                    layer.name
                )));
            }
        }

        let catalog = Self::new(layers);
        tracing::info!(
            count = catalog.layers.len(),
            enabled = catalog.enabled.len(),
            "Loaded layer catalog"
        );
        Ok(catalog)
    }

    /// All layers in configuration order.
    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    /// Layers that take part in probing, in configuration order.
    pub fn enabled(&self) -> &[LayerDescriptor] {
        &self.enabled
    }

    /// Group layers for the sidebar.
    ///
    /// Groups appear in order of their first layer; layers keep
    /// configuration order inside a group.
    pub fn groups(&self) -> Vec<LayerGroup> {
        let mut groups: Vec<LayerGroup> = Vec::new();

        for layer in &self.layers {
            let group_name = layer.group.as_deref().unwrap_or(DEFAULT_GROUP);
            match groups.iter_mut().find(|g| g.name == group_name) {
                Some(group) => group.layers.push(layer.summary()),
                None => groups.push(LayerGroup {
                    name: group_name.to_string(),
                    layers: vec![layer.summary()],
                }),
            }
        }

        groups
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    IoError(String),

    #[error("Failed to parse catalog: {0}")]
    ParseError(String),

    #[error("Invalid catalog entry: {0}")]
    Invalid(String),
}
