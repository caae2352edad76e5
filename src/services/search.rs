// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attribute search over local layer features.

use crate::models::LayerDescriptor;
use crate::services::feature_layer::FeatureLayerStore;
use geojson::JsonObject;
use serde::Serialize;
use serde_json::Value;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// First feature whose attributes contain the query.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SearchHit {
    pub layer_key: String,
    pub layer_name: String,
    pub feature_index: usize,
    pub properties: JsonObject,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub bounds: Option<[f64; 4]>,
}

/// Find the first feature with a property value containing `query`.
///
/// Matching is a case-insensitive substring test. Layers are scanned in
/// catalog order, features in file order. Remote layers have no local
/// attributes and are skipped. An empty query finds nothing.
pub fn search(
    layers: &[LayerDescriptor],
    store: &FeatureLayerStore,
    query: &str,
) -> Option<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for layer in layers {
        let Some(data) = store.get(&layer.source) else {
            continue;
        };

        let found = data
            .features()
            .iter()
            .enumerate()
            .find(|(_, f)| properties_match(&f.properties, &needle));

        if let Some((index, feature)) = found {
            tracing::debug!(layer = %layer.name, feature = index, "Search hit");
            return Some(SearchHit {
                layer_key: layer.key().to_string(),
                layer_name: layer.name.clone(),
                feature_index: index,
                properties: feature.properties.clone(),
                bounds: feature.geometry.bounds().map(|r| {
                    [r.min().x, r.min().y, r.max().x, r.max().y]
                }),
            });
        }
    }

    None
}

fn properties_match(properties: &JsonObject, needle: &str) -> bool {
    properties
        .values()
        .filter_map(searchable_text)
        .any(|text| text.to_lowercase().contains(needle))
}

/// Text of a property value; `None` for blank values (null, false, 0, "").
fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(display_text(other)),
    }
}

/// Render a value the way the map page shows it: integral floats without
/// a fraction, arrays as comma-joined items with nulls left empty.
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
