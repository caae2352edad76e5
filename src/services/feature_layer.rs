// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local GeoJSON layers held in memory for point queries and search.

use crate::models::LayerDescriptor;
use geo::{
    BoundingRect, Intersects, LineString, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Rect,
};
use geojson::{GeoJson, JsonObject};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Geometry of a single feature.
#[derive(Debug, Clone)]
pub enum FeatureGeometry {
    Point(Point<f64>),
    MultiPoint(MultiPoint<f64>),
    LineString(LineString<f64>),
    MultiLineString(MultiLineString<f64>),
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl FeatureGeometry {
    /// Convert a GeoJSON geometry value; `None` for unsupported types.
    fn from_value(value: geojson::Value) -> Result<Option<Self>, LayerDataError> {
        use geojson::Value;

        let convert_err = |e: geojson::Error| LayerDataError::ParseError(e.to_string());
        let geometry = match value {
            Value::Point(_) => Self::Point(value.try_into().map_err(convert_err)?),
            Value::MultiPoint(_) => Self::MultiPoint(value.try_into().map_err(convert_err)?),
            Value::LineString(_) => Self::LineString(value.try_into().map_err(convert_err)?),
            Value::MultiLineString(_) => {
                Self::MultiLineString(value.try_into().map_err(convert_err)?)
            }
            Value::Polygon(_) => Self::Polygon(value.try_into().map_err(convert_err)?),
            Value::MultiPolygon(_) => Self::MultiPolygon(value.try_into().map_err(convert_err)?),
            Value::GeometryCollection(_) => return Ok(None),
        };
        Ok(Some(geometry))
    }

    /// Check if a point intersects this geometry (boundary included).
    pub fn intersects(&self, point: &Point<f64>) -> bool {
        match self {
            FeatureGeometry::Point(p) => point.intersects(p),
            FeatureGeometry::MultiPoint(mp) => point.intersects(mp),
            FeatureGeometry::LineString(ls) => point.intersects(ls),
            FeatureGeometry::MultiLineString(mls) => point.intersects(mls),
            FeatureGeometry::Polygon(p) => point.intersects(p),
            FeatureGeometry::MultiPolygon(mp) => point.intersects(mp),
        }
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        match self {
            FeatureGeometry::Point(p) => Some(p.bounding_rect()),
            FeatureGeometry::MultiPoint(mp) => mp.bounding_rect(),
            FeatureGeometry::LineString(ls) => ls.bounding_rect(),
            FeatureGeometry::MultiLineString(mls) => mls.bounding_rect(),
            FeatureGeometry::Polygon(p) => p.bounding_rect(),
            FeatureGeometry::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }
}

/// A feature with its attribute table row.
#[derive(Debug, Clone)]
pub struct LayerFeature {
    pub properties: JsonObject,
    pub geometry: FeatureGeometry,
}

/// All features of one local layer, in file order.
#[derive(Debug, Default, Clone)]
pub struct FeatureLayer {
    features: Vec<LayerFeature>,
}

impl FeatureLayer {
    /// Load a layer from a GeoJSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LayerDataError> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| LayerDataError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a layer from a GeoJSON FeatureCollection string.
    pub fn load_from_json(json_data: &str) -> Result<Self, LayerDataError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| LayerDataError::ParseError(e.to_string()))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(LayerDataError::NotFeatureCollection);
        };

        let mut features = Vec::with_capacity(collection.features.len());
        let mut skipped = 0usize;

        for feature in collection.features {
            let Some(geom) = feature.geometry else {
                skipped += 1;
                continue;
            };
            match FeatureGeometry::from_value(geom.value)? {
                Some(geometry) => features.push(LayerFeature {
                    properties: feature.properties.unwrap_or_default(),
                    geometry,
                }),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Skipped features without supported geometry");
        }
        Ok(Self { features })
    }

    pub fn features(&self) -> &[LayerFeature] {
        &self.features
    }

    /// True if any feature intersects the point.
    pub fn intersects(&self, point: &Point<f64>) -> bool {
        self.features.iter().any(|f| f.geometry.intersects(point))
    }
}

/// Local layers keyed by their catalog `source`.
#[derive(Debug, Default, Clone)]
pub struct FeatureLayerStore {
    layers: HashMap<String, Arc<FeatureLayer>>,
}

impl FeatureLayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every local layer of the catalog, resolving paths against `data_dir`.
    ///
    /// A layer that fails to load is logged and left out, so probing it
    /// reports a failure instead of aborting startup.
    pub fn load(layers: &[LayerDescriptor], data_dir: &Path) -> Self {
        let mut store = Self::new();

        for layer in layers.iter().filter(|l| !l.is_remote()) {
            if store.layers.contains_key(&layer.source) {
                continue;
            }
            let path = data_dir.join(&layer.source);
            match FeatureLayer::load_from_file(&path) {
                Ok(data) => {
                    tracing::info!(
                        layer = %layer.name,
                        features = data.features().len(),
                        "Loaded local layer"
                    );
                    store.insert(layer.source.clone(), data);
                }
                Err(e) => {
                    tracing::error!(
                        layer = %layer.name,
                        path = %path.display(),
                        error = %e,
                        "Failed to load local layer"
                    );
                }
            }
        }

        store
    }

    pub fn insert(&mut self, source: impl Into<String>, layer: FeatureLayer) {
        self.layers.insert(source.into(), Arc::new(layer));
    }

    pub fn get(&self, source: &str) -> Option<Arc<FeatureLayer>> {
        self.layers.get(source).cloned()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Errors from loading layer data.
#[derive(Debug, thiserror::Error)]
pub enum LayerDataError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}
