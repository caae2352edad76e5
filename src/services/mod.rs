// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod feature_layer;
pub mod feature_service;
pub mod popup;
pub mod prober;
pub mod search;
pub mod session;
pub mod sources;

pub use catalog::{CatalogError, LayerCatalog};
pub use feature_layer::{FeatureLayer, FeatureLayerStore, LayerDataError};
pub use feature_service::FeatureServiceClient;
pub use popup::{Popup, PopupKind};
pub use prober::{OverlapProber, ProbeError};
pub use search::{search, SearchHit};
pub use session::{ProbeSession, ProbeSessions, SessionError};
pub use sources::{LayerSources, QueryError, SpatialSource};
