// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public map API: layer list, point probe and attribute search.

use crate::error::{AppError, Result};
use crate::models::{LayerGroup, ProbePoint, ProbeReport};
use crate::services::{search, Popup, SearchHit};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_CLIENT_ID_LEN: usize = 64;
const MAX_SEARCH_LEN: usize = 200;

/// Shown when a search finds nothing.
pub const NOTHING_FOUND: &str = "Nekas netika atrasts.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/layers", get(get_layers))
        .route("/api/probe", get(probe_point))
        .route("/api/search", get(search_features))
}

// ─── Layers ──────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LayersResponse {
    pub groups: Vec<LayerGroup>,
}

/// Sidebar layer groups.
async fn get_layers(State(state): State<Arc<AppState>>) -> Json<LayersResponse> {
    Json(LayersResponse {
        groups: state.catalog.groups(),
    })
}

// ─── Probe ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProbeQuery {
    lat: f64,
    lon: f64,
    crs: Option<String>,
    /// Opaque id of the map view; a newer probe from the same client
    /// supersedes an older one still in flight.
    client: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProbeResponse {
    pub report: ProbeReport,
    pub popup: Popup,
}

/// Report which layers overlap a clicked point.
///
/// Returns 204 when a newer probe from the same client overtook this one,
/// 503 when too many clients hold sessions.
async fn probe_point(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProbeQuery>,
) -> Result<Response> {
    if let Some(client) = params.client.as_deref() {
        if client.is_empty() || client.len() > MAX_CLIENT_ID_LEN {
            return Err(AppError::BadRequest(format!(
                "'client' must be 1-{} characters",
                MAX_CLIENT_ID_LEN
            )));
        }
    }

    let point = ProbePoint {
        lat: params.lat,
        lon: params.lon,
        crs: params.crs,
    };
    let layers = state.catalog.enabled();

    let report = match params.client.as_deref() {
        Some(client) => {
            let session = state.sessions.session(client)?;
            match session.run(&state.prober, &point, layers).await? {
                Some(report) => report,
                None => return Ok(StatusCode::NO_CONTENT.into_response()),
            }
        }
        None => state.prober.probe(&point, layers).await?,
    };

    let popup = Popup::from_report(&report);
    Ok(Json(ProbeResponse { report, popup }).into_response())
}

// ─── Search ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Find the first local feature whose attributes contain `q`.
async fn search_features(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchHit>> {
    if params.q.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Search query must not be empty".to_string(),
        ));
    }
    if params.q.chars().count() > MAX_SEARCH_LEN {
        return Err(AppError::BadRequest(format!(
            "Search query longer than {} characters",
            MAX_SEARCH_LEN
        )));
    }

    tracing::debug!(query = %params.q, "Attribute search");

    search(state.catalog.layers(), state.store(), &params.q)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(NOTHING_FOUND.to_string()))
}
