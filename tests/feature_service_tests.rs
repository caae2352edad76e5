// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote feature-service probing against a loopback stand-in server.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use layer_overlap::models::{LayerDescriptor, ProbeOutcome, ProbePoint};
use layer_overlap::services::{
    FeatureLayerStore, FeatureServiceClient, LayerSources, OverlapProber, QueryError,
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Answers `/{layer}/query` the way a count-only feature service would.
async fn query_layer(
    Path(layer): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    calls: Arc<AtomicU32>,
) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);

    let count_only = params.get("returnCountOnly").map(String::as_str) == Some("true");
    let intersects =
        params.get("spatialRel").map(String::as_str) == Some("esriSpatialRelIntersects");
    if !count_only || !intersects || params.get("geometry").is_none() {
        return (StatusCode::BAD_REQUEST, "missing query parameters").into_response();
    }

    match layer.as_str() {
        "radar_blue" => Json(json!({"count": 2})).into_response(),
        "radar_yellow" => Json(json!({"count": 0})).into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        "rejecting" => Json(json!({"error": {"code": 400, "message": "Invalid geometry"}}))
            .into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"count": 1})).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "no such layer").into_response(),
    }
}

async fn spawn_feature_service() -> (SocketAddr, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let handler_calls = calls.clone();
    let app = Router::new().route(
        "/{layer}/query",
        get(
            move |path: Path<String>, query: Query<HashMap<String, String>>| {
                query_layer(path, query, handler_calls.clone())
            },
        ),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, calls)
}

fn remote(addr: SocketAddr, name: &str, path: &str) -> LayerDescriptor {
    LayerDescriptor::new(name, format!("http://{}/{}", addr, path))
}

/// Loopback client that ignores proxy settings from the environment.
fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn prober(timeout: Duration, retries: u32) -> OverlapProber<LayerSources> {
    let sources = LayerSources::new(
        FeatureServiceClient::new(http_client()),
        Arc::new(FeatureLayerStore::new()),
    );
    OverlapProber::new(sources, timeout, retries)
}

#[tokio::test]
async fn test_count_query() {
    let (addr, _) = spawn_feature_service().await;
    let client = FeatureServiceClient::new(http_client());
    let point = ProbePoint::new(56.95, 24.1);

    let count = client
        .count_intersecting(&format!("http://{}/radar_blue/", addr), &point)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let err = client
        .count_intersecting(&format!("http://{}/rejecting", addr), &point)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Service { code: 400, .. }));
}

#[tokio::test]
async fn test_remote_layers_probe() {
    let (addr, _) = spawn_feature_service().await;
    let layers = vec![
        remote(addr, "AM Radars BLUE", "radar_blue"),
        remote(addr, "AM Radars YELLOW", "radar_yellow"),
        remote(addr, "LVĢMC Radars ORANGE", "rejecting"),
        remote(addr, "VMD meži", "slow"),
    ];

    let report = prober(Duration::from_millis(500), 0)
        .probe(&ProbePoint::new(56.95, 24.1), &layers)
        .await
        .unwrap();

    assert_eq!(report.len(), 4);
    assert_eq!(report.entries[0].outcome, ProbeOutcome::Matched);
    assert_eq!(report.entries[1].outcome, ProbeOutcome::NoMatch);
    assert_eq!(
        report.entries[2].outcome,
        ProbeOutcome::Failed {
            reason: "service error 400: Invalid geometry".to_string()
        }
    );
    match &report.entries[3].outcome {
        ProbeOutcome::Failed { reason } => assert!(reason.starts_with("timed out")),
        other => panic!("slow layer should time out, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_errors_retried_then_failed() {
    let (addr, calls) = spawn_feature_service().await;
    let layers = vec![remote(addr, "Broken", "broken")];

    let report = prober(Duration::from_secs(5), 2)
        .probe(&ProbePoint::new(56.95, 24.1), &layers)
        .await
        .unwrap();

    assert!(report.all_failed());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unreachable_service_fails_layer() {
    let (live, _) = spawn_feature_service().await;

    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let layers = vec![
        remote(addr, "Offline", "radar_blue"),
        remote(live, "Online", "radar_blue"),
    ];

    let report = prober(Duration::from_secs(5), 0)
        .probe(&ProbePoint::new(56.95, 24.1), &layers)
        .await
        .unwrap();

    assert!(report.entries[0].outcome.is_failed());
    assert_eq!(report.entries[1].outcome, ProbeOutcome::Matched);
}
