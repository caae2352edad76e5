// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for remote feature-service layers (ArcGIS REST style).
//!
//! Only feature counts are requested: the prober needs one boolean per
//! layer, so geometry and attributes are never transferred.

use crate::models::ProbePoint;
use crate::services::sources::QueryError;
use serde::Deserialize;

/// Remote feature-service client.
#[derive(Clone, Default)]
pub struct FeatureServiceClient {
    http: reqwest::Client,
}

/// Body of a count-only query response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountResponse {
    Count { count: u64 },
    Error { error: ServiceErrorBody },
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl FeatureServiceClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Count features of the layer at `layer_url` that intersect `point`.
    pub async fn count_intersecting(
        &self,
        layer_url: &str,
        point: &ProbePoint,
    ) -> Result<u64, QueryError> {
        let url = format!("{}/query", layer_url.trim_end_matches('/'));
        let geometry = format!("{},{}", point.lon, point.lat);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("geometry", geometry.as_str()),
                ("geometryType", "esriGeometryPoint"),
                ("inSR", "4326"),
                ("spatialRel", "esriSpatialRelIntersects"),
                ("returnGeometry", "false"),
                ("returnCountOnly", "true"),
                ("f", "json"),
            ])
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!(url = %url, "Feature service rate limit hit (429)");
                return Err(QueryError::Transport("rate limited".to_string()));
            }

            return Err(QueryError::Service {
                code: i64::from(status.as_u16()),
                message: body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;
        parse_count(&body)
    }
}

/// Decode a count-only response body.
fn parse_count(body: &str) -> Result<u64, QueryError> {
    match serde_json::from_str::<CountResponse>(body) {
        Ok(CountResponse::Count { count }) => Ok(count),
        Ok(CountResponse::Error { error }) => Err(QueryError::Service {
            code: error.code,
            message: error.message,
        }),
        Err(e) => Err(QueryError::Decode(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(r#"{"count": 3}"#).unwrap(), 3);
        assert_eq!(parse_count(r#"{"count": 0}"#).unwrap(), 0);
    }

    #[test]
    fn test_parse_service_error() {
        let err = parse_count(r#"{"error": {"code": 400, "message": "Invalid query"}}"#)
            .unwrap_err();
        match err {
            QueryError::Service { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "Invalid query");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_count("<html>gateway</html>"),
            Err(QueryError::Decode(_))
        ));
        assert!(matches!(
            parse_count(r#"{"features": []}"#),
            Err(QueryError::Decode(_))
        ));
    }
}
