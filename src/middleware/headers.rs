// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response header middleware.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Headers set on every response.
const COMMON_HEADERS: &[(&str, &str)] = &[
    ("X-Content-Type-Options", "nosniff"),
    // The map page embeds its own views, so framing stays same-origin.
    ("X-Frame-Options", "SAMEORIGIN"),
    ("Referrer-Policy", "strict-origin-when-cross-origin"),
];

/// Add common headers; API answers depend on live layer data and are never cached.
pub async fn add_response_headers(req: Request, next: Next) -> Response {
    let is_api = req.uri().path().starts_with("/api/");
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in COMMON_HEADERS {
        headers.insert(*name, HeaderValue::from_static(*value));
    }
    if is_api {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}
