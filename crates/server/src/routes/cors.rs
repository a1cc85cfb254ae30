//! CORS middleware.
//!
//! Resolves the request's `Origin` against the configured policy once, stores
//! the decision in the request extensions for handlers that must refuse
//! blocked callers, answers preflights directly and stamps the CORS and
//! caching headers on every other response.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use livesearch_core::OriginDecision;

use super::AppState;

const ALLOW_METHODS: &str = "GET,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE: &str = "86400";

pub async fn apply_cors(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).and_then(|v| v.to_str().ok());
    let decision = state.cors.decide(origin);

    if decision.is_blocked() {
        tracing::debug!(origin = origin.unwrap_or(""), path = %request.uri().path(), "origin not allowed");
    }

    if request.method() == Method::OPTIONS {
        return preflight(&decision);
    }

    request.extensions_mut().insert(decision.clone());
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    allow_headers(headers, &decision);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn preflight(decision: &OriginDecision) -> Response {
    let mut response = (StatusCode::NO_CONTENT, Body::empty()).into_response();
    let headers = response.headers_mut();
    allow_headers(headers, decision);
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(PREFLIGHT_MAX_AGE));
    response
}

fn allow_headers(headers: &mut HeaderMap, decision: &OriginDecision) {
    let origin = HeaderValue::from_str(decision.header_value()).unwrap_or_else(|_| HeaderValue::from_static("null"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
}
