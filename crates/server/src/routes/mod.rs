//! HTTP surface of the search proxy.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/search?q=` | Products and matching categories for a term |
//! | `GET`  | `/warm` | Prime the category cache |
//! | `GET`  | `/` | Liveness |
//! | `OPTIONS` | any | CORS preflight |
//!
//! Every response is JSON and passes through the CORS middleware.

pub mod cors;
pub mod search;

use std::sync::Arc;

use axum::{Json, Router, extract::State, middleware, routing::get};
use livesearch_core::CorsPolicy;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::ProxyError;
use crate::handler::ProxyService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProxyService>,
    pub cors: CorsPolicy,
    pub service_name: Arc<str>,
}

/// Build the proxy router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/search", get(search::search))
        .route("/warm", get(search::warm))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors::apply_cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    service: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse { ok: true, service: state.service_name.to_string() })
}

async fn not_found() -> ProxyError {
    ProxyError::NotFound
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_utils::{FakeCatalog, ManualClock, category, product};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use livesearch_core::AppConfig;
    use serde_json::Value;
    use tower::ServiceExt;

    pub(crate) fn app(catalog: Arc<FakeCatalog>, config: &AppConfig) -> Router {
        let service = ProxyService::with_clock(catalog, config, Arc::new(ManualClock::default()));
        router(AppState {
            service: Arc::new(service),
            cors: config.cors_policy(),
            service_name: Arc::from(config.service_name.as_str()),
        })
    }

    pub(crate) fn drill_catalog() -> Arc<FakeCatalog> {
        Arc::new(FakeCatalog::with_data(
            vec![product(1, "Cordless Drill"), product(2, "Drill Press")],
            vec![category(10, "Cordless Drills"), category(11, "Saws")],
        ))
    }

    pub(crate) async fn send(app: Router, method: &str, uri: &str, origin: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(origin) = origin {
            builder = builder.header("origin", origin);
        }
        app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    pub(crate) async fn json_body(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let resp = send(app(drill_catalog(), &AppConfig::default()), "GET", "/", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["service"], "live-search-proxy");
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let resp = send(app(drill_catalog(), &AppConfig::default()), "GET", "/nope", None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert_eq!(json_body(resp).await["error"], "Not found");
    }
}
