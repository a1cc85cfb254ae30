//! `/search` and `/warm` handlers.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use livesearch_core::{OriginDecision, SearchResponse};
use serde::Serialize;

use super::AppState;
use crate::error::ProxyError;

/// Raw query pairs; repeated keys are kept so the first `q` wins.
pub type QueryPairs = Vec<(String, String)>;

/// First `q` value, or empty when absent.
pub fn first_q(pairs: &[(String, String)]) -> &str {
    pairs.iter().find(|(key, _)| key == "q").map_or("", |(_, value)| value.as_str())
}

#[derive(Debug, Serialize)]
pub struct WarmResponse {
    pub ok: bool,
    pub warmed: bool,
}

pub async fn search(
    State(state): State<AppState>, Extension(decision): Extension<OriginDecision>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Json<SearchResponse>, ProxyError> {
    if decision.is_blocked() {
        return Err(ProxyError::CorsBlocked);
    }
    let Query(pairs) = query.map_err(|e| ProxyError::BadRequest(e.body_text()))?;
    Ok(Json(state.service.search(first_q(&pairs)).await?))
}

pub async fn warm(State(state): State<AppState>) -> Result<Json<WarmResponse>, ProxyError> {
    state.service.warm().await?;
    Ok(Json(WarmResponse { ok: true, warmed: true }))
}
