pub mod chat;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use devshelf_catalog::router::parse_selection;
use devshelf_common::{DevShelfError, ResourceParams};
use tracing::debug;

use crate::AppState;

pub async fn api_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "uptime": state.started_at.elapsed().as_secs(),
    }))
}

/// Always 200: provider failures are absorbed by the built-in catalog.
/// Taken as raw pairs so a repeated parameter can't reject the request.
pub async fn api_resources(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let params = ResourceParams::from_pairs(pairs);
    let query = params.to_query();
    let selection = parse_selection(params.provider.as_deref());
    debug!(?query, provider = ?selection, "Resource search");

    Json(state.aggregator.search(&query, selection).await)
}

pub async fn api_providers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let providers: Vec<serde_json::Value> = state
        .aggregator
        .availability()
        .into_iter()
        .map(|(kind, available)| {
            serde_json::json!({ "name": kind.as_str(), "available": available })
        })
        .collect();
    Json(serde_json::json!({ "providers": providers }))
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Errors raised by this service itself, as opposed to upstream failures.
pub(crate) fn devshelf_error_response(err: DevShelfError) -> Response {
    let (status, message) = match err {
        DevShelfError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        DevShelfError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
    };
    error_response(status, message)
}
