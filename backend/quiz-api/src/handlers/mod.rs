use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::config::DataSourceKind;
use crate::error::ApiError;
use crate::metrics;
use crate::services::{questions_cache::CacheStatus, AppState};

pub mod answers;
pub mod questions;
pub mod score_descriptions;

/// Liveness report. Never calls upstream.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cache = match state.questions_cache.status() {
        CacheStatus::Empty => json!({ "status": "empty" }),
        CacheStatus::Refreshing => json!({ "status": "refreshing" }),
        CacheStatus::Fresh { age_secs } => json!({ "status": "fresh", "age_secs": age_secs }),
        CacheStatus::Stale { age_secs } => json!({ "status": "stale", "age_secs": age_secs }),
    };
    let data_source = match state.config.data_source {
        DataSourceKind::Sheets => "sheets",
        DataSourceKind::Memory => "memory",
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "quiz-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": {
                "questions_cache": cache,
                "data_source": { "kind": data_source }
            }
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// CORS preflight probe
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
