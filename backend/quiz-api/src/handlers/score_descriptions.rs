use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::ScoreDescription;
use crate::services::AppState;

#[derive(Debug, Serialize)]
pub struct ScoreDescriptionsResponse {
    pub success: bool,
    pub descriptions: Vec<ScoreDescription>,
    pub total: usize,
}

pub async fn get_score_descriptions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScoreDescriptionsResponse>, ApiError> {
    let descriptions = state
        .data_source
        .fetch_score_descriptions()
        .await
        .map_err(|e| {
            tracing::error!("Error fetching score descriptions: {}", e);
            ApiError::upstream("Failed to fetch score descriptions", e)
        })?;

    Ok(Json(ScoreDescriptionsResponse {
        success: true,
        total: descriptions.len(),
        descriptions,
    }))
}
