use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::Question;
use crate::services::AppState;

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Arc<Vec<Question>>,
    pub total: usize,
    pub cached: bool,
}

pub async fn get_questions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let result = state
        .questions_cache
        .get_or_fetch(state.data_source.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Error fetching questions: {}", e);
            ApiError::upstream("Failed to fetch questions", e)
        })?;

    Ok(Json(QuestionsResponse {
        success: true,
        total: result.questions.len(),
        questions: result.questions,
        cached: result.cached,
    }))
}
