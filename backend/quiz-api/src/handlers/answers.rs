use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::ApiError,
    extractors::AppJson,
    models::{answer::MISSING_FIELDS_MESSAGE, RecordAnswerRequest, RecordAnswerResponse},
    services::{
        answer_service::{AnswerService, RecordAnswerError},
        AppState,
    },
};

pub async fn record_answer(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RecordAnswerRequest>,
) -> Result<Json<RecordAnswerResponse>, ApiError> {
    if let Err(errors) = req.validate() {
        tracing::warn!("Rejected answer submission: {}", errors);
        return Err(ApiError::validation(MISSING_FIELDS_MESSAGE));
    }
    // `validate` has already rejected missing fields
    let (Some(session_id), Some(question_id), Some(answer_text)) = (
        req.session_id.as_deref(),
        req.question_id.as_deref(),
        req.selected_answer_text.as_deref(),
    ) else {
        return Err(ApiError::validation(MISSING_FIELDS_MESSAGE));
    };

    let service = AnswerService::new(state.data_source.as_ref());

    match service
        .record_answer(session_id, question_id, answer_text)
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            match &e {
                RecordAnswerError::Upstream(_) => tracing::error!("Error recording answer: {}", e),
                _ => tracing::warn!(
                    "Answer rejected for question {}: {}",
                    question_id,
                    e
                ),
            }
            Err(ApiError::from_record_answer(e, "Failed to record answer"))
        }
    }
}
