use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::{answer_service::RecordAnswerError, data_source::UpstreamError};

/// Errors surfaced by the API handlers, mapped one-to-one onto HTTP statuses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{error}")]
    Validation {
        error: String,
        message: Option<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn validation(error: impl Into<String>) -> Self {
        ApiError::Validation {
            error: error.into(),
            message: None,
        }
    }

    pub fn malformed_body(detail: impl Into<String>) -> Self {
        ApiError::Validation {
            error: "Invalid request body".to_string(),
            message: Some(detail.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn upstream(context: &'static str, source: UpstreamError) -> Self {
        ApiError::Upstream { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps an answer-recording failure; upstream failures get `context` as their error text
    pub fn from_record_answer(err: RecordAnswerError, context: &'static str) -> Self {
        match err {
            RecordAnswerError::Upstream(source) => ApiError::upstream(context, source),
            other @ RecordAnswerError::QuestionNotFound => ApiError::not_found(other.to_string()),
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::MethodNotAllowed => ErrorBody {
                success: false,
                error: "Method not allowed".to_string(),
                message: None,
            },
            ApiError::Validation { error, message } => ErrorBody {
                success: false,
                error,
                message,
            },
            ApiError::NotFound(error) => ErrorBody {
                success: false,
                error,
                message: None,
            },
            // Upstream detail is passed through unsanitized
            ApiError::Upstream { context, source } => ErrorBody {
                success: false,
                error: context.to_string(),
                message: Some(source.to_string()),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::upstream(
                "Failed to fetch questions",
                UpstreamError::Unavailable("down".into())
            )
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_record_answer_mapping() {
        let err = ApiError::from_record_answer(
            RecordAnswerError::QuestionNotFound,
            "Failed to record answer",
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::from_record_answer(
            RecordAnswerError::InvalidAnswerText,
            "Failed to record answer",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid answer text");
    }

    #[tokio::test]
    async fn test_upstream_body_carries_detail() {
        let response = ApiError::upstream(
            "Failed to fetch questions",
            UpstreamError::Unavailable("sheet offline".into()),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to fetch questions");
        assert_eq!(json["message"], "sheet offline");
    }

    #[tokio::test]
    async fn test_method_not_allowed_body_has_no_message() {
        let response = ApiError::MethodNotAllowed.into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "Method not allowed" }));
    }
}
