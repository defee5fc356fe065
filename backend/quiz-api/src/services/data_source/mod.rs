//! Quiz data source port
//!
//! Everything the handlers read or append goes through [`QuizDataSource`].
//! The production adapter talks to the Google Sheets values API; the
//! in-memory adapter backs tests and local runs.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Question, ScoreDescription, Statistics};

pub mod memory;
pub mod sheets;

pub use memory::InMemoryDataSource;
pub use sheets::SheetsClient;

/// Errors raised by an upstream data source
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to decode upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait QuizDataSource: Send + Sync {
    /// Full question set, in sheet order
    async fn fetch_questions(&self) -> Result<Vec<Question>, UpstreamError>;

    async fn fetch_score_descriptions(&self) -> Result<Vec<ScoreDescription>, UpstreamError>;

    /// Persist one response and return the updated aggregate for the question.
    /// The distribution has `answer_count` slots.
    async fn record_answer(
        &self,
        question_id: &str,
        answer_index: usize,
        answer_count: usize,
    ) -> Result<Statistics, UpstreamError>;
}
