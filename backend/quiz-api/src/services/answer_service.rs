use thiserror::Error;

use super::data_source::{QuizDataSource, UpstreamError};
use crate::metrics::record_answer_recorded;
use crate::models::{AnswerStatistics, Question, RecordAnswerResponse};

#[derive(Error, Debug)]
pub enum RecordAnswerError {
    #[error("Question not found")]
    QuestionNotFound,

    #[error("Invalid answer text")]
    InvalidAnswerText,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

pub struct AnswerService<'a> {
    source: &'a dyn QuizDataSource,
}

impl<'a> AnswerService<'a> {
    pub fn new(source: &'a dyn QuizDataSource) -> Self {
        Self { source }
    }

    /// Resolves the submitted text against the canonical question and records it.
    ///
    /// The question list is always read fresh from upstream. Nothing is persisted
    /// unless both the question and the answer text resolve.
    pub async fn record_answer(
        &self,
        session_id: &str,
        question_id: &str,
        selected_answer_text: &str,
    ) -> Result<RecordAnswerResponse, RecordAnswerError> {
        tracing::info!(
            "Processing answer: session={}, question={}",
            session_id,
            question_id
        );

        let questions = self.source.fetch_questions().await?;
        let question = find_question(&questions, question_id)
            .ok_or(RecordAnswerError::QuestionNotFound)?;

        let answer_index = question
            .resolve_answer(selected_answer_text)
            .ok_or(RecordAnswerError::InvalidAnswerText)?;
        let correct = question.is_correct(answer_index);

        let stats = self
            .source
            .record_answer(question_id, answer_index, question.answers.len())
            .await?;
        if !stats.is_consistent() {
            tracing::warn!(
                "Upstream statistics for question {} are inconsistent: total={}, distribution={:?}",
                question_id,
                stats.total_responses,
                stats.answer_distribution
            );
        }
        record_answer_recorded(correct);

        tracing::info!(
            "Answer recorded: session={}, question={}, index={}, correct={}, total_responses={}",
            session_id,
            question_id,
            answer_index,
            correct,
            stats.total_responses
        );

        Ok(RecordAnswerResponse {
            success: true,
            correct,
            correct_answer_index: question.correct_index,
            statistics: AnswerStatistics::new(stats, question),
        })
    }
}

fn find_question<'q>(questions: &'q [Question], question_id: &str) -> Option<&'q Question> {
    questions.iter().find(|q| q.id == question_id)
}
