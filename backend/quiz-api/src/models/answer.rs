use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Question;

pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields: sessionID, questionID, selectedAnswerText";

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RecordAnswerRequest {
    #[serde(rename = "sessionID")]
    #[validate(required, length(min = 1))]
    pub session_id: Option<String>,
    #[serde(rename = "questionID")]
    #[validate(required, length(min = 1))]
    pub question_id: Option<String>,
    #[serde(rename = "selectedAnswerText")]
    #[validate(required, length(min = 1))]
    pub selected_answer_text: Option<String>,
}

/// Aggregate responses recorded for one question.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_responses: u64,
    pub answer_distribution: Vec<u64>,
}

impl Statistics {
    /// Builds a distribution with at least `answer_count` slots from recorded answer indices.
    pub fn from_indices<I>(indices: I, answer_count: usize) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut distribution = vec![0u64; answer_count];
        let mut total = 0u64;
        for index in indices {
            if index >= distribution.len() {
                distribution.resize(index + 1, 0);
            }
            distribution[index] += 1;
            total += 1;
        }
        Self {
            total_responses: total,
            answer_distribution: distribution,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.answer_distribution.iter().sum::<u64>() == self.total_responses
    }

    pub fn count_for(&self, answer_index: usize) -> u64 {
        self.answer_distribution
            .get(answer_index)
            .copied()
            .unwrap_or(0)
    }

    /// Share of responses at `answer_index`, in percent, rounded to one decimal.
    /// Zero responses yield 0.0.
    pub fn percentage_for(&self, answer_index: usize) -> f64 {
        if self.total_responses == 0 {
            return 0.0;
        }
        let raw = self.count_for(answer_index) as f64 / self.total_responses as f64 * 100.0;
        (raw * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerStatistics {
    pub total_responses: u64,
    pub correct_percentage: f64,
    pub answer_distribution: Vec<u64>,
}

impl AnswerStatistics {
    pub fn new(stats: Statistics, question: &Question) -> Self {
        Self {
            correct_percentage: stats.percentage_for(question.correct_index),
            total_responses: stats.total_responses,
            answer_distribution: stats.answer_distribution,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnswerResponse {
    pub success: bool,
    pub correct: bool,
    pub correct_answer_index: usize,
    pub statistics: AnswerStatistics,
}
