use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub question: String,
    pub answers: Vec<String>,
    pub correct_index: usize,
}

impl Question {
    /// `correct_index` must point into `answers`.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && self.correct_index < self.answers.len()
    }

    /// Position of the first answer whose text matches exactly, scanning left to right.
    pub fn resolve_answer(&self, text: &str) -> Option<usize> {
        self.answers.iter().position(|answer| answer == text)
    }

    pub fn is_correct(&self, answer_index: usize) -> bool {
        answer_index == self.correct_index
    }
}
