use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{QuizDataSource, UpstreamError};
use crate::models::{Question, ScoreDescription, Statistics};

/// Seed file layout for [`InMemoryDataSource::from_seed_file`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub score_descriptions: Vec<ScoreDescription>,
}

/// Process-local data source. Counts calls so tests can assert on upstream traffic.
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    questions: Mutex<Vec<Question>>,
    score_descriptions: Mutex<Vec<ScoreDescription>>,
    responses: Mutex<HashMap<String, Vec<usize>>>,
    failing: AtomicBool,
    question_fetches: AtomicUsize,
    score_fetches: AtomicUsize,
    records: AtomicUsize,
}

impl InMemoryDataSource {
    pub fn new(questions: Vec<Question>, score_descriptions: Vec<ScoreDescription>) -> Self {
        Self {
            questions: Mutex::new(questions),
            score_descriptions: Mutex::new(score_descriptions),
            ..Default::default()
        }
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read seed file {}: {}", path.display(), e))?;
        let seed: SeedData = serde_json::from_str(&raw)?;
        let questions: Vec<Question> = seed
            .questions
            .into_iter()
            .filter(|q| {
                let ok = q.is_well_formed();
                if !ok {
                    tracing::warn!("Skipping malformed seed question id={}", q.id);
                }
                ok
            })
            .collect();
        tracing::info!(
            "Seeded in-memory data source: {} questions, {} score descriptions",
            questions.len(),
            seed.score_descriptions.len()
        );
        Ok(Self::new(questions, seed.score_descriptions))
    }

    /// Make every subsequent call fail (or recover) to imitate an upstream outage.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn replace_questions(&self, questions: Vec<Question>) {
        *lock(&self.questions) = questions;
    }

    pub fn question_fetches(&self) -> usize {
        self.question_fetches.load(Ordering::SeqCst)
    }

    pub fn score_fetches(&self) -> usize {
        self.score_fetches.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> usize {
        self.records.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), UpstreamError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(UpstreamError::Unavailable(
                "in-memory data source is unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl QuizDataSource for InMemoryDataSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, UpstreamError> {
        self.question_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(lock(&self.questions).clone())
    }

    async fn fetch_score_descriptions(&self) -> Result<Vec<ScoreDescription>, UpstreamError> {
        self.score_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(lock(&self.score_descriptions).clone())
    }

    async fn record_answer(
        &self,
        question_id: &str,
        answer_index: usize,
        answer_count: usize,
    ) -> Result<Statistics, UpstreamError> {
        self.records.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut responses = lock(&self.responses);
        let recorded = responses.entry(question_id.to_string()).or_default();
        recorded.push(answer_index);

        Ok(Statistics::from_indices(recorded.iter().copied(), answer_count))
    }
}
