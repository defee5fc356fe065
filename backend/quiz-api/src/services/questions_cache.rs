use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::data_source::{QuizDataSource, UpstreamError};
use crate::metrics::{record_cache_hit, record_cache_miss};
use crate::models::Question;
use crate::utils::time::Clock;

#[derive(Debug, Clone)]
struct CacheEntry {
    questions: Arc<Vec<Question>>,
    fetched_at: DateTime<Utc>,
}

/// Result of a cache lookup
#[derive(Debug, Clone)]
pub struct CachedQuestions {
    pub questions: Arc<Vec<Question>>,
    pub cached: bool,
}

/// Snapshot of cache state for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Empty,
    /// A lookup or refresh currently holds the slot
    Refreshing,
    Fresh { age_secs: i64 },
    Stale { age_secs: i64 },
}

/// Single-slot, time-based cache over the full question set.
///
/// The slot is locked for the duration of a refresh, so requests that miss
/// together share one upstream fetch. A failed refresh leaves the previous
/// snapshot in place.
pub struct QuestionsCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CacheEntry>>,
}

impl QuestionsCache {
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or_else(|_| Duration::weeks(52 * 100));
        Self {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) < self.ttl
    }

    pub async fn get_or_fetch(
        &self,
        source: &dyn QuizDataSource,
    ) -> Result<CachedQuestions, UpstreamError> {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if self.is_fresh(entry, self.clock.now()) {
                record_cache_hit();
                tracing::debug!("Questions cache hit ({} questions)", entry.questions.len());
                return Ok(CachedQuestions {
                    questions: entry.questions.clone(),
                    cached: true,
                });
            }
        }

        record_cache_miss();
        let fetched_at = self.clock.now();
        let questions = Arc::new(source.fetch_questions().await?);
        tracing::info!("Questions cache refreshed with {} questions", questions.len());

        *slot = Some(CacheEntry {
            questions: questions.clone(),
            fetched_at,
        });

        Ok(CachedQuestions {
            questions,
            cached: false,
        })
    }

    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.slot.lock().await.as_ref().map(|entry| entry.fetched_at)
    }

    /// Does not wait for an in-flight refresh.
    pub fn status(&self) -> CacheStatus {
        let Ok(slot) = self.slot.try_lock() else {
            return CacheStatus::Refreshing;
        };
        match slot.as_ref() {
            None => CacheStatus::Empty,
            Some(entry) => {
                let now = self.clock.now();
                let age_secs = now.signed_duration_since(entry.fetched_at).num_seconds();
                if self.is_fresh(entry, now) {
                    CacheStatus::Fresh { age_secs }
                } else {
                    CacheStatus::Stale { age_secs }
                }
            }
        }
    }
}
