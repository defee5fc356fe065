use crate::config::{Config, DataSourceKind};
use crate::utils::time::{Clock, SystemClock};
use std::sync::Arc;

use data_source::{InMemoryDataSource, QuizDataSource, SheetsClient};
use questions_cache::QuestionsCache;

pub struct AppState {
    pub config: Config,
    pub data_source: Arc<dyn QuizDataSource>,
    pub questions_cache: QuestionsCache,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let data_source: Arc<dyn QuizDataSource> = match config.data_source {
            DataSourceKind::Sheets => {
                tracing::info!(
                    "Using Google Sheets data source: spreadsheet={}",
                    config.sheets.spreadsheet_id
                );
                Arc::new(SheetsClient::new(config.sheets.clone())?)
            }
            DataSourceKind::Memory => {
                let source = match &config.seed_path {
                    Some(path) => InMemoryDataSource::from_seed_file(path)?,
                    None => {
                        tracing::warn!("In-memory data source started without seed data");
                        InMemoryDataSource::default()
                    }
                };
                Arc::new(source)
            }
        };

        Ok(Self::with_data_source(
            config,
            data_source,
            Arc::new(SystemClock),
        ))
    }

    /// Builds state around an existing data source and clock
    pub fn with_data_source(
        config: Config,
        data_source: Arc<dyn QuizDataSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ttl = std::time::Duration::from_secs(config.questions_cache_ttl_secs);
        tracing::info!("Questions cache TTL: {}s", ttl.as_secs());

        Self {
            questions_cache: QuestionsCache::new(ttl, clock),
            config,
            data_source,
        }
    }
}

pub mod answer_service;
pub mod data_source;
pub mod questions_cache;
