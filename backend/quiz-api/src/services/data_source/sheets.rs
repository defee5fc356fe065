use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};
use std::time::Duration;
use url::Url;

use super::{QuizDataSource, UpstreamError};
use crate::config::SheetsConfig;
use crate::metrics::track_upstream_operation;
use crate::models::{Question, ScoreDescription, Statistics};

/// Response body of the `spreadsheets.values.get` call
#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Client for the Google Sheets v4 values API.
pub struct SheetsClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> Result<Self, UpstreamError> {
        // api_url must be an absolute URL
        Url::parse(&config.api_url)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, UpstreamError> {
        let mut url = Url::parse(&self.config.api_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                UpstreamError::Unavailable(format!(
                    "Sheets API URL cannot be a base: {}",
                    self.config.api_url
                ))
            })?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", self.config.spreadsheet_id.as_str(), "values"])
            .push(&format!("{}{}", range, suffix));

        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<Value>>, UpstreamError> {
        let url = self.values_url(range, "")?;
        tracing::debug!("Reading sheet range {}", range);

        let response = self.authorize(self.http.get(url)).send().await?;
        let body: ValueRange = Self::read_json(response).await?;
        Ok(body.values)
    }

    async fn append_row(&self, range: &str, row: Vec<Value>) -> Result<(), UpstreamError> {
        let mut url = self.values_url(range, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        tracing::debug!("Appending row to sheet range {}", range);

        let response = self
            .authorize(self.http.post(url))
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        let _: Value = Self::read_json(response).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizDataSource for SheetsClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, UpstreamError> {
        let rows = track_upstream_operation(
            "fetch_questions",
            self.get_values(&self.config.questions_range),
        )
        .await?;
        let questions = parse_questions(&rows);
        tracing::info!("Loaded {} questions from sheet", questions.len());
        Ok(questions)
    }

    async fn fetch_score_descriptions(&self) -> Result<Vec<ScoreDescription>, UpstreamError> {
        let rows = track_upstream_operation(
            "fetch_score_descriptions",
            self.get_values(&self.config.score_descriptions_range),
        )
        .await?;
        Ok(parse_score_descriptions(&rows))
    }

    async fn record_answer(
        &self,
        question_id: &str,
        answer_index: usize,
        answer_count: usize,
    ) -> Result<Statistics, UpstreamError> {
        let row = vec![
            json!(Utc::now().to_rfc3339()),
            json!(question_id),
            json!(answer_index),
        ];
        track_upstream_operation(
            "append_response",
            self.append_row(&self.config.responses_range, row),
        )
        .await?;

        let rows = track_upstream_operation(
            "read_responses",
            self.get_values(&self.config.responses_range),
        )
        .await?;
        Ok(Statistics::from_indices(
            response_indices(&rows, question_id, answer_count),
            answer_count,
        ))
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_blank_row(row: &[Value]) -> bool {
    row.iter().all(|cell| cell_text(cell).is_empty())
}

/// Row layout: `id | question | answer 1 .. answer n | correct index`
pub(crate) fn parse_question_row(row: &[Value]) -> Option<Question> {
    if row.len() < 4 {
        return None;
    }
    let id = cell_text(&row[0]);
    if id.is_empty() {
        return None;
    }
    let correct_index = cell_text(&row[row.len() - 1]).parse::<usize>().ok()?;
    let question = Question {
        id,
        question: cell_text(&row[1]),
        answers: row[2..row.len() - 1].iter().map(cell_text).collect(),
        correct_index,
    };
    question.is_well_formed().then_some(question)
}

pub(crate) fn parse_questions(rows: &[Vec<Value>]) -> Vec<Question> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| !is_blank_row(row))
        .filter_map(|(position, row)| {
            let parsed = parse_question_row(row);
            if parsed.is_none() {
                tracing::warn!("Skipping malformed question row at position {}", position);
            }
            parsed
        })
        .collect()
}

fn typed_cell(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return json!(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return json!(f);
        }
    }
    Value::String(raw.to_string())
}

/// First row is the header; each later row becomes an object keyed by it.
pub(crate) fn parse_score_descriptions(rows: &[Vec<Value>]) -> Vec<ScoreDescription> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };
    let keys: Vec<String> = header.iter().map(cell_text).collect();

    body.iter()
        .filter(|row| !is_blank_row(row))
        .map(|row| {
            let mut fields = Map::new();
            for (position, key) in keys.iter().enumerate() {
                if key.is_empty() {
                    continue;
                }
                let raw = row.get(position).map(cell_text).unwrap_or_default();
                let value = if raw.is_empty() {
                    Value::String(String::new())
                } else {
                    typed_cell(&raw)
                };
                fields.insert(key.clone(), value);
            }
            ScoreDescription::from(fields)
        })
        .collect()
}

/// Answer indices recorded for `question_id`. Row layout: `timestamp | question id | index`
///
/// Indices outside `0..answer_count` are skipped.
pub(crate) fn response_indices<'a>(
    rows: &'a [Vec<Value>],
    question_id: &'a str,
    answer_count: usize,
) -> impl Iterator<Item = usize> + 'a {
    rows.iter().enumerate().filter_map(move |(position, row)| {
        let id = row.get(1).map(cell_text)?;
        if id != question_id {
            return None;
        }
        let raw = row.get(2).map(cell_text)?;
        match raw.parse::<usize>() {
            Ok(index) if index < answer_count => Some(index),
            _ => {
                tracing::warn!(
                    "Skipping response row at position {} for question {}: bad answer index {:?}",
                    position,
                    question_id,
                    raw
                );
                None
            }
        }
    })
}
