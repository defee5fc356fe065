#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use quiz_api::{
    config::Config,
    create_router,
    models::{Question, ScoreDescription},
    services::{data_source::InMemoryDataSource, AppState},
    utils::time::ManualClock,
};

pub struct TestApp {
    pub router: Router,
    pub source: Arc<InMemoryDataSource>,
    pub clock: Arc<ManualClock>,
}

pub fn capitals_question() -> Question {
    Question {
        id: "q1".to_string(),
        question: "What is the capital of France?".to_string(),
        answers: vec!["London".into(), "Paris".into(), "Berlin".into()],
        correct_index: 1,
    }
}

pub fn test_questions() -> Vec<Question> {
    vec![
        capitals_question(),
        Question {
            id: "q2".to_string(),
            question: "Which planet is closest to the sun?".to_string(),
            answers: vec!["Mercury".into(), "Venus".into(), "Mars".into()],
            correct_index: 0,
        },
        Question {
            id: "q3".to_string(),
            question: "How many legs does a spider have?".to_string(),
            answers: vec!["Six".into(), "Ten".into(), "Eight".into()],
            correct_index: 2,
        },
    ]
}

pub fn test_score_descriptions() -> Vec<ScoreDescription> {
    let rows = [
        json!({ "minScore": 0, "maxScore": 1, "title": "Curious", "message": "Keep exploring" }),
        json!({ "minScore": 2, "maxScore": 3, "title": "Expert", "message": "Well done" }),
    ];
    rows.into_iter()
        .map(|row| serde_json::from_value(row).unwrap())
        .collect()
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_config(Config::for_memory())
}

pub fn create_test_app_with_config(config: Config) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let source = Arc::new(InMemoryDataSource::new(
        test_questions(),
        test_score_descriptions(),
    ));
    let clock = Arc::new(ManualClock::default());

    let app_state = Arc::new(AppState::with_data_source(
        config,
        source.clone(),
        clock.clone(),
    ));

    TestApp {
        router: create_router(app_state),
        source,
        clock,
    }
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self
            .request(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        read_json(response).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .request(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&body).unwrap()))
                    .unwrap(),
            )
            .await;
        read_json(response).await
    }
}

pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}
