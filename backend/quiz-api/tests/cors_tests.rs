mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use quiz_api::config::Config;

async fn send(app: &common::TestApp, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .request(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    common::read_json(response).await
}

#[tokio::test]
async fn test_plain_options_returns_empty_200() {
    let app = common::create_test_app();

    for uri in [
        "/api/get-questions",
        "/api/get-score-descriptions",
        "/api/record-answer",
    ] {
        let (status, body) = send(&app, "OPTIONS", uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.is_null(), "{}", uri);
    }
    assert_eq!(app.source.question_fetches(), 0);
}

#[tokio::test]
async fn test_browser_preflight_gets_cors_headers() {
    let app = common::create_test_app();

    let response = app
        .request(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/record-answer")
                .header(header::ORIGIN, "https://quiz.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_ascii_uppercase();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn test_wrong_method_returns_405_json() {
    let app = common::create_test_app();

    let cases = [
        ("POST", "/api/get-questions"),
        ("DELETE", "/api/get-questions"),
        ("PUT", "/api/get-score-descriptions"),
        ("GET", "/api/record-answer"),
    ];
    for (method, uri) in cases {
        let (status, json) = send(&app, method, uri).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Method not allowed");
    }
    assert_eq!(app.source.question_fetches(), 0);
    assert_eq!(app.source.records(), 0);
}

#[tokio::test]
async fn test_head_is_rejected_without_upstream_calls() {
    let app = common::create_test_app();

    for uri in [
        "/api/get-questions",
        "/api/get-score-descriptions",
        "/api/record-answer",
    ] {
        let (status, _) = send(&app, "HEAD", uri).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "HEAD {}", uri);
    }
    assert_eq!(app.source.question_fetches(), 0);
    assert_eq!(app.source.score_fetches(), 0);

    let (status, json) = send(&app, "GET", "/api/get-questions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cached"], false);
}

#[tokio::test]
async fn test_configured_origin_is_echoed() {
    let mut config = Config::for_memory();
    config.allowed_origins = vec!["https://quiz.example".to_string()];
    let app = common::create_test_app_with_config(config);

    let response = app
        .request(
            Request::builder()
                .uri("/api/get-questions")
                .header(header::ORIGIN, "https://quiz.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://quiz.example"
    );
}

#[tokio::test]
async fn test_unlisted_origin_gets_no_allow_header() {
    let mut config = Config::for_memory();
    config.allowed_origins = vec!["https://quiz.example".to_string()];
    let app = common::create_test_app_with_config(config);

    let response = app
        .request(
            Request::builder()
                .uri("/api/get-questions")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
