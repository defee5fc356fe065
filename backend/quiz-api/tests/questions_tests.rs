mod common;

use axum::http::StatusCode;
use chrono::Duration;

#[tokio::test]
async fn test_first_fetch_is_not_cached() {
    let app = common::create_test_app();

    let (status, json) = app.get("/api/get-questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["cached"], false);
    assert_eq!(json["total"], 3);
    assert_eq!(json["questions"][0]["id"], "q1");
    assert_eq!(json["questions"][0]["answers"][1], "Paris");
    assert_eq!(json["questions"][0]["correctIndex"], 1);
}

#[tokio::test]
async fn test_second_fetch_within_a_second_is_cached() {
    let app = common::create_test_app();

    let (_, first) = app.get("/api/get-questions").await;
    app.clock.advance(Duration::milliseconds(500));
    let (status, second) = app.get("/api/get-questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(first["questions"], second["questions"]);
    assert_eq!(app.source.question_fetches(), 1);
}

#[tokio::test]
async fn test_cache_serves_snapshot_until_ttl_elapses() {
    let app = common::create_test_app();
    app.get("/api/get-questions").await;

    // Upstream changes are invisible while the snapshot is fresh
    app.source.replace_questions(vec![common::capitals_question()]);
    app.clock.advance(Duration::seconds(299));
    let (_, json) = app.get("/api/get-questions").await;
    assert_eq!(json["cached"], true);
    assert_eq!(json["total"], 3);

    app.clock.advance(Duration::seconds(2));
    let (_, json) = app.get("/api/get-questions").await;
    assert_eq!(json["cached"], false);
    assert_eq!(json["total"], 1);
    assert_eq!(app.source.question_fetches(), 2);
}

#[tokio::test]
async fn test_upstream_failure_returns_500_with_detail() {
    let app = common::create_test_app();
    app.source.set_failing(true);

    let (status, json) = app.get("/api/get-questions").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Failed to fetch questions");
    assert_eq!(json["message"], "in-memory data source is unavailable");
}

#[tokio::test]
async fn test_fresh_snapshot_survives_upstream_outage() {
    let app = common::create_test_app();
    app.get("/api/get-questions").await;

    app.source.set_failing(true);
    app.clock.advance(Duration::minutes(1));
    let (status, json) = app.get("/api/get-questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cached"], true);
    assert_eq!(app.source.question_fetches(), 1);
}

#[tokio::test]
async fn test_expired_snapshot_refetch_failure_keeps_old_snapshot() {
    let app = common::create_test_app();
    app.get("/api/get-questions").await;

    app.source.set_failing(true);
    app.clock.advance(Duration::minutes(10));
    let (status, _) = app.get("/api/get-questions").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    app.source.set_failing(false);
    let (status, json) = app.get("/api/get-questions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cached"], false);
}

#[tokio::test]
async fn test_every_question_has_valid_correct_index() {
    let app = common::create_test_app();

    let (_, json) = app.get("/api/get-questions").await;

    for question in json["questions"].as_array().unwrap() {
        let answers = question["answers"].as_array().unwrap();
        let correct = question["correctIndex"].as_u64().unwrap() as usize;
        assert!(correct < answers.len());
    }
}
