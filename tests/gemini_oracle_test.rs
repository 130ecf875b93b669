//! Gemini oracle against a mock HTTP server.
//!
//! Covers the request shape, retry of transient failures, immediate failure
//! on client errors and replies without usable text.

use mockito::{Matcher, Server};
use serde_json::json;

use planora::adapters::oracle::GeminiOracle;
use planora::domain::models::OracleConfig;
use planora::domain::ports::{OracleError, RankingOracle, RankingRequest};

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn config(base_url: String, max_retries: u32) -> OracleConfig {
    OracleConfig {
        base_url,
        max_retries,
        initial_backoff_ms: 10,
        requests_per_second: 100,
        timeout_secs: 5,
        ..Default::default()
    }
}

fn request() -> RankingRequest {
    RankingRequest {
        prompt: "Pick services within budget.".to_string(),
        payload: json!({ "hardBudget": 100, "candidates": [] }),
    }
}

fn reply_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_rank_returns_reply_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply_body(r#"{"selection":[]}"#))
        .create_async()
        .await;

    let oracle = GeminiOracle::new(&config(server.url(), 0), "test-key".to_string()).unwrap();
    let text = oracle.rank(&request()).await.unwrap();

    assert_eq!(text, r#"{"selection":[]}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("internal")
        .expect(1)
        .create_async()
        .await;
    let succeeding = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(reply_body("ok"))
        .expect(1)
        .create_async()
        .await;

    let oracle = GeminiOracle::new(&config(server.url(), 2), "test-key".to_string()).unwrap();
    let result = oracle.rank(&request()).await;

    assert_eq!(result.unwrap(), "ok");
    failing.assert_async().await;
    succeeding.assert_async().await;
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(3) // initial attempt + 2 retries
        .create_async()
        .await;

    let oracle = GeminiOracle::new(&config(server.url(), 2), "test-key".to_string()).unwrap();
    let result = oracle.rank(&request()).await;

    assert!(matches!(result, Err(OracleError::Http { status: 503, .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"message":"API key not valid"}}"#)
        .expect(1)
        .create_async()
        .await;

    let oracle = GeminiOracle::new(&config(server.url(), 3), "bad-key".to_string()).unwrap();
    let err = oracle.rank(&request()).await.unwrap_err();

    match err {
        OracleError::Http { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reply_without_candidates_is_empty() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "candidates": [] }).to_string())
        .create_async()
        .await;

    let oracle = GeminiOracle::new(&config(server.url(), 1), "test-key".to_string()).unwrap();
    assert!(matches!(oracle.rank(&request()).await, Err(OracleError::EmptyResponse)));
}

#[tokio::test]
async fn test_rate_limited_reply_is_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(429)
        .create_async()
        .await;

    let oracle = GeminiOracle::new(&config(server.url(), 0), "test-key".to_string()).unwrap();
    let err = oracle.rank(&request()).await.unwrap_err();
    assert!(matches!(err, OracleError::RateLimited));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_envelope_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>gateway page</html>")
        .expect(1)
        .create_async()
        .await;

    let oracle = GeminiOracle::new(&config(server.url(), 3), "test-key".to_string()).unwrap();
    let err = oracle.rank(&request()).await.unwrap_err();

    assert!(matches!(err, OracleError::MalformedResponse(_)));
    assert!(!err.is_transient());
    mock.assert_async().await;
}
