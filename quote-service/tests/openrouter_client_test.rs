//! OpenRouter client behaviour against a stubbed upstream.

mod common;

use common::{completion, SAMPLE_QUOTE};
use quote_service::config::OpenRouterConfig;
use quote_service::services::{GenerationError, OpenRouterClient, QuoteGenerator, QuoteMetrics};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server_uri: &str) -> (OpenRouterClient, QuoteMetrics) {
    let metrics = QuoteMetrics::new().unwrap();
    let client = OpenRouterClient::new(
        OpenRouterConfig::new("test-key", "openrouter/auto", server_uri),
        metrics.clone(),
    )
    .unwrap();
    (client, metrics)
}

#[tokio::test]
async fn success_sends_prompt_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "openrouter/auto",
            "temperature": 0.8,
            "max_tokens": 150
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(SAMPLE_QUOTE)))
        .expect(1)
        .mount(&server)
        .await;

    let (client, metrics) = client_for(&server.uri());
    let quote = client.generate_quote("joy").await.unwrap();

    assert_eq!(quote, SAMPLE_QUOTE);
    assert_eq!(metrics.openrouter_up(), 1);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("inspirational quote about joy."));
}

#[tokio::test]
async fn server_error_is_retried_once_after_delay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(SAMPLE_QUOTE)))
        .expect(1)
        .mount(&server)
        .await;

    let (client, metrics) = client_for(&server.uri());
    let started = Instant::now();
    let quote = client.generate_quote("hope").await.unwrap();

    assert_eq!(quote, SAMPLE_QUOTE);
    assert!(started.elapsed() >= Duration::from_millis(500));
    assert_eq!(metrics.openrouter_up(), 1);
}

#[tokio::test]
async fn rate_limit_exhausts_both_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(2)
        .mount(&server)
        .await;

    let (client, metrics) = client_for(&server.uri());
    let err = client.generate_quote("anger").await.unwrap_err();

    match err {
        GenerationError::Http { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(metrics.openrouter_up(), 0);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, metrics) = client_for(&server.uri());
    metrics.set_openrouter_status(true);

    let err = client.generate_quote("fear").await.unwrap_err();

    assert!(matches!(err, GenerationError::Http { status: 400, .. }));
    assert_eq!(metrics.openrouter_up(), 0);
}

#[tokio::test]
async fn short_reply_is_rejected_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, metrics) = client_for(&server.uri());
    let err = client.generate_quote("calm").await.unwrap_err();

    assert!(matches!(err, GenerationError::TooShort));
    assert!(err.to_string().contains("invalid or too short"));
    assert_eq!(metrics.openrouter_up(), 0);
}

#[tokio::test]
async fn empty_choices_fail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server.uri());
    let err = client.generate_quote("wonder").await.unwrap_err();

    assert!(matches!(err, GenerationError::NoChoices));
    assert_eq!(err.to_string(), "no choices returned from API");
}

#[tokio::test]
async fn embedded_api_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "message": "model not found", "code": "404" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server.uri());
    let err = client.generate_quote("pride").await.unwrap_err();

    match err {
        GenerationError::Api(message) => assert_eq!(message, "model not found"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(&server.uri());
    let err = client.generate_quote("zeal").await.unwrap_err();

    assert!(matches!(err, GenerationError::Decode(_)));
}

#[tokio::test]
async fn unreachable_upstream_is_terminal() {
    let (client, metrics) = client_for("http://127.0.0.1:1");
    let started = Instant::now();

    let err = client.generate_quote("joy").await.unwrap_err();

    assert!(matches!(err, GenerationError::Network(_)));
    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(metrics.openrouter_up(), 0);
}
