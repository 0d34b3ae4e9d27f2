//! Tests for the HTTP access layer

use super::*;
use crate::config::{ClientConfig, Credentials};
use crate::error::Error;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_credentials() -> Credentials {
    Credentials::new("test-key", "test-secret")
}

fn handler_for(server: &MockServer) -> HttpRequestHandler {
    let config = ClientConfig::builder().base_url(server.uri()).build();
    HttpRequestHandler::new(&config, test_credentials()).unwrap()
}

#[tokio::test]
async fn test_get_sends_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(header(
            "authorization",
            "Basic dGVzdC1rZXk6dGVzdC1zZWNyZXQ=",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(&server);
    let cancel = CancellationToken::new();
    let response = handler.get("groups", &cancel).await.unwrap();

    assert_eq!(response.status, 200);
    assert!(response.body.contains("data"));
}

#[tokio::test]
async fn test_repeat_get_within_ttl_hits_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{"items":[]}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(&server);
    let cancel = CancellationToken::new();

    let first = handler.get("groups", &cancel).await.unwrap();
    let second = handler.get("groups", &cancel).await.unwrap();

    assert_eq!(first.body, second.body);
    assert_eq!(handler.cached_responses(), 1);
}

#[tokio::test]
async fn test_expired_ttl_triggers_second_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{"items":[]}}"#))
        .expect(2)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .cache_ttl(Duration::from_millis(100))
        .build();
    let handler = HttpRequestHandler::new(&config, test_credentials()).unwrap();
    let cancel = CancellationToken::new();

    handler.get("groups", &cancel).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    handler.get("groups", &cancel).await.unwrap();
}

#[tokio::test]
async fn test_429_backs_off_then_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("slow down"),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(&server);
    let cancel = CancellationToken::new();

    let start = Instant::now();
    let response = handler.get("limited", &cancel).await.unwrap();

    assert_eq!(response.status, 200);
    // The retry must respect the server's Retry-After hint
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_429_response_is_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{}}"#))
        .mount(&server)
        .await;

    let handler = handler_for(&server);
    let cancel = CancellationToken::new();

    let response = handler.get("limited", &cancel).await.unwrap();
    assert_eq!(response.status, 200);
    // Only the final accepted response made it into the cache
    assert_eq!(handler.cached_responses(), 1);
    let cached = handler.get("limited", &cancel).await.unwrap();
    assert_eq!(cached.status, 200);
}

#[tokio::test]
async fn test_401_is_fatal_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let handler = handler_for(&server);
    let cancel = CancellationToken::new();

    let result = handler.get("groups", &cancel).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
    assert_eq!(handler.cached_responses(), 0);
}

#[tokio::test]
async fn test_other_failures_surface_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such resource"))
        .mount(&server)
        .await;

    let handler = handler_for(&server);
    let cancel = CancellationToken::new();

    let result = handler.get("missing", &cancel).await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such resource");
        }
        other => panic!("expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_before_send() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let handler = handler_for(&server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = handler.get("groups", &cancel).await;
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_full_url_bypasses_base() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url("https://api.fivetran.com/v1/")
        .build();
    let handler = HttpRequestHandler::new(&config, test_credentials()).unwrap();
    let cancel = CancellationToken::new();

    let response = handler
        .get(&format!("{}/elsewhere", server.uri()), &cancel)
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_get_with_client_side_pacing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();
    let handler = HttpRequestHandler::new(&config, test_credentials()).unwrap();
    let cancel = CancellationToken::new();

    let response = handler.get("groups", &cancel).await.unwrap();
    assert_eq!(response.status, 200);
}
