//! Integration tests for the HTTP quote provider against a mock upstream.

use currency_monitor::config::settings::QuoteProviderSettings;
use currency_monitor::services::{HttpQuoteProvider, QuoteError, QuoteProvider};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> HttpQuoteProvider {
    HttpQuoteProvider::new(&QuoteProviderSettings {
        base_url: server.uri(),
        timeout_seconds: 5,
    })
    .expect("quote provider")
}

#[tokio::test]
async fn test_get_rate_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": "USD",
            "rates": { "EUR": 0.92, "GBP": 0.79 }
        })))
        .mount(&server)
        .await;

    let rate = provider_for(&server).get_rate("USD", "EUR").await.unwrap();
    assert_eq!(rate, 0.92);
}

#[tokio::test]
async fn test_get_rate_quote_code_missing_from_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "base": "USD",
            "rates": { "GBP": 0.79 }
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .get_rate("USD", "EUR")
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::RateNotFound(_)));
}

#[tokio::test]
async fn test_get_rate_upstream_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .get_rate("USD", "EUR")
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::Status(503)));
}

#[tokio::test]
async fn test_get_rate_malformed_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .get_rate("USD", "EUR")
        .await
        .unwrap_err();
    assert!(matches!(err, QuoteError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_get_rate_transport_failure() {
    // a server that is immediately dropped leaves nothing listening
    // (use a non-pooled server so dropping it actually closes the listener)
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let provider = HttpQuoteProvider::new(&QuoteProviderSettings {
        base_url: uri,
        timeout_seconds: 1,
    })
    .expect("quote provider");

    let err = provider.get_rate("USD", "EUR").await.unwrap_err();
    assert!(matches!(err, QuoteError::Transport(_)));
}
