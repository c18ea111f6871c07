//! Integration tests for webhook delivery

use serde_json::json;
use signaldesk::metrics::Metrics;
use signaldesk::services::WebhookNotifier;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_content_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({ "content": "Signal change for AAPL: Neutral -> Buy" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = WebhookNotifier::with_client(format!("{}/hook", server.uri()), reqwest::Client::new());
    assert!(notifier.notify("Signal change for AAPL: Neutral -> Buy", None).await);
}

#[tokio::test]
async fn failure_is_counted_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = Arc::new(Metrics::new().unwrap());
    let notifier = WebhookNotifier::with_client(format!("{}/hook", server.uri()), reqwest::Client::new())
        .with_metrics(metrics.clone());

    assert!(!notifier.notify("hello", Some("| A |")).await);
    assert_eq!(metrics.webhook_failures_total.get(), 1);
}

#[tokio::test]
async fn unreachable_endpoint_returns_false() {
    let notifier = WebhookNotifier::with_client("http://127.0.0.1:9/hook", reqwest::Client::new());
    assert!(!notifier.notify("hello", None).await);
}
