use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceExt; // for `oneshot`

use herald::api::{self, AppState};
use herald::config::Config;
use herald::observability::Metrics;
use herald::queue::{self, Envelope};

/// Creates a minimal config for testing
/// We bypass file-based loading and parse a fixture directly
fn create_test_config() -> Config {
    let config_toml = r#"
[queue]
capacity = 8

[routing]
default_channel = "ntfy"

[backends.ntfy]
url = "ntfy://127.0.0.1/alerts"
    "#;

    toml::from_str(config_toml).expect("Failed to parse test config")
}

/// Builds a test app with an isolated queue, returning the receiver
/// so tests can observe what the ingest endpoint enqueued.
fn build_test_app() -> (Router, mpsc::Receiver<Envelope>, Arc<Metrics>) {
    let config = create_test_config();
    let (inbox, receiver) = queue::channel(config.queue.capacity);
    let metrics = Arc::new(Metrics::new());
    let state = AppState::new(inbox, metrics.clone());
    (api::router(state), receiver, metrics)
}

fn post_notify(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/notify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _receiver, _metrics) = build_test_app();

    let response = app
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn readyz_reflects_queue_state() {
    let (app, receiver, _metrics) = build_test_app();

    let response = app
        .clone()
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Dropping the receiver simulates a dead consumer.
    drop(receiver);
    let response = app
        .oneshot(Request::get("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn notify_accepts_and_enqueues() {
    let (app, mut receiver, _metrics) = build_test_app();

    let response = app
        .oneshot(post_notify(json!({
            "title": "Deploy finished",
            "message": "All good",
            "channels": "ntfy, mattermost",
            "priority": "high",
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    assert!(body["id"].is_string());

    let envelope = receiver.recv().await.unwrap();
    assert_eq!(envelope.message.title, "Deploy finished");
    assert_eq!(envelope.message.message, "All good");
    assert_eq!(
        envelope.message.extra.get("priority").and_then(Value::as_str),
        Some("high")
    );
}

#[tokio::test]
async fn notify_rejects_malformed_json() {
    let (app, _receiver, _metrics) = build_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/notify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn notify_rejects_oversized_payload() {
    let (app, _receiver, _metrics) = build_test_app();

    // Past the 256 KiB cap; the limit has to trip before JSON parsing.
    let response = app
        .oneshot(post_notify(json!({ "message": "x".repeat(300 * 1024) })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn notify_reports_queue_unavailable() {
    let (app, receiver, _metrics) = build_test_app();
    drop(receiver);

    let response = app
        .oneshot(post_notify(json!({ "message": "dropped" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "QUEUE_UNAVAILABLE");
}

#[tokio::test]
async fn metrics_snapshot_is_served() {
    let (app, _receiver, metrics) = build_test_app();
    metrics.seen("ntfy");
    metrics.delivered("ntfy");

    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ntfy"]["seen"], 1);
    assert_eq!(body["ntfy"]["delivered"], 1);
}
