//! Integration tests for the HTTP API
//!
//! Each test spawns the real axum server on an ephemeral port with the core
//! wired to recording fakes, then talks to it over HTTP.

use std::sync::Arc;

use leakwatch::api::{ApiConfig, ApiState, spawn_api_server};
use leakwatch::publisher::CommandPublisher;
use leakwatch::reading::ReadingStore;
use leakwatch::subscribers::{MemoryDirectory, SubscriberDirectory};
use leakwatch::transport::ConnectionState;
use leakwatch::{GasReading, ReadingStatus};
use tokio::sync::watch;

use crate::helpers::{RecordingSender, RecordingSink};

struct TestApi {
    base_url: String,
    store: ReadingStore,
    sink: Arc<RecordingSink>,
    directory: Arc<MemoryDirectory>,
    sender: Arc<RecordingSender>,
    // keeps the connection state alive for the server
    _state_tx: watch::Sender<ConnectionState>,
}

async fn spawn_test_api() -> TestApi {
    let store = ReadingStore::new();
    let sink = Arc::new(RecordingSink::default());
    let directory = Arc::new(MemoryDirectory::new());
    let sender = Arc::new(RecordingSender::default());
    let (state_tx, state_rx) = watch::channel(ConnectionState::Connected);

    let state = ApiState::new(
        store.clone(),
        CommandPublisher::new(sink.clone()),
        directory.clone(),
        state_rx,
        Some(sender.clone()),
    );

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        enable_cors: false,
    };

    let addr = spawn_api_server(config, state).await.unwrap();

    TestApi {
        base_url: format!("http://{addr}"),
        store,
        sink,
        directory,
        sender,
        _state_tx: state_tx,
    }
}

#[tokio::test]
async fn test_latest_reading_returns_the_snapshot() {
    let api = spawn_test_api().await;

    api.store
        .replace(GasReading {
            value: 1350,
            status: ReadingStatus::Alert,
            observed_at: chrono::Utc::now(),
        })
        .await;

    let response = reqwest::get(format!("{}/api/gas/latest", api.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["value"], 1350);
    assert_eq!(body["data"]["status"], "ALERT");
}

#[tokio::test]
async fn test_health_reports_connection_and_system_status() {
    let api = spawn_test_api().await;

    let response = reqwest::get(format!("{}/api/health", api.base_url))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["connection"], "connected");
    assert_eq!(body["system_status"], "ON");
}

#[tokio::test]
async fn test_control_accepts_whitelisted_command() {
    let api = spawn_test_api().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/control", api.base_url))
        .json(&serde_json::json!({ "command": "RELAY_ON" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["command"], "RELAY_ON");

    let published = api.sink.published.lock().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].1, b"RELAY_ON");
}

#[tokio::test]
async fn test_control_rejects_unknown_command_with_allowed_set() {
    let api = spawn_test_api().await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/control", api.base_url))
        .json(&serde_json::json!({ "command": "FOO" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("SERVO_WITH_FAN"), "{error}");

    assert!(api.sink.published.lock().await.is_empty());
}

#[tokio::test]
async fn test_subscriber_lifecycle_over_http() {
    let api = spawn_test_api().await;
    let client = reqwest::Client::new();

    // add
    let response = client
        .post(format!("{}/api/subscribers", api.base_url))
        .json(&serde_json::json!({ "email": "a@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // duplicate add is a 400
    let response = client
        .post(format!("{}/api/subscribers", api.base_url))
        .json(&serde_json::json!({ "email": "a@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    // list
    let body: serde_json::Value = client
        .get(format!("{}/api/subscribers", api.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // the welcome notification went out to the new subscriber
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    assert_eq!(api.sender.recipients().await, vec!["a@example.com"]);

    // remove
    let response = client
        .delete(format!("{}/api/subscribers/a@example.com", api.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert!(api.directory.list_all().await.unwrap().is_empty());

    // removing again is a 404
    let response = client
        .delete(format!("{}/api/subscribers/a@example.com", api.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
