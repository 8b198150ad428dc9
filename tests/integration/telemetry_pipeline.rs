//! Integration tests for the full telemetry pipeline
//!
//! These tests wire the detector and notifier together the way the hub does
//! (single inbound queue -> detector -> transition broadcast -> notifier) and
//! drive them with raw payloads, as routed by the transport.

use std::sync::Arc;

use leakwatch::ReadingStatus;
use leakwatch::actors::{detector::DetectorHandle, notifier::NotifierHandle};
use leakwatch::reading::ReadingStore;
use leakwatch::subscribers::{MemoryDirectory, SubscriberDirectory};
use tokio::sync::{broadcast, mpsc};

use crate::helpers::*;

const THRESHOLD: i64 = 1200;

struct Pipeline {
    telemetry_tx: mpsc::Sender<leakwatch::transport::InboundMessage>,
    store: ReadingStore,
    sender: Arc<RecordingSender>,
    detector: DetectorHandle,
    notifier: NotifierHandle,
}

async fn spawn_pipeline(subscribers: &[&str], sender: RecordingSender) -> Pipeline {
    let store = ReadingStore::new();
    let (telemetry_tx, telemetry_rx) = mpsc::channel(64);
    let (transition_tx, _) = broadcast::channel(64);

    let directory = Arc::new(MemoryDirectory::new());
    for email in subscribers {
        directory.add(email).await.unwrap();
    }

    let sender = Arc::new(sender);

    let notifier = NotifierHandle::spawn(
        THRESHOLD,
        directory,
        sender.clone(),
        transition_tx.subscribe(),
    );
    let detector = DetectorHandle::spawn(THRESHOLD, store.clone(), telemetry_rx, transition_tx);

    Pipeline {
        telemetry_tx,
        store,
        sender,
        detector,
        notifier,
    }
}

#[tokio::test]
async fn test_alert_and_all_clear_reach_subscribers_exactly_once() {
    let pipeline =
        spawn_pipeline(&["a@example.com", "b@example.com"], RecordingSender::default()).await;

    // NORMAL -> ALERT at 1300, steady 1400, ALERT -> NORMAL at 300
    for value in ["500", "1300", "1400", "300"] {
        pipeline.telemetry_tx.send(gas_value(value)).await.unwrap();
    }

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let sent = pipeline.sender.sent.lock().await;
    // two transitions x two subscribers
    assert_eq!(sent.len(), 4);

    let alerts: Vec<_> = sent
        .iter()
        .filter(|(_, notification)| notification.subject.contains("ALERT"))
        .collect();
    assert_eq!(alerts.len(), 2, "one alert per subscriber, exactly once");
    assert!(alerts.iter().all(|(_, n)| n.body.contains("1300")));

    let all_clears: Vec<_> = sent
        .iter()
        .filter(|(_, notification)| !notification.subject.contains("ALERT"))
        .collect();
    assert_eq!(all_clears.len(), 2);
    assert!(all_clears.iter().all(|(_, n)| n.body.contains("300")));
    drop(sent);

    pipeline.detector.shutdown().await;
    pipeline.notifier.shutdown().await;
}

#[tokio::test]
async fn test_steady_overload_never_storms() {
    let pipeline = spawn_pipeline(&["a@example.com"], RecordingSender::default()).await;

    pipeline.telemetry_tx.send(gas_value("1300")).await.unwrap();
    for _ in 0..20 {
        pipeline.telemetry_tx.send(gas_value("1400")).await.unwrap();
    }

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    // twenty-one over-threshold readings, one notification
    assert_eq!(pipeline.sender.sent.lock().await.len(), 1);

    let report = pipeline.notifier.last_report().await.unwrap();
    assert_eq!(report.attempted, 1);
    assert_eq!(report.delivered, 1);

    pipeline.detector.shutdown().await;
    pipeline.notifier.shutdown().await;
}

#[tokio::test]
async fn test_malformed_payloads_do_not_disturb_the_pipeline() {
    let pipeline = spawn_pipeline(&["a@example.com"], RecordingSender::default()).await;

    pipeline.telemetry_tx.send(gas_value("800")).await.unwrap();
    pipeline
        .telemetry_tx
        .send(gas_value("not-a-number"))
        .await
        .unwrap();
    pipeline.telemetry_tx.send(gas_value("1300")).await.unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    // the garbage payload neither fired a notification nor blocked the
    // following reading
    assert_eq!(pipeline.sender.sent.lock().await.len(), 1);

    let snapshot = pipeline.store.snapshot().await;
    assert_eq!(snapshot.value, 1300);
    assert_eq!(snapshot.status, ReadingStatus::Alert);

    pipeline.detector.shutdown().await;
    pipeline.notifier.shutdown().await;
}

#[tokio::test]
async fn test_advisory_status_overwrite_does_not_notify() {
    let pipeline = spawn_pipeline(&["a@example.com"], RecordingSender::default()).await;

    pipeline.telemetry_tx.send(gas_value("800")).await.unwrap();
    pipeline
        .telemetry_tx
        .send(gas_status("GAS_DETECTED"))
        .await
        .unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    assert_eq!(pipeline.store.snapshot().await.status, ReadingStatus::Alert);
    assert!(pipeline.sender.sent.lock().await.is_empty());

    pipeline.detector.shutdown().await;
    pipeline.notifier.shutdown().await;
}

#[tokio::test]
async fn test_burst_of_crossing_values_fires_once() {
    // The race this guards against: two over-threshold messages arriving
    // back-to-back must not both observe the pre-update NORMAL status. The
    // single inbound queue serializes them.
    let pipeline = spawn_pipeline(&["a@example.com"], RecordingSender::default()).await;

    for _ in 0..10 {
        pipeline.telemetry_tx.send(gas_value("1500")).await.unwrap();
    }

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    assert_eq!(pipeline.sender.sent.lock().await.len(), 1);

    pipeline.detector.shutdown().await;
    pipeline.notifier.shutdown().await;
}
