//! Integration tests for notification fan-out isolation

use std::sync::Arc;

use chrono::Utc;
use leakwatch::actors::messages::TransitionEvent;
use leakwatch::actors::notifier::NotifierHandle;
use leakwatch::subscribers::{MemoryDirectory, SubscriberDirectory};
use leakwatch::{GasReading, ReadingStatus};
use tokio::sync::broadcast;

use crate::helpers::*;

fn alert_event(value: i64) -> TransitionEvent {
    TransitionEvent {
        from: ReadingStatus::Normal,
        to: ReadingStatus::Alert,
        reading: GasReading {
            value,
            status: ReadingStatus::Alert,
            observed_at: Utc::now(),
        },
    }
}

#[tokio::test]
async fn test_empty_subscriber_set_completes_without_attempts() {
    let directory = Arc::new(MemoryDirectory::new());
    let sender = Arc::new(RecordingSender::default());
    let (transition_tx, transition_rx) = broadcast::channel(16);

    let notifier = NotifierHandle::spawn(1200, directory, sender.clone(), transition_rx);

    transition_tx.send(alert_event(1500)).unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    let report = notifier.last_report().await.unwrap();
    assert_eq!(report.attempted, 0);
    assert_eq!(report.failed, 0);
    assert!(sender.sent.lock().await.is_empty());

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_one_bad_recipient_does_not_block_the_rest() {
    let directory = Arc::new(MemoryDirectory::new());
    for email in [
        "a@example.com",
        "broken@example.com",
        "c@example.com",
        "d@example.com",
    ] {
        directory.add(email).await.unwrap();
    }

    let sender = Arc::new(RecordingSender::failing_for("broken@example.com"));
    let (transition_tx, transition_rx) = broadcast::channel(16);

    let notifier = NotifierHandle::spawn(1200, directory, sender.clone(), transition_rx);

    transition_tx.send(alert_event(1500)).unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    let report = notifier.last_report().await.unwrap();
    assert_eq!(report.attempted, 4);
    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed, 1);

    assert_eq!(
        sender.recipients().await,
        vec!["a@example.com", "c@example.com", "d@example.com"]
    );

    notifier.shutdown().await;
}

#[tokio::test]
async fn test_consecutive_transitions_produce_fresh_reports() {
    let directory = Arc::new(MemoryDirectory::new());
    directory.add("a@example.com").await.unwrap();

    let sender = Arc::new(RecordingSender::default());
    let (transition_tx, transition_rx) = broadcast::channel(16);

    let notifier = NotifierHandle::spawn(1200, directory.clone(), sender.clone(), transition_rx);

    transition_tx.send(alert_event(1500)).unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    // a second subscriber appears between transitions
    directory.add("b@example.com").await.unwrap();

    transition_tx.send(alert_event(1600)).unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    // the fan-out fetched the directory afresh for the second event
    let report = notifier.last_report().await.unwrap();
    assert_eq!(report.attempted, 2);
    assert_eq!(sender.sent.lock().await.len(), 3);

    notifier.shutdown().await;
}
