//! Helper types for integration tests

use async_trait::async_trait;
use leakwatch::config::topics;
use leakwatch::notify::{Notification, NotificationSender, NotifyError, NotifyResult};
use leakwatch::transport::{InboundMessage, MessageSink};
use rumqttc::QoS;
use tokio::sync::Mutex;

/// Records notifications instead of delivering them; optionally fails for
/// one recipient to simulate a broken mailbox.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, Notification)>>,
    pub fail_for: Option<String>,
}

impl RecordingSender {
    pub fn failing_for(email: &str) -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail_for: Some(email.to_string()),
        }
    }

    pub async fn recipients(&self) -> Vec<String> {
        let mut recipients: Vec<_> = self
            .sent
            .lock()
            .await
            .iter()
            .map(|(email, _)| email.clone())
            .collect();
        recipients.sort();
        recipients
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, recipient: &str, notification: &Notification) -> NotifyResult<()> {
        if self.fail_for.as_deref() == Some(recipient) {
            return Err(NotifyError::Transport(
                "simulated delivery failure".to_string(),
            ));
        }

        self.sent
            .lock()
            .await
            .push((recipient.to_string(), notification.clone()));
        Ok(())
    }
}

/// Records publishes instead of talking to a broker.
#[derive(Default)]
pub struct RecordingSink {
    pub published: Mutex<Vec<(String, Vec<u8>, QoS)>>,
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: QoS) -> anyhow::Result<()> {
        self.published
            .lock()
            .await
            .push((topic.to_string(), payload, qos));
        Ok(())
    }
}

/// An inbound message on the gas value topic, as the transport would route it.
pub fn gas_value(payload: &str) -> InboundMessage {
    InboundMessage {
        topic: topics::GAS_VALUE.to_string(),
        payload: payload.as_bytes().to_vec(),
    }
}

/// An inbound message on the raw status topic.
pub fn gas_status(payload: &str) -> InboundMessage {
    InboundMessage {
        topic: topics::GAS_STATUS.to_string(),
        payload: payload.as_bytes().to_vec(),
    }
}
