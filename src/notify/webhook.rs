//! Webhook notification delivery
//!
//! Posts one JSON document per recipient to a configured endpoint. Useful
//! for chat bridges and automation that watch for alerts instead of mailing
//! people directly.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::config::Webhook;

use super::{Notification, NotificationSender, NotifyError, NotifyResult};

/// Sends notifications as JSON POSTs to a webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookSender {
    client: Client,
    config: Webhook,
}

impl WebhookSender {
    pub fn new(config: Webhook) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    async fn send(&self, recipient: &str, notification: &Notification) -> NotifyResult<()> {
        let payload = json!({
            "recipient": recipient,
            "subject": notification.subject,
            "message": notification.body,
            "timestamp": Utc::now().to_rfc3339(),
        });

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Http(format!(
                "webhook returned {}",
                response.status()
            )));
        }

        info!(to = recipient, "webhook notification sent");
        Ok(())
    }
}
