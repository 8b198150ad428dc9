//! Email notification delivery via SMTP
//!
//! Wraps the `lettre` async SMTP transport. Configuration comes from the
//! config file or from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be built.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType, transport::smtp::authentication::Credentials,
};
use tracing::info;

use super::{Notification, NotificationSender, NotifyResult};

/// Default SMTP port (STARTTLS)
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when none is configured
const DEFAULT_FROM_ADDRESS: &str = "noreply@leakwatch.local";

/// Configuration for the SMTP sender
#[derive(Debug, Clone, serde::Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname
    pub smtp_host: String,

    /// SMTP server port (defaults to 587)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// RFC 5322 "From" address
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Optional SMTP username
    pub smtp_user: Option<String>,

    /// Optional SMTP password
    pub smtp_password: Option<String>,
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_from_address() -> String {
    DEFAULT_FROM_ADDRESS.to_string()
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends notifications as plain-text emails over SMTP.
pub struct EmailSender {
    config: EmailConfig,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailSender {
    /// Build the STARTTLS transport for the configured relay.
    pub fn new(config: EmailConfig) -> NotifyResult<Self> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            mailer: builder.build(),
            config,
        })
    }
}

#[async_trait]
impl NotificationSender for EmailSender {
    async fn send(&self, recipient: &str, notification: &Notification) -> NotifyResult<()> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(recipient.parse()?)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())?;

        self.mailer.send(email).await?;

        info!(to = recipient, "notification email sent");
        Ok(())
    }
}
