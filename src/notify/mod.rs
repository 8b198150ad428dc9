//! Notification delivery
//!
//! The fan-out talks to a [`NotificationSender`] trait object so the delivery
//! mechanism stays swappable: SMTP email ([`email::EmailSender`]) and JSON
//! webhooks ([`webhook::WebhookSender`]) are provided.

pub mod email;
pub mod webhook;

pub use email::{EmailConfig, EmailSender};
pub use webhook::WebhookSender;

use std::fmt;

use async_trait::async_trait;

use crate::GasReading;

/// Result type alias for notification delivery
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors that can occur while delivering a notification
#[derive(Debug)]
pub enum NotifyError {
    /// The recipient or sender address could not be parsed
    Address(String),

    /// The message could not be assembled
    Build(String),

    /// Transport-level failure (SMTP connection, authentication, ...)
    Transport(String),

    /// The webhook endpoint rejected the request
    Http(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Address(msg) => write!(f, "invalid notification address: {}", msg),
            NotifyError::Build(msg) => write!(f, "failed to build notification: {}", msg),
            NotifyError::Transport(msg) => write!(f, "notification transport error: {}", msg),
            NotifyError::Http(msg) => write!(f, "webhook delivery failed: {}", msg),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<lettre::address::AddressError> for NotifyError {
    fn from(err: lettre::address::AddressError) -> Self {
        NotifyError::Address(err.to_string())
    }
}

impl From<lettre::error::Error> for NotifyError {
    fn from(err: lettre::error::Error) -> Self {
        NotifyError::Build(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        NotifyError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err.to_string())
    }
}

/// A rendered notification, ready for any sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Copy for the NORMAL -> ALERT transition.
    pub fn alert(reading: &GasReading, threshold: i64) -> Self {
        Self {
            subject: "GAS LEAKAGE ALERT - IMMEDIATE ACTION REQUIRED".to_string(),
            body: format!(
                "GAS LEAKAGE DETECTED! Current value: {} (threshold: {}). \
                 Please check the system immediately.",
                reading.value, threshold
            ),
        }
    }

    /// Copy for the ALERT -> NORMAL transition.
    pub fn all_clear(reading: &GasReading, threshold: i64) -> Self {
        Self {
            subject: "Gas level back to normal".to_string(),
            body: format!(
                "Gas level returned to normal: {} (threshold: {}).",
                reading.value, threshold
            ),
        }
    }

    /// Copy for a fresh subscription.
    pub fn welcome() -> Self {
        Self {
            subject: "Welcome to the gas leakage alert list".to_string(),
            body: "Thank you for subscribing. You will receive a notification \
                   whenever a gas leakage is detected and when the level \
                   returns to normal."
                .to_string(),
        }
    }
}

/// Trait for notification delivery mechanisms
///
/// Implementations must be `Send + Sync`; the fan-out shares one sender
/// across concurrent per-recipient attempts.
///
/// A send either fully succeeds or fails for that one recipient; the caller
/// decides what a failure means (the fan-out logs and carries on).
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, recipient: &str, notification: &Notification) -> NotifyResult<()>;
}
