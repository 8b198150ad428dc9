//! Subscriber directory
//!
//! Owns the recipient records the fan-out reads. The core only ever calls
//! [`SubscriberDirectory::list_active`]; the add/remove lifecycle is driven
//! by the HTTP API.

pub mod file;
pub mod memory;

pub use file::JsonFileDirectory;
pub use memory::MemoryDirectory;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result type alias for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors that can occur during directory operations
#[derive(Debug)]
pub enum DirectoryError {
    /// The email is already subscribed
    AlreadySubscribed(String),

    /// The email is not in the directory
    NotFound(String),

    /// I/O error (file access, etc.)
    IoError(std::io::Error),

    /// Subscriber serialization/deserialization error
    SerializationError(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::AlreadySubscribed(email) => {
                write!(f, "email already subscribed: {}", email)
            }
            DirectoryError::NotFound(email) => {
                write!(f, "email not found in subscribers: {}", email)
            }
            DirectoryError::IoError(err) => write!(f, "I/O error: {}", err),
            DirectoryError::SerializationError(msg) => {
                write!(f, "subscriber serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        DirectoryError::IoError(err)
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        DirectoryError::SerializationError(err.to_string())
    }
}

/// A notification recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Unique key
    pub email: String,

    /// Inactive subscribers are skipped by the fan-out
    #[serde(default = "default_active")]
    pub active: bool,

    pub subscribed_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Subscriber {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            active: true,
            subscribed_at: Utc::now(),
        }
    }
}

/// Trait for subscriber directory backends
///
/// Implementations must be `Send + Sync` as they are shared between the
/// notifier actor and the API handlers.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    /// Currently active recipients.
    ///
    /// An empty directory is not an error; the fan-out treats it as a
    /// successful no-op.
    async fn list_active(&self) -> DirectoryResult<Vec<Subscriber>>;

    /// Every known subscriber, active or not.
    async fn list_all(&self) -> DirectoryResult<Vec<Subscriber>>;

    /// Register a new subscriber.
    ///
    /// Rejects duplicates with [`DirectoryError::AlreadySubscribed`].
    async fn add(&self, email: &str) -> DirectoryResult<Subscriber>;

    /// Remove a subscriber.
    ///
    /// Rejects unknown emails with [`DirectoryError::NotFound`].
    async fn remove(&self, email: &str) -> DirectoryResult<()>;
}
