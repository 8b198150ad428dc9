pub mod actors;
pub mod api;
pub mod commands;
pub mod config;
pub mod notify;
pub mod publisher;
pub mod reading;
pub mod subscribers;
pub mod threshold;
pub mod transport;
pub mod util;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the most recent sensor reading.
///
/// A single instance of this lives in the [`reading::ReadingStore`] and is
/// replaced wholesale on every decoded telemetry message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasReading {
    /// Raw sensor value as published on the value topic.
    pub value: i64,

    /// Alert state relative to the configured threshold.
    pub status: ReadingStatus,

    /// When the hub decoded the reading.
    pub observed_at: DateTime<Utc>,
}

impl Default for GasReading {
    fn default() -> Self {
        Self {
            value: 0,
            status: ReadingStatus::Normal,
            observed_at: Utc::now(),
        }
    }
}

/// Alert state of a reading relative to the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    #[serde(rename = "NORMAL")]
    Normal,

    #[serde(rename = "ALERT")]
    Alert,
}

impl ReadingStatus {
    /// Get the string representation (matches the serde format).
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Normal => "NORMAL",
            ReadingStatus::Alert => "ALERT",
        }
    }

    /// Parse a raw token from the device status topic.
    ///
    /// The deployed firmware publishes `GAS_DETECTED` for the alert state,
    /// so that token is accepted alongside the canonical names.
    pub fn from_device_token(token: &str) -> Option<Self> {
        match token {
            "NORMAL" => Some(ReadingStatus::Normal),
            "ALERT" | "GAS_DETECTED" => Some(ReadingStatus::Alert),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
