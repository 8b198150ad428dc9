use std::path::PathBuf;

use tracing::trace;

use crate::notify::EmailConfig;

/// Topics of the device protocol. Fixed strings, not configurable.
pub mod topics {
    /// Decimal gas value as text, device -> hub.
    pub const GAS_VALUE: &str = "LPG/gas/value";

    /// Raw device status text, device -> hub. Advisory only.
    pub const GAS_STATUS: &str = "LPG/gas/status";

    /// Whitelisted control tokens, hub -> device.
    pub const CONTROL: &str = "LPG/system/control";
}

/// Subscriber directory backend configuration
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DirectoryConfig {
    /// In-memory directory (no persistence)
    #[serde(rename = "memory")]
    Memory,

    /// JSON file on disk (default for most deployments)
    File {
        /// Path to the subscribers file
        #[serde(default = "default_subscribers_path")]
        path: PathBuf,
    },
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        DirectoryConfig::File {
            path: default_subscribers_path(),
        }
    }
}

fn default_subscribers_path() -> PathBuf {
    PathBuf::from("./subscribers.json")
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mqtt: MqttConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Notification channel (optional - alerts are only logged without one)
    pub notifications: Option<NotifyConfig>,

    /// Subscriber directory (optional - defaults to the JSON file backend)
    pub subscribers: Option<DirectoryConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MqttConfig {
    #[serde(default = "crate::util::get_mqtt_host")]
    pub host: String,
    #[serde(default = "crate::util::get_mqtt_port")]
    pub port: u16,
    #[serde(default = "crate::util::get_mqtt_user")]
    pub username: Option<String>,
    #[serde(default = "crate::util::get_mqtt_password")]
    pub password: Option<String>,
    #[serde(default = "crate::util::get_mqtt_client_id")]
    pub client_id: String,
    #[serde(default = "default_tls")]
    pub tls: bool,
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval_secs: u64,
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: crate::util::get_mqtt_host(),
            port: crate::util::get_mqtt_port(),
            username: crate::util::get_mqtt_user(),
            password: crate::util::get_mqtt_password(),
            client_id: crate::util::get_mqtt_client_id(),
            tls: default_tls(),
            reconnect_interval_secs: default_reconnect_interval(),
            keep_alive_secs: default_keep_alive(),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct TelemetryConfig {
    /// Gas value above which the reading is in ALERT state
    #[serde(default = "crate::util::get_threshold")]
    pub threshold: i64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            threshold: crate::util::get_threshold(),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyConfig {
    Email(EmailConfig),
    Webhook(Webhook),
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Webhook {
    pub url: String,
}

fn default_tls() -> bool {
    true
}

fn default_reconnect_interval() -> u64 {
    1
}

fn default_keep_alive() -> u64 {
    30
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
