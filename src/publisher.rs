//! Outbound control-command publisher
//!
//! The one-way path back to the device: validate the operator's token
//! against the whitelist, publish it on the control topic and record it as
//! the advisory system status. No acknowledgment from the device is awaited;
//! the channel is deliberately optimistic.

use std::sync::Arc;

use rumqttc::QoS;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::commands::{CommandError, ControlCommand};
use crate::config::topics;
use crate::transport::MessageSink;

/// Validates operator commands and publishes them on the control topic.
#[derive(Clone)]
pub struct CommandPublisher {
    sink: Arc<dyn MessageSink>,

    /// Last command successfully published. Advisory only; disjoint from the
    /// reading cache, so command issuance never contends with telemetry.
    status: Arc<RwLock<ControlCommand>>,
}

impl CommandPublisher {
    /// The device boots in the ON state, so that is the initial status.
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            sink,
            status: Arc::new(RwLock::new(ControlCommand::On)),
        }
    }

    /// Validate and publish a command.
    ///
    /// Control publishes use QoS 1: losing an actuation command is a real
    /// failure, unlike a routine telemetry sample.
    #[instrument(skip(self))]
    pub async fn issue(&self, raw: &str) -> Result<ControlCommand, CommandError> {
        let command: ControlCommand = raw.parse()?;

        self.sink
            .publish(
                topics::CONTROL,
                command.as_str().as_bytes().to_vec(),
                QoS::AtLeastOnce,
            )
            .await
            .map_err(|e| CommandError::Publish(e.to_string()))?;

        *self.status.write().await = command;
        info!("published control command {command}");

        Ok(command)
    }

    /// Last command successfully published.
    pub async fn system_status(&self) -> ControlCommand {
        *self.status.read().await
    }
}
