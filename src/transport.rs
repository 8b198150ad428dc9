//! MQTT transport connector
//!
//! Owns the broker session: connect with TLS and credentials, subscribe,
//! reconnect with a fixed backoff, publish. The connector has no domain
//! knowledge - it forwards raw payloads to registered per-topic queues and
//! exposes its connection state for health reporting.
//!
//! ## Connection State Machine
//!
//! ```text
//! DISCONNECTED --spawn--> CONNECTING --connack--> CONNECTED
//!       ^                     ^                       |
//!       |                     | backoff elapsed       | error / close
//!       |                     +---- RECONNECTING <----+
//!       +--(process exit only)
//! ```
//!
//! Transport errors are never fatal: the loop logs, waits the fixed
//! reconnect interval and polls again. Subscriptions are re-issued on every
//! CONNACK so a reconnect transparently resumes delivery.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, Transport};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, trace, warn};

use crate::config::MqttConfig;

/// Observable state of the broker session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionState {
    /// Get the string representation (lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw message delivered from the broker.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Registration of an inbound queue for a topic filter.
///
/// Multiple routes may share one sender; messages are forwarded with
/// `send().await`, so dispatch stays sequential and slow consumers apply
/// backpressure to the transport instead of racing each other.
#[derive(Debug, Clone)]
pub struct TopicRoute {
    pub filter: String,
    pub sender: mpsc::Sender<InboundMessage>,
}

/// Outbound publish capability.
///
/// The transport handle implements this against the real broker; tests
/// substitute a recording sink so the command channel needs no broker.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Fire-and-forget publish. No delivery acknowledgment is surfaced to
    /// the caller; the chosen QoS is the transport's concern.
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: QoS) -> anyhow::Result<()>;
}

/// Actor that owns the MQTT event loop.
pub struct MqttConnector {
    client: AsyncClient,
    eventloop: EventLoop,
    routes: Vec<TopicRoute>,
    state_tx: watch::Sender<ConnectionState>,
    reconnect_interval: Duration,
}

impl MqttConnector {
    /// Build the session and spawn the event-loop task.
    ///
    /// The returned handle can be cloned freely; publishing and state
    /// observation go through it while the connector task drives the
    /// session in the background.
    pub fn spawn(config: &MqttConfig, routes: Vec<TopicRoute>) -> TransportHandle {
        let mut options =
            MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username.clone(), password.clone());
        }

        if config.tls {
            options.set_transport(Transport::tls_with_default_config());
        }

        let (client, eventloop) = AsyncClient::new(options, 64);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        let connector = MqttConnector {
            client: client.clone(),
            eventloop,
            routes,
            state_tx,
            reconnect_interval: Duration::from_secs(config.reconnect_interval_secs),
        };

        tokio::spawn(connector.run());

        TransportHandle { client, state_rx }
    }

    /// Drive the session until the process exits.
    ///
    /// Errors are logged, never propagated - the connector retries
    /// indefinitely with the fixed reconnect interval.
    #[instrument(skip(self))]
    async fn run(mut self) {
        self.state_tx.send_replace(ConnectionState::Connecting);

        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("connected to broker");
                    self.state_tx.send_replace(ConnectionState::Connected);
                    Self::resubscribe(&self.client, &self.routes).await;
                }

                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    trace!("message on {}", publish.topic);
                    Self::dispatch(&self.routes, publish.topic, publish.payload.to_vec())
                        .await;
                }

                Ok(Event::Incoming(Packet::Disconnect)) => {
                    warn!("broker closed the session");
                    self.state_tx.send_replace(ConnectionState::Reconnecting);
                }

                Ok(_) => {}

                Err(e) => {
                    warn!(
                        "transport error: {e}; retrying in {:?}",
                        self.reconnect_interval
                    );
                    self.state_tx.send_replace(ConnectionState::Reconnecting);
                    tokio::time::sleep(self.reconnect_interval).await;
                    self.state_tx.send_replace(ConnectionState::Connecting);
                }
            }
        }
    }

    /// (Re)issue subscriptions for every registered route.
    ///
    /// Telemetry subscriptions use QoS 0: readings are continuously
    /// refreshed, so best-effort delivery is acceptable on this side.
    async fn resubscribe(client: &AsyncClient, routes: &[TopicRoute]) {
        for route in routes {
            match client.subscribe(route.filter.clone(), QoS::AtMostOnce).await {
                Ok(()) => debug!("subscribed to {}", route.filter),
                Err(e) => warn!("failed to subscribe to {}: {e}", route.filter),
            }
        }
    }

    /// Hand the message to every matching route, in registration order.
    async fn dispatch(routes: &[TopicRoute], topic: String, payload: Vec<u8>) {
        for route in routes {
            if topic_matches(&route.filter, &topic) {
                let message = InboundMessage {
                    topic: topic.clone(),
                    payload: payload.clone(),
                };

                if route.sender.send(message).await.is_err() {
                    warn!(
                        "inbound queue for {} is closed, dropping message",
                        route.filter
                    );
                }
            }
        }
    }
}

/// Handle for the spawned connector.
#[derive(Clone)]
pub struct TransportHandle {
    client: AsyncClient,
    state_rx: watch::Receiver<ConnectionState>,
}

impl TransportHandle {
    /// Current state of the broker session.
    pub fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch receiver for observing state transitions.
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }
}

#[async_trait]
impl MessageSink for TransportHandle {
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: QoS) -> anyhow::Result<()> {
        self.client
            .publish(topic, qos, false, payload)
            .await
            .context("failed to enqueue publish")
    }
}

/// Match a topic name against an MQTT filter (`+` single level, `#` tail).
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut filter_parts = filter.split('/');
    let mut topic_parts = topic.split('/');

    loop {
        match (filter_parts.next(), topic_parts.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(expected), Some(actual)) if expected == actual => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
