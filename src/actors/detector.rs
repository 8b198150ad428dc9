//! DetectorActor - decodes telemetry and edge-triggers transition events
//!
//! ## Why a single queue
//!
//! Cache mutation and event emission are not atomic as a pair. If two
//! telemetry messages were handled concurrently, both could observe the
//! pre-update status and both emit a transition, double-firing the fan-out.
//! The detector therefore consumes ONE mpsc queue that carries every inbound
//! telemetry message (value and status topics alike): one worker, strictly
//! in arrival order.
//!
//! ## Message Flow
//!
//! ```text
//! value topic   -> parse i64 -> threshold evaluation -> replace cache
//!                                       |
//!                                       └-> TransitionEvent (only on flip)
//! status topic  -> parse token -> overwrite cached status (never an event)
//! ```

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, instrument, trace, warn};

use crate::config::topics;
use crate::reading::ReadingStore;
use crate::threshold::ThresholdEvaluation;
use crate::transport::InboundMessage;
use crate::GasReading;

use super::messages::{DetectorCommand, TransitionEvent};

/// Actor that turns raw telemetry into cache updates and transition events
pub struct DetectorActor {
    /// Gas value above which a reading is in ALERT state
    threshold: i64,

    /// The authoritative current-reading snapshot
    store: ReadingStore,

    /// Inbound telemetry (both topics, sequential)
    telemetry_rx: mpsc::Receiver<InboundMessage>,

    /// Command receiver
    command_rx: mpsc::Receiver<DetectorCommand>,

    /// Broadcast sender for transition events
    transition_tx: broadcast::Sender<TransitionEvent>,
}

impl DetectorActor {
    pub fn new(
        threshold: i64,
        store: ReadingStore,
        telemetry_rx: mpsc::Receiver<InboundMessage>,
        command_rx: mpsc::Receiver<DetectorCommand>,
        transition_tx: broadcast::Sender<TransitionEvent>,
    ) -> Self {
        Self {
            threshold,
            store,
            telemetry_rx,
            command_rx,
            transition_tx,
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting detector actor");

        loop {
            tokio::select! {
                Some(message) = self.telemetry_rx.recv() => {
                    self.handle_message(message).await;
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        DetectorCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("channels closed, shutting down");
                    break;
                }
            }
        }

        debug!("detector actor stopped");
    }

    async fn handle_message(&mut self, message: InboundMessage) {
        match message.topic.as_str() {
            topics::GAS_VALUE => self.handle_value(&message.payload).await,
            topics::GAS_STATUS => self.handle_status(&message.payload).await,
            other => trace!("ignoring message on unrouted topic {other}"),
        }
    }

    /// Decode an integer reading, update the cache and emit a transition
    /// event when the status flips.
    ///
    /// Malformed payloads are discarded: the cache keeps its prior snapshot
    /// and no event is emitted.
    async fn handle_value(&mut self, payload: &[u8]) {
        let Some(value) = decode_value(payload) else {
            warn!(
                "discarding malformed telemetry payload: {:?}",
                String::from_utf8_lossy(payload)
            );
            return;
        };

        let previous = self.store.snapshot().await.status;
        let evaluation = ThresholdEvaluation::evaluate(value, self.threshold, previous);

        let reading = GasReading {
            value,
            status: evaluation.status(),
            observed_at: Utc::now(),
        };

        // the cache is replaced unconditionally, even in steady state
        self.store.replace(reading.clone()).await;

        trace!(
            "value {value} (threshold {}) -> {evaluation:?}",
            self.threshold
        );

        if !evaluation.is_transition() {
            return;
        }

        match evaluation {
            ThresholdEvaluation::RaisesAlert => {
                debug!("gas value {value} exceeded threshold {}", self.threshold);
            }
            ThresholdEvaluation::ClearsAlert => {
                debug!("gas value {value} back under threshold {}", self.threshold);
            }
            _ => {}
        }

        let event = TransitionEvent {
            from: previous,
            to: reading.status,
            reading,
        };

        // Note: We ignore send errors. It's OK if there are no subscribers
        // (e.g. no notification sender configured).
        if self.transition_tx.send(event).is_err() {
            trace!("no receivers for transition event");
        }
    }

    /// Advisory status overwrite from the raw device status topic.
    ///
    /// Bypasses threshold comparison and never generates a transition event.
    async fn handle_status(&mut self, payload: &[u8]) {
        let text = String::from_utf8_lossy(payload);

        let Some(status) = crate::ReadingStatus::from_device_token(text.trim()) else {
            warn!("discarding unknown device status {text:?}");
            return;
        };

        trace!("device status overwrite: {status}");
        self.store.overwrite_status(status).await;
    }
}

fn decode_value(payload: &[u8]) -> Option<i64> {
    std::str::from_utf8(payload).ok()?.trim().parse().ok()
}

/// Handle for controlling the DetectorActor
#[derive(Clone)]
pub struct DetectorHandle {
    sender: mpsc::Sender<DetectorCommand>,
}

impl DetectorHandle {
    /// Spawn a new detector actor
    ///
    /// # Arguments
    /// - `threshold`: gas value above which a reading is in ALERT state
    /// - `store`: the shared reading cache the detector writes to
    /// - `telemetry_rx`: the single inbound telemetry queue
    /// - `transition_tx`: broadcast sender for transition events
    pub fn spawn(
        threshold: i64,
        store: ReadingStore,
        telemetry_rx: mpsc::Receiver<InboundMessage>,
        transition_tx: broadcast::Sender<TransitionEvent>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = DetectorActor::new(threshold, store, telemetry_rx, cmd_rx, transition_tx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Shutdown the detector actor
    pub async fn shutdown(&self) {
        let _ = self.sender.send(DetectorCommand::Shutdown).await;
    }
}
