//! Message types for actor communication
//!
//! This module defines all message types used for communication between actors.
//!
//! ## Design Principles
//!
//! 1. **Commands**: Request/response messages sent to specific actors via mpsc
//! 2. **Events**: Broadcast notifications published to multiple subscribers
//! 3. **Immutability**: All messages are cloneable for multi-subscriber patterns

use tokio::sync::oneshot;

use crate::{GasReading, ReadingStatus};

/// Event published when the cached status flips between NORMAL and ALERT.
///
/// Emitted by the DetectorActor exactly once per flip and consumed by the
/// NotifierActor. Ephemeral: not stored anywhere, a lagging subscriber
/// simply misses it.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    /// Status recorded in the cache before this reading
    pub from: ReadingStatus,

    /// Status computed for this reading
    pub to: ReadingStatus,

    /// The reading that caused the flip
    pub reading: GasReading,
}

impl TransitionEvent {
    /// Whether this is the alert direction (NORMAL -> ALERT).
    pub fn is_alert(&self) -> bool {
        self.to == ReadingStatus::Alert
    }
}

/// Commands that can be sent to the DetectorActor
#[derive(Debug)]
pub enum DetectorCommand {
    /// Gracefully shut down the detector
    ///
    /// The actor finishes the message in flight and then exits.
    Shutdown,
}

/// Commands that can be sent to the NotifierActor
#[derive(Debug)]
pub enum NotifierCommand {
    /// Get the result of the most recent fan-out
    LastReport {
        respond_to: oneshot::Sender<Option<FanoutReport>>,
    },

    /// Gracefully shut down the notifier
    Shutdown,
}

/// Aggregate result of one notification fan-out.
///
/// Per-recipient failures are isolated and logged; this report is what the
/// rest of the system sees of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutReport {
    /// Number of recipients a delivery was attempted for
    pub attempted: usize,

    /// Number of attempts that succeeded
    pub delivered: usize,

    /// Number of attempts that failed
    pub failed: usize,
}
