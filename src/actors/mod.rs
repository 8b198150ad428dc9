//! Actor-based telemetry core
//!
//! This module implements the stateful heart of the hub as actors. Each actor
//! runs as an independent async task communicating via Tokio channels.
//!
//! ## Architecture Overview
//!
//! ```text
//!                  ┌─────────────────────┐
//!                  │   MqttConnector     │
//!                  │  (transport task)   │
//!                  └──────────┬──────────┘
//!                             │ mpsc (single queue, both telemetry topics)
//!                  ┌──────────▼──────────┐
//!                  │   DetectorActor     │──── replaces ───▶ ReadingStore
//!                  └──────────┬──────────┘
//!                             │ broadcast (TransitionEvent)
//!                  ┌──────────▼──────────┐
//!                  │   NotifierActor     │──── send() ────▶ subscribers
//!                  └─────────────────────┘
//! ```
//!
//! ## Actor Types
//!
//! - **DetectorActor**: decodes telemetry, updates the reading cache and
//!   emits a transition event exactly once per status flip
//! - **NotifierActor**: fans transition events out to the subscriber set,
//!   one independent delivery attempt per recipient
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: Each actor has an mpsc command channel for control messages
//! 2. **Events**: Transitions are published to a broadcast channel for fan-out
//! 3. **Request/Response**: oneshot channels for synchronous queries
//!
//! All decoded-message handling funnels through the detector's single mpsc
//! queue. That queue is the serialization point: "read previous status ->
//! update cache -> decide to emit" can never interleave between two messages,
//! which is what rules out double-fired alerts.

pub mod detector;
pub mod messages;
pub mod notifier;
