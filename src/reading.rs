//! Current-reading cache shared between the detector and the API.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{GasReading, ReadingStatus};

/// Single mutable snapshot of the latest telemetry reading.
///
/// The whole record is swapped on update, so concurrent readers never observe
/// a partially written reading. The detector actor is the only writer; the
/// API and tests read through [`ReadingStore::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    inner: Arc<RwLock<GasReading>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable copy of the current reading.
    pub async fn snapshot(&self) -> GasReading {
        self.inner.read().await.clone()
    }

    /// Atomically replace the snapshot.
    pub async fn replace(&self, reading: GasReading) {
        *self.inner.write().await = reading;
    }

    /// Advisory status overwrite from the raw device status topic.
    ///
    /// Leaves value and timestamp untouched and never produces a transition
    /// event; the next decoded value passes through threshold comparison as
    /// usual.
    pub async fn overwrite_status(&self, status: ReadingStatus) {
        self.inner.write().await.status = status;
    }
}
