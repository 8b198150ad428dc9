//! API shared state

use std::sync::Arc;

use tokio::sync::watch;

use crate::notify::NotificationSender;
use crate::publisher::CommandPublisher;
use crate::reading::ReadingStore;
use crate::subscribers::SubscriberDirectory;
use crate::transport::ConnectionState;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// The current-reading snapshot
    pub reading: ReadingStore,

    /// Outbound command channel
    pub publisher: CommandPublisher,

    /// Subscriber lifecycle
    pub directory: Arc<dyn SubscriberDirectory>,

    /// Broker session state for health reporting
    pub connection: watch::Receiver<ConnectionState>,

    /// Welcome notifications on subscribe; None when no sender is configured
    pub sender: Option<Arc<dyn NotificationSender>>,
}

impl ApiState {
    pub fn new(
        reading: ReadingStore,
        publisher: CommandPublisher,
        directory: Arc<dyn SubscriberDirectory>,
        connection: watch::Receiver<ConnectionState>,
        sender: Option<Arc<dyn NotificationSender>>,
    ) -> Self {
        Self {
            reading,
            publisher,
            directory,
            connection,
            sender,
        }
    }
}
