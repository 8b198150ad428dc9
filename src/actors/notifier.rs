//! NotifierActor - fans transition events out to subscribers
//!
//! One delivery attempt per active subscriber, all attempts concurrent, each
//! succeeding or failing on its own. A failed recipient is logged and never
//! blocks the rest of the set; the fan-out itself does not retry (retry
//! policy, if any, belongs to the sender implementation).
//!
//! The actor runs on its own task and consumes a broadcast subscription, so
//! a slow SMTP server delays at most the next *transition*, never the next
//! telemetry message.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, instrument, trace, warn};

use crate::notify::{Notification, NotificationSender};
use crate::subscribers::SubscriberDirectory;

use super::messages::{FanoutReport, NotifierCommand, TransitionEvent};

/// Actor that distributes alert and all-clear notifications
pub struct NotifierActor {
    /// Threshold, repeated in the notification copy
    threshold: i64,

    /// Source of the current recipient set
    directory: Arc<dyn SubscriberDirectory>,

    /// Delivery mechanism (email, webhook, ...)
    sender: Arc<dyn NotificationSender>,

    /// Transition event receiver (broadcast subscription)
    transition_rx: broadcast::Receiver<TransitionEvent>,

    /// Command receiver
    command_rx: mpsc::Receiver<NotifierCommand>,

    /// Result of the most recent fan-out, for observability
    last_report: Option<FanoutReport>,
}

impl NotifierActor {
    pub fn new(
        threshold: i64,
        directory: Arc<dyn SubscriberDirectory>,
        sender: Arc<dyn NotificationSender>,
        transition_rx: broadcast::Receiver<TransitionEvent>,
        command_rx: mpsc::Receiver<NotifierCommand>,
    ) -> Self {
        Self {
            threshold,
            directory,
            sender,
            transition_rx,
            command_rx,
            last_report: None,
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting notifier actor");

        loop {
            tokio::select! {
                result = self.transition_rx.recv() => {
                    match result {
                        Ok(event) => self.handle_transition(event).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("notifier lagged, skipped {skipped} transition events");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            warn!("transition channel closed, shutting down");
                            break;
                        }
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        NotifierCommand::LastReport { respond_to } => {
                            let _ = respond_to.send(self.last_report);
                        }

                        NotifierCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("notifier actor stopped");
    }

    #[instrument(skip(self, event), fields(to = %event.to))]
    async fn handle_transition(&mut self, event: TransitionEvent) {
        let notification = if event.is_alert() {
            Notification::alert(&event.reading, self.threshold)
        } else {
            Notification::all_clear(&event.reading, self.threshold)
        };

        let report = self.fan_out(&notification).await;

        debug!(
            "fan-out complete: {}/{} delivered ({} failed)",
            report.delivered, report.attempted, report.failed
        );

        self.last_report = Some(report);
    }

    /// One concurrent delivery attempt per active subscriber.
    ///
    /// An empty subscriber set is a successful no-op. A directory failure
    /// aborts this fan-out only; the actor keeps running.
    async fn fan_out(&self, notification: &Notification) -> FanoutReport {
        let subscribers = match self.directory.list_active().await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                error!("failed to fetch subscribers: {e}");
                return FanoutReport::default();
            }
        };

        if subscribers.is_empty() {
            trace!("no active subscribers, nothing to deliver");
            return FanoutReport::default();
        }

        let attempts = subscribers.iter().map(|subscriber| {
            let sender = self.sender.clone();
            async move {
                match sender.send(&subscriber.email, notification).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!("failed to notify {}: {e}", subscriber.email);
                        false
                    }
                }
            }
        });

        let results = join_all(attempts).await;
        let delivered = results.iter().filter(|delivered| **delivered).count();

        FanoutReport {
            attempted: results.len(),
            delivered,
            failed: results.len() - delivered,
        }
    }
}

/// Handle for controlling the NotifierActor
#[derive(Clone)]
pub struct NotifierHandle {
    sender: mpsc::Sender<NotifierCommand>,
}

impl NotifierHandle {
    /// Spawn a new notifier actor
    pub fn spawn(
        threshold: i64,
        directory: Arc<dyn SubscriberDirectory>,
        sender: Arc<dyn NotificationSender>,
        transition_rx: broadcast::Receiver<TransitionEvent>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = NotifierActor::new(threshold, directory, sender, transition_rx, cmd_rx);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Result of the most recent fan-out
    pub async fn last_report(&self) -> Option<FanoutReport> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(NotifierCommand::LastReport { respond_to: tx })
            .await
            .ok()?;

        rx.await.ok()?
    }

    /// Shutdown the notifier actor
    pub async fn shutdown(&self) {
        let _ = self.sender.send(NotifierCommand::Shutdown).await;
    }
}
