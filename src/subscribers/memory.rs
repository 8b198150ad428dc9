//! In-memory subscriber directory (no persistence)
//!
//! Useful for tests and for deployments where the recipient set is managed
//! elsewhere and seeded at startup. All records are lost on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DirectoryError, DirectoryResult, Subscriber, SubscriberDirectory};

/// In-memory directory backend
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    entries: RwLock<Vec<Subscriber>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberDirectory for MemoryDirectory {
    async fn list_active(&self) -> DirectoryResult<Vec<Subscriber>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|subscriber| subscriber.active)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> DirectoryResult<Vec<Subscriber>> {
        Ok(self.entries.read().await.clone())
    }

    async fn add(&self, email: &str) -> DirectoryResult<Subscriber> {
        let mut entries = self.entries.write().await;

        if entries.iter().any(|subscriber| subscriber.email == email) {
            return Err(DirectoryError::AlreadySubscribed(email.to_string()));
        }

        let subscriber = Subscriber::new(email);
        entries.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn remove(&self, email: &str) -> DirectoryResult<()> {
        let mut entries = self.entries.write().await;

        let Some(position) = entries
            .iter()
            .position(|subscriber| subscriber.email == email)
        else {
            return Err(DirectoryError::NotFound(email.to_string()));
        };

        entries.remove(position);
        Ok(())
    }
}
