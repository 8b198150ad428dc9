//! JSON-file subscriber directory
//!
//! Stores the subscriber list as a pretty-printed JSON array on disk, the
//! same format the deployed installations already carry. The file is read
//! once on open and rewritten after every mutation; the in-memory copy is
//! the source of truth in between.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DirectoryError, DirectoryResult, Subscriber, SubscriberDirectory};

/// File-backed directory backend
#[derive(Debug)]
pub struct JsonFileDirectory {
    path: PathBuf,
    entries: RwLock<Vec<Subscriber>>,
}

impl JsonFileDirectory {
    /// Open the directory, creating an empty one if the file is missing.
    pub async fn open(path: impl Into<PathBuf>) -> DirectoryResult<Self> {
        let path = path.into();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no subscribers file at {}, starting empty", path.display());
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &[Subscriber]) -> DirectoryResult<()> {
        let contents = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl SubscriberDirectory for JsonFileDirectory {
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
        self.persist(&entries).await?;

        debug!("added subscriber {email}");
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
        self.persist(&entries).await?;

        debug!("removed subscriber {email}");
        Ok(())
    }
}
