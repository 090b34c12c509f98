//! Session cache seam.
//!
//! The session manager stores one [`Session`] per username through this
//! trait. Implementations decide where it lives; `set` may stage the value
//! until `save` is called.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cookies::Session;
use crate::error::ScrapeError;

/// Key-value store for sessions, keyed by username.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Loads the session stored for `key`.
    async fn get(&self, key: &str) -> Result<Option<Session>, ScrapeError>;

    /// Stores `session` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, session: &Session) -> Result<(), ScrapeError>;

    /// Makes every `set` since the last save durable.
    async fn save(&self) -> Result<(), ScrapeError>;
}

/// Process-local cache. `save` is a no-op.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entries: RwLock<HashMap<String, Session>>,
}

impl MemorySessionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn get(&self, key: &str) -> Result<Option<Session>, ScrapeError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, session: &Session) -> Result<(), ScrapeError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), session.clone());
        Ok(())
    }

    async fn save(&self) -> Result<(), ScrapeError> {
        Ok(())
    }
}
