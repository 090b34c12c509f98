//! File-backed session cache.
//!
//! One JSON file per username under a directory. `set` stages in memory;
//! `save` writes every staged entry atomically.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use instascrape_fetch::{ScrapeError, Session, SessionCache};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::persistence::{default_session_dir, load_json, save_json};

/// Session cache storing `<dir>/<username>.json`.
#[derive(Debug)]
pub struct FileSessionCache {
    dir: PathBuf,
    staged: Mutex<HashMap<String, Session>>,
}

impl FileSessionCache {
    /// Creates a cache rooted at `dir`. Nothing is touched until `save`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            staged: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a cache in the default session directory.
    pub fn in_default_dir() -> Self {
        Self::new(default_session_dir())
    }

    /// Directory holding the session files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a username's session is stored in.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    /// Deletes the stored session for `key`, staged or on disk.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.staged.lock().await.remove(key);
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, key: &str) -> Result<Option<Session>, StoreError> {
        if let Some(session) = self.staged.lock().await.get(key) {
            return Ok(Some(session.clone()));
        }

        let path = self.path_for(key);
        match load_json::<Session>(&path).await {
            Ok(session) => Ok(Some(session)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(StoreError::Serialization(e)) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let mut staged = self.staged.lock().await;
        for (key, session) in staged.iter() {
            save_json(&self.path_for(key), session).await?;
            debug!(key, "Session written");
        }
        staged.clear();
        Ok(())
    }
}

#[async_trait]
impl SessionCache for FileSessionCache {
    async fn get(&self, key: &str) -> Result<Option<Session>, ScrapeError> {
        Ok(self.read(key).await?)
    }

    async fn set(&self, key: &str, session: &Session) -> Result<(), ScrapeError> {
        self.staged
            .lock()
            .await
            .insert(key.to_string(), session.clone());
        Ok(())
    }

    async fn save(&self) -> Result<(), ScrapeError> {
        Ok(self.flush().await?)
    }
}

/// Maps a username onto a safe file stem.
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        format!("_{stem}")
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("jane.doe_1"), "jane.doe_1");
        assert_eq!(file_stem("../etc/passwd"), ".._etc_passwd");
        assert_eq!(file_stem(".."), "_..");
        assert_eq!(file_stem(""), "_");
    }
}
