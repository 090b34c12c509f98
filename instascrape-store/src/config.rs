//! Configuration management.

use crate::error::StoreError;
use crate::persistence::{default_config_path, default_session_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Client configuration, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where sessions are stored. Defaults to the platform cache directory.
    pub session_dir: Option<PathBuf>,
    /// Attempts per request for transport failures.
    pub retry_attempts: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent override.
    pub user_agent: Option<String>,
    /// Web API origin.
    pub base_url: String,
    /// Domains requests may go to, subdomains included. Empty means the
    /// domain of `base_url`.
    pub allowed_domains: Vec<String>,
    /// Account used when none is given on the command line.
    pub username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_dir: None,
            retry_attempts: instascrape_fetch::DEFAULT_MAX_ATTEMPTS,
            timeout_secs: 30,
            user_agent: None,
            base_url: instascrape_fetch::DEFAULT_BASE_URL.to_string(),
            allowed_domains: Vec::new(),
            username: None,
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path. A missing file yields
    /// defaults.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Rejects values the client cannot work with.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.retry_attempts == 0 {
            return Err(StoreError::Config("retry_attempts must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be at least 1".into()));
        }
        let host = self.base_host()?;
        if !self.allowed_domains.is_empty() && !covers(&self.allowed_domains, &host) {
            return Err(StoreError::Config(format!(
                "allowed_domains {:?} do not include base_url host {host}",
                self.allowed_domains
            )));
        }
        Ok(())
    }

    /// Domains the transport may contact: `allowed_domains`, or the
    /// `base_url` domain when that list is empty.
    pub fn request_domains(&self) -> Result<Vec<String>, StoreError> {
        if !self.allowed_domains.is_empty() {
            return Ok(self.allowed_domains.clone());
        }
        let host = self.base_host()?;
        let domain = host.strip_prefix("www.").unwrap_or(&host);
        Ok(vec![domain.to_string()])
    }

    fn base_host(&self) -> Result<String, StoreError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| StoreError::Config(format!("base_url {}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        url.host_str()
            .map(str::to_string)
            .ok_or_else(|| StoreError::Config(format!("base_url {} has no host", self.base_url)))
    }

    /// Session directory, falling back to the default.
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir.clone().unwrap_or_else(default_session_dir)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Same matching rule as the transport: exact host or any subdomain.
fn covers(domains: &[String], host: &str) -> bool {
    domains
        .iter()
        .any(|domain| host == domain || host.ends_with(&format!(".{domain}")))
}
