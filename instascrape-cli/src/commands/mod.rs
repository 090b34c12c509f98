//! CLI command implementations.
//!
//! Every command builds its client through [`connect`], which reads the
//! config file, resolves credentials and wires the file-backed session
//! cache into the client.

pub mod account;
pub mod comments;
pub mod location;
pub mod login;
pub mod logout;
pub mod media;
pub mod medias;
pub mod search;
pub mod status;
pub mod tag;

use std::sync::Arc;

use anyhow::{Context, Result};
use instascrape_fetch::{
    Credentials, Endpoints, HttpTransport, InstaClient, RetryPolicy, SessionState,
    DEFAULT_USER_AGENT,
};
use instascrape_store::{keychain, Config, FileSessionCache};
use serde::Serialize;
use tracing::{debug, warn};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Environment variable holding the account name.
pub const USERNAME_ENV: &str = "INSTASCRAPE_USERNAME";

/// Environment variable holding the password.
pub const PASSWORD_ENV: &str = "INSTASCRAPE_PASSWORD";

// ============================================================================
// Client Setup
// ============================================================================

/// Loads the config file named by `--config`, or the default one.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().context("loading config")?,
    };
    Ok(config)
}

/// Resolves the account name: flag, environment, then config file.
pub fn resolve_username(cli: &Cli, config: &Config) -> Option<String> {
    cli.username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
        .or_else(|| config.username.clone())
        .filter(|name| !name.is_empty())
}

/// Resolves credentials: flags, environment, then the keychain for the
/// password.
pub fn resolve_credentials(cli: &Cli, config: &Config) -> Option<Credentials> {
    let username = resolve_username(cli, config)?;
    let password = cli
        .password
        .clone()
        .or_else(|| std::env::var(PASSWORD_ENV).ok())
        .or_else(|| keychain::get_password(&username))?;
    Some(Credentials::new(username, password))
}

/// Builds a client from `config`.
pub fn build_client(config: &Config, credentials: Option<Credentials>) -> Result<InstaClient> {
    let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    let transport = HttpTransport::with_settings(config.timeout(), user_agent)?
        .with_allowed_domains(config.request_domains()?);

    let mut builder = InstaClient::builder()
        .transport(Arc::new(transport))
        .retry_policy(RetryPolicy::new(config.retry_attempts))
        .endpoints(Endpoints::new(&config.base_url)?)
        .session_cache(Arc::new(FileSessionCache::new(config.session_dir())));
    if let Some(credentials) = credentials {
        debug!(username = %credentials.username(), "Using credentials");
        builder = builder.credentials(credentials);
    }

    Ok(builder.build()?)
}

/// Loads config and credentials and builds the client in one step.
pub fn connect(cli: &Cli) -> Result<InstaClient> {
    let config = load_config(cli)?;
    let credentials = resolve_credentials(cli, &config);
    build_client(&config, credentials)
}

/// Persists the session if the command ended up logged in.
///
/// Failing to write the session file does not fail the command.
pub async fn persist_session(client: &InstaClient) {
    if client.session_state() != SessionState::Authenticated {
        return;
    }
    if let Err(e) = client.save_session().await {
        warn!(error = %e, "Failed to save session");
    }
}

// ============================================================================
// Output
// ============================================================================

/// Prints `data` as JSON, or the text rendering otherwise.
pub fn emit<T: Serialize>(cli: &Cli, data: &T, text: impl FnOnce() -> String) -> Result<()> {
    match cli.format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(data)?);
        }
    }
    Ok(())
}

/// Text formatter honoring `--no-color`.
pub fn text_formatter(cli: &Cli) -> TextFormatter {
    TextFormatter::new(!cli.no_color)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_for_custom_base_url() {
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        assert_eq!(config.request_domains().unwrap(), vec!["127.0.0.1".to_string()]);
        assert!(build_client(&config, None).is_ok());
    }

    #[test]
    fn test_client_rejects_unparseable_base_url() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(build_client(&config, None).is_err());
    }
}
