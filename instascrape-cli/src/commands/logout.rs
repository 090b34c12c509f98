//! Logout command - forget the stored session and keychain password.

use anyhow::{Context, Result};
use clap::Args;
use instascrape_fetch::ScrapeError;
use instascrape_store::{keychain, FileSessionCache};
use serde::Serialize;
use tracing::info;

use super::{emit, load_config, resolve_username};
use crate::Cli;

/// Arguments for the logout command.
#[derive(Args)]
pub struct LogoutArgs {
    /// Keep the password in the system keychain.
    #[arg(long)]
    pub keep_password: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutOutput {
    username: String,
    session_removed: bool,
    password_removed: bool,
}

/// Runs the logout command.
pub async fn run(args: &LogoutArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let username = resolve_username(cli, &config).ok_or_else(|| {
        ScrapeError::AuthConfig("pass --username or set INSTASCRAPE_USERNAME".into())
    })?;

    let cache = FileSessionCache::new(config.session_dir());
    cache
        .remove(&username)
        .await
        .context("removing stored session")?;

    if !args.keep_password {
        keychain::delete_password(&username).context("removing password from keychain")?;
    }
    info!(username = %username, "Logged out");

    let output = LogoutOutput {
        username,
        session_removed: true,
        password_removed: !args.keep_password,
    };
    emit(cli, &output, || {
        let mut text = format!("Logged out @{}", output.username);
        if output.password_removed {
            text.push_str("\nPassword removed from keychain");
        }
        text
    })
}
