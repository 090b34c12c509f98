//! Login command - authenticate and store the session.

use anyhow::{Context, Result};
use clap::Args;
use instascrape_fetch::{ScrapeError, SessionState};
use instascrape_store::keychain;
use serde::Serialize;
use tracing::info;

use super::{build_client, emit, load_config, resolve_credentials};
use crate::Cli;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Log in again even if the stored session is still valid.
    #[arg(long)]
    pub force: bool,

    /// Store the password in the system keychain for later runs.
    #[arg(long)]
    pub save_password: bool,
}

/// Result of a login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginOutput {
    username: String,
    state: SessionState,
    session_saved: bool,
    password_saved: bool,
}

/// Runs the login command.
pub async fn run(args: &LoginArgs, cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let credentials = resolve_credentials(cli, &config).ok_or_else(|| {
        ScrapeError::AuthConfig("pass --username and --password, or set INSTASCRAPE_USERNAME".into())
    })?;
    let username = credentials.username().to_string();
    let password = credentials.password().to_string();

    let client = build_client(&config, Some(credentials))?;
    client.login(args.force).await?;
    client.save_session().await?;
    info!(username = %username, "Logged in");

    if args.save_password {
        keychain::store_password(&username, &password).context("storing password in keychain")?;
    }

    let output = LoginOutput {
        username,
        state: client.session_state(),
        session_saved: true,
        password_saved: args.save_password,
    };
    emit(cli, &output, || {
        let mut text = format!("Logged in as @{}", output.username);
        if output.password_saved {
            text.push_str("\nPassword stored in keychain");
        }
        text
    })
}
