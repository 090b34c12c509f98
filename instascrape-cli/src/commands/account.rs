//! Account command - show a profile by username or numeric id.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{connect, emit, persist_session, text_formatter};
use crate::Cli;

/// Arguments for the account command.
#[derive(Args)]
pub struct AccountArgs {
    /// Username to look up.
    #[arg(value_name = "USERNAME", required_unless_present = "id", conflicts_with = "id")]
    pub name: Option<String>,

    /// Numeric account id instead of a username.
    #[arg(long)]
    pub id: Option<String>,
}

/// Runs the account command.
pub async fn run(args: &AccountArgs, cli: &Cli) -> Result<()> {
    let client = connect(cli)?;

    let account = match (&args.name, &args.id) {
        (_, Some(id)) => client.get_account_by_id(id).await?,
        (Some(name), None) => client.get_account(name).await?,
        (None, None) => anyhow::bail!("Provide a username or --id"),
    };
    info!(username = %account.username, "Account loaded");
    persist_session(&client).await;

    emit(cli, &account, || text_formatter(cli).format_account(&account))
}
