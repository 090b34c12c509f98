//! Search command - find accounts and hashtags.

use anyhow::Result;
use clap::Args;
use instascrape_core::{Account, Tag};
use tracing::debug;

use super::{connect, emit, persist_session, text_formatter};
use crate::output::SearchOutput;
use crate::Cli;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search text.
    pub query: String,

    /// Only search accounts.
    #[arg(long, conflicts_with = "tags")]
    pub accounts: bool,

    /// Only search hashtags.
    #[arg(long)]
    pub tags: bool,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let client = connect(cli)?;
    let want_accounts = !args.tags;
    let want_tags = !args.accounts;

    // Both lookups hit the same endpoint; run them side by side.
    let (accounts, tags) = futures::join!(
        async {
            if want_accounts {
                client.search_accounts(&args.query).await.map(Some)
            } else {
                Ok(None)
            }
        },
        async {
            if want_tags {
                client.search_tags(&args.query).await.map(Some)
            } else {
                Ok(None)
            }
        },
    );
    let accounts: Option<Vec<Account>> = accounts?;
    let tags: Option<Vec<Tag>> = tags?;
    debug!(
        accounts = accounts.as_ref().map_or(0, Vec::len),
        tags = tags.as_ref().map_or(0, Vec::len),
        "Search finished"
    );
    persist_session(&client).await;

    let output = SearchOutput {
        query: &args.query,
        accounts: accounts.as_deref(),
        tags: tags.as_deref(),
    };
    emit(cli, &output, || {
        let formatter = text_formatter(cli);
        let mut sections = Vec::new();
        if let Some(accounts) = &accounts {
            sections.push(format!("{}\n{}", formatter.bold("Accounts"), formatter.format_accounts(accounts)));
        }
        if let Some(tags) = &tags {
            sections.push(format!("{}\n{}", formatter.bold("Hashtags"), formatter.format_tags(tags)));
        }
        sections.join("\n\n")
    })
}
