//! Medias command - list an account's posts.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{connect, emit, persist_session, text_formatter};
use crate::output::list;
use crate::Cli;

/// Arguments for the medias command.
#[derive(Args)]
pub struct MediasArgs {
    /// Account username.
    #[arg(value_name = "USERNAME")]
    pub account: String,

    /// How many posts to collect.
    #[arg(long, short = 'n', default_value = "20")]
    pub count: usize,

    /// Re-fetch every post by shortcode for complete details.
    #[arg(long, conflicts_with = "page")]
    pub full: bool,

    /// Fetch one page only, starting at --max-id.
    #[arg(long)]
    pub page: bool,

    /// Cursor returned by a previous --page run.
    #[arg(long, requires = "page")]
    pub max_id: Option<String>,
}

/// Runs the medias command.
pub async fn run(args: &MediasArgs, cli: &Cli) -> Result<()> {
    let client = connect(cli)?;

    if args.page {
        let page = client
            .get_paginated_medias(&args.account, args.max_id.as_deref().unwrap_or_default())
            .await?;
        info!(count = page.medias.len(), has_next = page.has_next_page, "Page loaded");
        persist_session(&client).await;
        return emit(cli, &page, || text_formatter(cli).format_media_page(&page));
    }

    let medias = if args.full {
        client.get_account_medias_full(&args.account, args.count).await?
    } else {
        client.get_account_medias(&args.account, args.count).await?
    };
    info!(count = medias.len(), "Media loaded");
    persist_session(&client).await;

    emit(cli, &list(&medias), || text_formatter(cli).format_media_list(&medias))
}
