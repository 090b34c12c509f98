//! Tag command - list posts for a hashtag.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{connect, emit, persist_session, text_formatter};
use crate::output::list;
use crate::Cli;

/// Arguments for the tag command.
#[derive(Args)]
pub struct TagArgs {
    /// Hashtag, without the leading '#'.
    pub name: String,

    /// How many posts to collect.
    #[arg(long, short = 'n', default_value = "20")]
    pub count: usize,

    /// Show the top posts instead of the newest.
    #[arg(long, conflicts_with_all = ["page", "max_id"])]
    pub top: bool,

    /// Fetch one page only, starting at --max-id.
    #[arg(long)]
    pub page: bool,

    /// Resume from this cursor.
    #[arg(long, default_value = "")]
    pub max_id: String,
}

/// Runs the tag command.
pub async fn run(args: &TagArgs, cli: &Cli) -> Result<()> {
    let name = args.name.trim_start_matches('#');
    let client = connect(cli)?;

    if args.page {
        let page = client.get_paginated_medias_by_tag(name, &args.max_id).await?;
        info!(tag = %name, count = page.medias.len(), "Page loaded");
        persist_session(&client).await;
        return emit(cli, &page, || text_formatter(cli).format_media_page(&page));
    }

    let medias = if args.top {
        client.get_top_medias_by_tag(name).await?
    } else {
        client.get_medias_by_tag(name, args.count, &args.max_id).await?
    };
    info!(tag = %name, count = medias.len(), "Media loaded");
    persist_session(&client).await;

    emit(cli, &list(&medias), || text_formatter(cli).format_media_list(&medias))
}
