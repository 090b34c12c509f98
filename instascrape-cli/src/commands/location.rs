//! Location command - list posts for a location, or show the location.

use anyhow::Result;
use clap::Args;

use super::{connect, emit, persist_session, text_formatter};
use crate::output::list;
use crate::Cli;

/// Arguments for the location command.
#[derive(Args)]
pub struct LocationArgs {
    /// Numeric location id.
    pub id: String,

    /// How many posts to collect.
    #[arg(long, short = 'n', default_value = "20")]
    pub count: usize,

    /// Show the top posts instead of the newest.
    #[arg(long, conflicts_with = "info")]
    pub top: bool,

    /// Show the location itself instead of its posts.
    #[arg(long)]
    pub info: bool,

    /// Resume from this cursor.
    #[arg(long, default_value = "")]
    pub max_id: String,
}

/// Runs the location command.
pub async fn run(args: &LocationArgs, cli: &Cli) -> Result<()> {
    let client = connect(cli)?;

    if args.info {
        let location = client.get_location_by_id(&args.id).await?;
        persist_session(&client).await;
        return emit(cli, &location, || text_formatter(cli).format_location(&location));
    }

    let medias = if args.top {
        client.get_location_top_medias(&args.id).await?
    } else {
        client
            .get_medias_by_location(&args.id, args.count, &args.max_id)
            .await?
    };
    persist_session(&client).await;

    emit(cli, &list(&medias), || text_formatter(cli).format_media_list(&medias))
}
