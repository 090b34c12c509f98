//! Media command - show one post by shortcode, numeric id or URL.

use anyhow::Result;
use clap::{ArgGroup, Args};

use super::{connect, emit, persist_session, text_formatter};
use crate::Cli;

/// Arguments for the media command.
#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["code", "id", "url"])))]
pub struct MediaArgs {
    /// Shortcode (the part after /p/ in a post link).
    #[arg(long)]
    pub code: Option<String>,

    /// Numeric media id.
    #[arg(long)]
    pub id: Option<String>,

    /// Full post URL.
    #[arg(long)]
    pub url: Option<String>,
}

/// Runs the media command.
pub async fn run(args: &MediaArgs, cli: &Cli) -> Result<()> {
    let client = connect(cli)?;

    let media = if let Some(code) = &args.code {
        client.get_media_by_code(code).await?
    } else if let Some(id) = &args.id {
        client.get_media_by_id(id).await?
    } else if let Some(url) = &args.url {
        client.get_media_by_url(url).await?
    } else {
        anyhow::bail!("Provide --code, --id or --url");
    };
    persist_session(&client).await;

    emit(cli, &media, || text_formatter(cli).format_media(&media))
}
