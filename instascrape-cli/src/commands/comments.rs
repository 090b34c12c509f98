//! Comments command - list comments on a post.

use anyhow::Result;
use clap::{ArgGroup, Args};
use tracing::info;

use super::{connect, emit, persist_session, text_formatter};
use crate::output::list;
use crate::Cli;

/// Arguments for the comments command.
#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["code", "id"])))]
pub struct CommentsArgs {
    /// Shortcode of the post.
    #[arg(long)]
    pub code: Option<String>,

    /// Numeric media id of the post.
    #[arg(long)]
    pub id: Option<String>,

    /// How many comments to collect.
    #[arg(long, short = 'n', default_value = "10")]
    pub count: usize,

    /// Start from this comment cursor.
    #[arg(long)]
    pub max_id: Option<String>,
}

/// Runs the comments command.
pub async fn run(args: &CommentsArgs, cli: &Cli) -> Result<()> {
    let client = connect(cli)?;
    let max_id = args.max_id.as_deref();

    let comments = if let Some(code) = &args.code {
        client.get_comments_by_code(code, args.count, max_id).await?
    } else if let Some(id) = &args.id {
        client.get_comments_by_id(id, args.count, max_id).await?
    } else {
        anyhow::bail!("Provide --code or --id");
    };
    info!(count = comments.len(), "Comments loaded");
    persist_session(&client).await;

    emit(cli, &list(&comments), || text_formatter(cli).format_comments(&comments))
}
