// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! instascrape CLI - read Instagram profiles, media, tags and comments from
//! the command line.
//!
//! # Examples
//!
//! ```bash
//! # Profile of an account
//! instascrape account natgeo
//!
//! # The 40 newest posts for a hashtag, as JSON
//! instascrape tag sunset --count 40 --format json --pretty
//!
//! # One page of an account's media, resumable with --max-id
//! instascrape medias natgeo --page
//!
//! # Comments on a post
//! instascrape comments --code BxYz123 --count 500
//!
//! # Log in and store the session for later runs
//! instascrape --username jane login --save-password
//!
//! # Forget it again
//! instascrape --username jane logout
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use instascrape_fetch::{HttpError, ScrapeError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    account, comments, location, login, logout, media, medias, search, status, tag,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// instascrape CLI - Instagram web API client.
#[derive(Parser)]
#[command(name = "instascrape")]
#[command(about = "Instagram web API client")]
#[command(long_about = r#"
instascrape reads public Instagram data through the web API, logging in
when credentials are available and reusing the stored session.

Credentials are taken from --username/--password, then the
INSTASCRAPE_USERNAME / INSTASCRAPE_PASSWORD environment variables,
then the system keychain.

Examples:
  instascrape account natgeo            # Profile
  instascrape medias natgeo --count 20  # Newest posts
  instascrape tag sunset --top          # Top posts for a hashtag
  instascrape search coffee             # Accounts and hashtags
  instascrape status                    # Session status
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Account to log in as.
    #[arg(long, short, global = true)]
    pub username: Option<String>,

    /// Password for --username.
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show an account profile.
    #[command(visible_alias = "a")]
    Account(account::AccountArgs),

    /// Show a single post.
    Media(media::MediaArgs),

    /// List an account's posts.
    #[command(visible_alias = "m")]
    Medias(medias::MediasArgs),

    /// List posts for a hashtag.
    #[command(visible_alias = "t")]
    Tag(tag::TagArgs),

    /// List posts for a location.
    #[command(visible_alias = "l")]
    Location(location::LocationArgs),

    /// List comments on a post.
    #[command(visible_alias = "c")]
    Comments(comments::CommentsArgs),

    /// Search accounts and hashtags.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Log in and store the session.
    Login(login::LoginArgs),

    /// Remove the stored session and keychain password.
    Logout(logout::LogoutArgs),

    /// Show configuration and session status.
    Status,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Requested entity does not exist.
    NotFound = 2,
    /// Missing credentials or rejected login.
    AuthFailed = 3,
    /// Network failure or timeout after all retries.
    Network = 4,
    /// Bad command-line input.
    InvalidInput = 5,
}

impl ExitCode {
    /// Picks the exit code for an error returned by a command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        let Some(err) = err.downcast_ref::<ScrapeError>() else {
            return Self::Error;
        };
        match err {
            ScrapeError::NotFound(_) => Self::NotFound,
            ScrapeError::AuthConfig(_) | ScrapeError::AuthFailure { .. } | ScrapeError::NoSession => {
                Self::AuthFailed
            }
            ScrapeError::Transport(HttpError::InvalidUrl(_) | HttpError::DomainNotAllowed(_))
            | ScrapeError::InvalidArgument(_) => Self::InvalidInput,
            ScrapeError::Transport(_) => Self::Network,
            ScrapeError::Upstream { .. } | ScrapeError::Cache(_) => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("instascrape=debug,instascrape_fetch=debug,instascrape_store=debug,info")
    } else {
        EnvFilter::new("instascrape=warn,instascrape_fetch=warn,instascrape_store=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Account(args) => account::run(args, &cli).await,
        Commands::Media(args) => media::run(args, &cli).await,
        Commands::Medias(args) => medias::run(args, &cli).await,
        Commands::Tag(args) => tag::run(args, &cli).await,
        Commands::Location(args) => location::run(args, &cli).await,
        Commands::Comments(args) => comments::run(args, &cli).await,
        Commands::Search(args) => search::run(args, &cli).await,
        Commands::Login(args) => login::run(args, &cli).await,
        Commands::Logout(args) => logout::run(args, &cli).await,
        Commands::Status => status::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
