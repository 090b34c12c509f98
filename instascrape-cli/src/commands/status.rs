//! Status command - show where things are stored and whether the stored
//! session still works.

use anyhow::Result;
use instascrape_fetch::SessionCache;
use instascrape_store::{keychain, Config, FileSessionCache};
use serde::Serialize;
use tracing::warn;

use super::{build_client, emit, load_config, resolve_username, text_formatter};
use crate::Cli;

/// Configuration and session status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    config_path: String,
    session_dir: String,
    base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    password_in_keychain: bool,
    session_cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_live: Option<bool>,
}

/// Runs the status command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let username = resolve_username(cli, &config);
    let cache = FileSessionCache::new(config.session_dir());

    let mut report = StatusReport {
        config_path: config_path.display().to_string(),
        session_dir: cache.dir().display().to_string(),
        base_url: config.base_url.clone(),
        username: username.clone(),
        password_in_keychain: false,
        session_cached: false,
        session_live: None,
    };

    if let Some(username) = &username {
        report.password_in_keychain = keychain::has_password(username);

        if let Some(session) = cache.get(username).await? {
            report.session_cached = true;
            // No credentials, so a dead session is reported rather than replaced.
            let client = build_client(&config, None)?;
            report.session_live = match client.is_logged_in(Some(&session)).await {
                Ok(live) => Some(live),
                Err(e) => {
                    warn!(error = %e, "Session check failed");
                    None
                }
            };
        }
    }

    emit(cli, &report, || format_report(cli, &report))
}

fn format_report(cli: &Cli, report: &StatusReport) -> String {
    let formatter = text_formatter(cli);
    let mut lines = vec![
        formatter.bold("instascrape status"),
        "─".repeat(40),
        format!("{:<16} {}", "Config file:", report.config_path),
        format!("{:<16} {}", "Session dir:", report.session_dir),
        format!("{:<16} {}", "Base URL:", report.base_url),
    ];

    match &report.username {
        Some(username) => {
            lines.push(format!("{:<16} @{username}", "Account:"));
            lines.push(formatter.format_flag("Keychain", report.password_in_keychain));
            lines.push(formatter.format_flag("Session stored", report.session_cached));
            if let Some(live) = report.session_live {
                lines.push(formatter.format_flag("Session live", live));
            }
        }
        None => lines.push(formatter.dim("No account configured; requests are anonymous")),
    }

    lines.join("\n")
}
