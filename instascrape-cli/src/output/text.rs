//! Text output formatting with colors.

use chrono::{DateTime, Local, Utc};
use instascrape_core::{Account, Comment, Location, Media, Tag};
use instascrape_fetch::MediaPage;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Longest caption shown in list rows.
const CAPTION_PREVIEW: usize = 60;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Formats an account profile.
    pub fn format_account(&self, account: &Account) -> String {
        let mut lines = Vec::new();

        let mut header = self.bold(&format!("@{}", account.username));
        if account.is_verified {
            header.push(' ');
            header.push_str(&self.cyan("✓"));
        }
        if account.is_private {
            header.push(' ');
            header.push_str(&self.yellow("(private)"));
        }
        lines.push(header);

        if let Some(name) = account.full_name.as_deref().filter(|n| !n.is_empty()) {
            lines.push(name.to_string());
        }
        lines.push(self.dim(&format!("id {}", account.id)));

        lines.push(format!(
            "{} posts  {} followers  {} following",
            self.count(account.media_count),
            self.count(account.followed_by_count),
            self.count(account.follows_count)
        ));

        if let Some(bio) = account.biography.as_deref().filter(|b| !b.is_empty()) {
            lines.push(String::new());
            lines.push(bio.to_string());
        }
        if let Some(url) = &account.external_url {
            lines.push(self.cyan(url));
        }

        lines.join("\n")
    }

    /// Formats account search results, one per line.
    pub fn format_accounts(&self, accounts: &[Account]) -> String {
        if accounts.is_empty() {
            return self.dim("No accounts");
        }
        accounts
            .iter()
            .map(|a| {
                let name = a.full_name.as_deref().unwrap_or_default();
                let verified = if a.is_verified { self.cyan(" ✓") } else { String::new() };
                format!("{:<30} {}{}", format!("@{}", a.username), name, verified)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formats hashtag search results, one per line.
    pub fn format_tags(&self, tags: &[Tag]) -> String {
        if tags.is_empty() {
            return self.dim("No hashtags");
        }
        tags.iter()
            .map(|t| format!("{:<30} {} posts", format!("#{}", t.name), self.count(t.media_count)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Media
    // ========================================================================

    /// Formats a single post in full.
    pub fn format_media(&self, media: &Media) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            self.bold(&media.shortcode),
            self.dim(&format!("({}, id {})", media.kind, media.id))
        ));
        if let Some(owner) = &media.owner {
            let who = owner.username.as_deref().map_or_else(
                || format!("user {}", owner.id),
                |name| format!("@{name}"),
            );
            lines.push(format!("By:       {who}"));
        }
        if let Some(created_at) = media.created_at {
            lines.push(format!("Posted:   {}", format_time(created_at)));
        }
        if let Some(place) = &media.location_name {
            lines.push(format!("Location: {place}"));
        }
        lines.push(format!(
            "Likes:    {}   Comments: {}",
            self.count(media.likes_count),
            self.count(media.comments_count)
        ));
        if let Some(url) = media.video_url.as_ref().or(media.display_url.as_ref()) {
            lines.push(format!("URL:      {}", self.cyan(url)));
        }
        if let Some(caption) = media.caption.as_deref().filter(|c| !c.is_empty()) {
            lines.push(String::new());
            lines.push(caption.to_string());
        }

        lines.join("\n")
    }

    /// Formats a post as one list row.
    pub fn format_media_line(&self, media: &Media) -> String {
        let posted = media
            .created_at
            .map_or_else(|| "-".repeat(16), format_time);
        let caption = media
            .caption
            .as_deref()
            .map(|c| preview(c, CAPTION_PREVIEW))
            .unwrap_or_default();
        format!(
            "{:<12} {} {:>7} ♥  {}",
            self.bold(&media.shortcode),
            self.dim(&posted),
            self.count(media.likes_count),
            caption
        )
    }

    /// Formats a list of posts with a count footer.
    pub fn format_media_list(&self, medias: &[Media]) -> String {
        if medias.is_empty() {
            return self.dim("No posts");
        }
        let mut lines: Vec<String> = medias.iter().map(|m| self.format_media_line(m)).collect();
        lines.push(self.dim(&format!("{} posts", medias.len())));
        lines.join("\n")
    }

    /// Formats one page of posts and where to resume.
    pub fn format_media_page(&self, page: &MediaPage) -> String {
        let mut out = self.format_media_list(&page.medias);
        if let Some(total) = page.total {
            out.push_str(&format!("\n{}", self.dim(&format!("{total} in total"))));
        }
        if page.has_next_page {
            out.push_str(&format!("\nNext page: --max-id {}", self.green(&page.max_id)));
        } else {
            out.push_str(&format!("\n{}", self.dim("Last page")));
        }
        out
    }

    // ========================================================================
    // Comments / Locations
    // ========================================================================

    /// Formats comments, oldest first as returned.
    pub fn format_comments(&self, comments: &[Comment]) -> String {
        if comments.is_empty() {
            return self.dim("No comments");
        }
        let mut lines: Vec<String> = comments
            .iter()
            .map(|c| {
                let who = c
                    .owner
                    .as_ref()
                    .and_then(|o| o.username.as_deref())
                    .map_or_else(|| self.dim("unknown"), |name| self.bold(&format!("@{name}")));
                format!("{who}: {}", c.text)
            })
            .collect();
        lines.push(self.dim(&format!("{} comments", comments.len())));
        lines.join("\n")
    }

    /// Formats a location.
    pub fn format_location(&self, location: &Location) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.bold(&location.name),
            self.dim(&format!("(id {})", location.id))
        )];
        if let Some(slug) = &location.slug {
            lines.push(format!("Slug:   {slug}"));
        }
        if let (Some(lat), Some(lng)) = (location.lat, location.lng) {
            lines.push(format!("Coords: {lat:.5}, {lng:.5}"));
        }
        if !location.has_public_page {
            lines.push(self.yellow("No public page"));
        }
        lines.join("\n")
    }

    /// Formats a labelled on/off value.
    pub fn format_flag(&self, label: &str, on: bool) -> String {
        let value = if on { self.green("yes") } else { self.red("no") };
        format!("{:<16} {}", format!("{label}:"), value)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    pub(crate) fn count(&self, n: Option<u64>) -> String {
        match n {
            Some(n) => format_number(n),
            None => self.dim("?"),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub(crate) fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    pub(crate) fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Compact counts: 999, 1.2K, 3.4M.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn format_number(n: u64) -> String {
    let f = n as f64;
    if n >= 1_000_000 {
        format!("{:.1}M", f / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", f / 1_000.0)
    } else {
        n.to_string()
    }
}

/// First line of `text`, cut to `max` characters.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
