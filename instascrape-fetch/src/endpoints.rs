//! Endpoint URL builder.
//!
//! Every URL the client requests is built here. Path segments and query
//! values are percent-encoded by [`Url`].

use url::Url;

use crate::error::ScrapeError;

/// Default web API origin.
pub const DEFAULT_BASE_URL: &str = "https://www.instagram.com";

/// Graphql query id for an account's timeline media.
const TIMELINE_QUERY_ID: &str = "17888483320059182";
/// Graphql query id for a post's comments.
const COMMENTS_QUERY_ID: &str = "17852405266163336";

/// Builds request URLs against one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Creates a builder for `base_url` (scheme and host, optional path).
    pub fn new(base_url: &str) -> Result<Self, ScrapeError> {
        let base = Url::parse(base_url)
            .map_err(|e| ScrapeError::InvalidArgument(format!("base url {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ScrapeError::InvalidArgument(format!(
                "base url {base_url} cannot carry paths"
            )));
        }
        Ok(Self { base })
    }

    /// Origin with a trailing slash. Also the login landing page and the
    /// liveness probe target.
    pub fn base(&self) -> String {
        self.path(&[])
    }

    /// Login form target.
    pub fn login(&self) -> String {
        self.path(&["accounts", "login", "ajax"])
    }

    /// Account profile JSON.
    pub fn account_json(&self, username: &str) -> String {
        self.with_query(&[username], &[("__a", "1")])
    }

    /// One page of an account's `/media/` listing.
    pub fn account_media_page(&self, username: &str, max_id: &str) -> String {
        self.with_query(&[username, "media"], &[("max_id", max_id)])
    }

    /// One page of an account's timeline through graphql.
    pub fn timeline_media(&self, user_id: &str, count: usize, after: &str) -> String {
        let first = count.to_string();
        let mut pairs = vec![
            ("query_id", TIMELINE_QUERY_ID),
            ("id", user_id),
            ("first", first.as_str()),
        ];
        if !after.is_empty() {
            pairs.push(("after", after));
        }
        self.with_query(&["graphql", "query"], &pairs)
    }

    /// JSON form of a post page URL.
    pub fn media_json(&self, media_url: &str) -> Result<String, ScrapeError> {
        let mut url = Url::parse(media_url)
            .map_err(|e| ScrapeError::InvalidArgument(format!("malformed media url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ScrapeError::InvalidArgument(format!(
                "malformed media url: {media_url}"
            )));
        }
        let path = format!("{}/", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        url.query_pairs_mut().append_pair("__a", "1");
        Ok(url.into())
    }

    /// Post page URL for a shortcode.
    pub fn media_page(&self, code: &str) -> String {
        self.path(&["p", code])
    }

    /// Tag explore page JSON.
    pub fn tag_media(&self, tag: &str, max_id: &str) -> String {
        let mut pairs = vec![("__a", "1")];
        if !max_id.is_empty() {
            pairs.push(("max_id", max_id));
        }
        self.with_query(&["explore", "tags", tag], &pairs)
    }

    /// Location explore page JSON.
    pub fn location_media(&self, location_id: &str, max_id: &str) -> String {
        let mut pairs = vec![("__a", "1")];
        if !max_id.is_empty() {
            pairs.push(("max_id", max_id));
        }
        self.with_query(&["explore", "locations", location_id], &pairs)
    }

    /// One batch of comments older than `after`.
    pub fn comments_before(&self, code: &str, count: usize, after: &str) -> String {
        let first = count.to_string();
        let mut pairs = vec![
            ("query_id", COMMENTS_QUERY_ID),
            ("shortcode", code),
            ("first", first.as_str()),
        ];
        if !after.is_empty() {
            pairs.push(("after", after));
        }
        self.with_query(&["graphql", "query"], &pairs)
    }

    /// Account and hashtag search.
    pub fn general_search(&self, query: &str) -> String {
        self.with_query(&["web", "search", "topsearch"], &[("query", query)])
    }

    /// Follow page, which redirects to the account's profile.
    pub fn follow(&self, user_id: &str) -> String {
        self.path(&["web", "friendships", user_id, "follow"])
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    fn path(&self, segments: &[&str]) -> String {
        self.url(segments).into()
    }

    fn with_query(&self, segments: &[&str], pairs: &[(&str, &str)]) -> String {
        let mut url = self.url(segments);
        url.query_pairs_mut().extend_pairs(pairs);
        url.into()
    }
}

impl Default for Endpoints {
    /// Builds against [`DEFAULT_BASE_URL`].
    ///
    /// # Panics
    ///
    /// Never in practice: the default origin is a valid absolute URL.
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
            .unwrap_or_else(|e| panic!("default base url rejected: {e}"))
    }
}
