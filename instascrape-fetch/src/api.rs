//! Public client surface.
//!
//! [`InstaClient`] runs every request through the same path: make sure a
//! session exists when credentials are configured, inject its headers, send
//! with retries, pick up a rotated `csrftoken`, classify the response. The
//! paginated operations plug an [`EdgeShape`] into the engine in
//! [`crate::pagination`]; comments use [`crate::comments`].

use std::sync::Arc;

use async_trait::async_trait;
use instascrape_core::{Account, Comment, Location, Media, Tag};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cache::{MemorySessionCache, SessionCache};
use crate::classify::{self, require, require_array, Missing};
use crate::client::RetryingClient;
use crate::comments::{self, BatchSource};
use crate::cookies::Session;
use crate::endpoints::Endpoints;
use crate::error::ScrapeError;
use crate::host::http::{HttpOutcome, HttpRequest, HttpTransport, Transport};
use crate::pagination::{self, Page, PageSource, RawItem};
use crate::retry::RetryPolicy;
use crate::session::{Credentials, SessionManager, SessionState};
use crate::shapes::{
    AccountMedia, CommentBatch, EdgeShape, LocationMedia, TagMedia, TimelineMedia,
};

/// Largest timeline page requested in one graphql call.
const TIMELINE_PAGE_SIZE: usize = 50;

// ============================================================================
// Results
// ============================================================================

/// One page of media plus where to resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaPage {
    /// Media on this page.
    pub medias: Vec<Media>,
    /// Cursor for the next page.
    pub max_id: String,
    /// Whether another page exists.
    pub has_next_page: bool,
    /// Collection size, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`InstaClient`].
#[derive(Default)]
pub struct InstaClientBuilder {
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn Transport>>,
    retry: Option<RetryPolicy>,
    endpoints: Option<Endpoints>,
    cache: Option<Arc<dyn SessionCache>>,
    auto_login: Option<bool>,
}

impl InstaClientBuilder {
    /// Sets the account to log in as.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the transport. Defaults to [`HttpTransport`].
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the retry policy. Defaults to four attempts.
    #[must_use]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Sets the endpoint origin. Defaults to instagram.com.
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Sets the session cache. Defaults to an in-memory cache.
    #[must_use]
    pub fn session_cache(mut self, cache: Arc<dyn SessionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Whether to log in on the first request when credentials are set.
    /// Defaults to true.
    #[must_use]
    pub fn auto_login(mut self, enabled: bool) -> Self {
        self.auto_login = Some(enabled);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<InstaClient, ScrapeError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new()?),
        };
        let http = RetryingClient::new(transport, self.retry.unwrap_or_default());
        let endpoints = self.endpoints.unwrap_or_default();
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemorySessionCache::new()));

        Ok(InstaClient {
            session: SessionManager::new(self.credentials, cache, http.clone(), endpoints.clone()),
            http,
            endpoints,
            auto_login: self.auto_login.unwrap_or(true),
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Instagram web API.
#[derive(Debug)]
pub struct InstaClient {
    session: SessionManager,
    http: RetryingClient,
    endpoints: Endpoints,
    auto_login: bool,
}

impl InstaClient {
    /// Starts a builder.
    pub fn builder() -> InstaClientBuilder {
        InstaClientBuilder::default()
    }

    /// Anonymous client with default settings.
    pub fn new() -> Result<Self, ScrapeError> {
        Self::builder().build()
    }

    /// Endpoint builder in use.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Session manager in use.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    // ------------------------------------------------------------------------
    // Request path
    // ------------------------------------------------------------------------

    async fn execute(&self, request: HttpRequest) -> Result<HttpOutcome, ScrapeError> {
        if self.auto_login {
            self.session.ensure_session().await?;
        }
        let request = request.with_headers(self.session.request_headers());
        let outcome = self.http.send(&request).await?;
        self.session.refresh_from_response(&outcome);
        Ok(outcome)
    }

    async fn fetch_json(&self, url: String, what: &str) -> Result<(HttpOutcome, Value), ScrapeError> {
        let outcome = self.execute(HttpRequest::get(url)).await?;
        let body = classify::classify(&outcome, what)?;
        Ok((outcome, body))
    }

    async fn fetch_shape<S: EdgeShape>(&self, shape: &S, cursor: &str) -> Result<Page, ScrapeError> {
        let url = shape.request(&self.endpoints, cursor);
        let (outcome, body) = self.fetch_json(url, &shape.describe()).await?;
        shape.extract(&outcome, &body)
    }

    fn source<S: EdgeShape>(&self, shape: S) -> ShapeSource<'_, S> {
        ShapeSource { client: self, shape }
    }

    // ------------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------------

    /// Looks up an account by username.
    #[instrument(skip(self))]
    pub async fn get_account(&self, username: &str) -> Result<Account, ScrapeError> {
        non_empty(username, "username")?;
        let what = format!("account {username}");
        let (outcome, body) = self
            .fetch_json(self.endpoints.account_json(username), &what)
            .await?;
        let user = require(&outcome, &body, "/user", Missing::NotFound, &what)?;
        Ok(Account::from_account_page(user)?)
    }

    /// Looks up an account by numeric id.
    ///
    /// The follow page redirects to the profile, whose URL carries the
    /// username.
    #[instrument(skip(self))]
    pub async fn get_account_by_id(&self, id: &str) -> Result<Account, ScrapeError> {
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScrapeError::InvalidArgument(format!(
                "user id must be numeric, got {id:?}"
            )));
        }

        let what = format!("account {id}");
        let outcome = self
            .execute(HttpRequest::get(self.endpoints.follow(id)))
            .await?;
        classify::ensure_success(&outcome, &what)?;

        let target = outcome.location().unwrap_or(outcome.url.as_str());
        let username = last_path_segment(target)
            .ok_or_else(|| ScrapeError::upstream(&outcome, "redirect carried no username"))?;
        debug!(username, "Resolved account id");
        self.get_account(&username).await
    }

    /// Searches accounts by username.
    #[instrument(skip(self))]
    pub async fn search_accounts(&self, query: &str) -> Result<Vec<Account>, ScrapeError> {
        let hits = self.search(query, "users", "user").await?;
        hits.iter()
            .map(|user| Account::from_search_page(user).map_err(ScrapeError::from))
            .collect()
    }

    /// Searches hashtags by name.
    #[instrument(skip(self))]
    pub async fn search_tags(&self, query: &str) -> Result<Vec<Tag>, ScrapeError> {
        let hits = self.search(query, "hashtags", "hashtag").await?;
        hits.iter()
            .map(|tag| Tag::from_search_page(tag).map_err(ScrapeError::from))
            .collect()
    }

    async fn search(&self, query: &str, list: &str, entry: &str) -> Result<Vec<Value>, ScrapeError> {
        non_empty(query, "search query")?;
        let (outcome, body) = self
            .fetch_json(self.endpoints.general_search(query), &format!("search {query}"))
            .await?;
        if body.get("status").and_then(Value::as_str) != Some("ok") {
            return Err(ScrapeError::upstream(&outcome, "search status is not ok"));
        }

        let Some(hits) = body.get(list).and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        hits.iter()
            .map(|hit| {
                hit.get(entry)
                    .cloned()
                    .ok_or_else(|| ScrapeError::upstream(&outcome, format!("{list} entry without {entry}")))
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Media
    // ------------------------------------------------------------------------

    /// Fetches a post from its page URL.
    #[instrument(skip(self))]
    pub async fn get_media_by_url(&self, media_url: &str) -> Result<Media, ScrapeError> {
        let url = self.endpoints.media_json(media_url)?;
        let what = format!("media {media_url}");
        let (outcome, body) = self.fetch_json(url, &what).await?;
        let media = require(
            &outcome,
            &body,
            "/graphql/shortcode_media",
            Missing::NotFound,
            &what,
        )?;
        Ok(Media::from_media_page(media)?)
    }

    /// Fetches a post by shortcode.
    pub async fn get_media_by_code(&self, code: &str) -> Result<Media, ScrapeError> {
        non_empty(code, "shortcode")?;
        self.get_media_by_url(&self.endpoints.media_page(code)).await
    }

    /// Fetches a post by numeric id.
    pub async fn get_media_by_id(&self, media_id: &str) -> Result<Media, ScrapeError> {
        let code = Media::code_from_id(media_id)?;
        self.get_media_by_code(&code).await
    }

    /// One page of an account's media listing.
    #[instrument(skip(self))]
    pub async fn get_paginated_medias(
        &self,
        username: &str,
        max_id: &str,
    ) -> Result<MediaPage, ScrapeError> {
        non_empty(username, "username")?;
        let source = self.source(AccountMedia {
            username: username.to_string(),
        });
        media_page(pagination::paginate(&source, max_id).await?, Media::from_api)
    }

    /// The newest `count` posts of an account, from its timeline.
    #[instrument(skip(self))]
    pub async fn get_account_medias(
        &self,
        username: &str,
        count: usize,
    ) -> Result<Vec<Media>, ScrapeError> {
        let account = self.get_account(username).await?;
        let source = self.source(TimelineMedia {
            user_id: account.id,
            page_size: count.clamp(1, TIMELINE_PAGE_SIZE),
        });
        let items = pagination::accumulate(&source, count, "").await?;
        map_items(&items, Media::from_timeline_node)
    }

    /// Like [`get_account_medias`](Self::get_account_medias), but re-fetches
    /// each post by shortcode so every field is filled in. One extra request
    /// per post, issued in timeline order.
    #[instrument(skip(self))]
    pub async fn get_account_medias_full(
        &self,
        username: &str,
        count: usize,
    ) -> Result<Vec<Media>, ScrapeError> {
        let timeline = self.get_account_medias(username, count).await?;
        let mut medias = Vec::with_capacity(timeline.len());
        for media in &timeline {
            medias.push(self.get_media_by_code(&media.shortcode).await?);
        }
        debug!(username, count = medias.len(), "Fetched full media");
        Ok(medias)
    }

    /// Newest post among an account's latest `count` whose caption contains
    /// `needle`, fetched in full.
    ///
    /// The scan stops at the first hit, so when several posts match, the
    /// newest one is returned rather than the oldest.
    #[instrument(skip(self))]
    pub async fn find_media_with_caption(
        &self,
        username: &str,
        needle: &str,
        count: usize,
    ) -> Result<Option<Media>, ScrapeError> {
        let timeline = self.get_account_medias(username, count).await?;
        let hit = timeline.into_iter().find(|media| {
            media
                .caption
                .as_deref()
                .is_some_and(|caption| caption.contains(needle))
        });
        match hit {
            Some(media) => Ok(Some(self.get_media_by_code(&media.shortcode).await?)),
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------------

    /// Up to `count` posts for a tag, starting at `max_id`.
    #[instrument(skip(self))]
    pub async fn get_medias_by_tag(
        &self,
        tag: &str,
        count: usize,
        max_id: &str,
    ) -> Result<Vec<Media>, ScrapeError> {
        non_empty(tag, "tag")?;
        let source = self.source(TagMedia {
            tag: tag.to_string(),
        });
        let items = pagination::accumulate(&source, count, max_id).await?;
        map_items(&items, Media::from_tag_page)
    }

    /// One page of posts for a tag.
    #[instrument(skip(self))]
    pub async fn get_paginated_medias_by_tag(
        &self,
        tag: &str,
        max_id: &str,
    ) -> Result<MediaPage, ScrapeError> {
        non_empty(tag, "tag")?;
        let source = self.source(TagMedia {
            tag: tag.to_string(),
        });
        media_page(pagination::paginate(&source, max_id).await?, Media::from_tag_page)
    }

    /// Top posts for a tag.
    #[instrument(skip(self))]
    pub async fn get_top_medias_by_tag(&self, tag: &str) -> Result<Vec<Media>, ScrapeError> {
        non_empty(tag, "tag")?;
        self.top_posts(self.endpoints.tag_media(tag, ""), &format!("tag {tag}"), "/tag/top_posts/nodes")
            .await
    }

    // ------------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------------

    /// Up to `count` posts for a location, starting at `max_id`.
    #[instrument(skip(self))]
    pub async fn get_medias_by_location(
        &self,
        location_id: &str,
        count: usize,
        max_id: &str,
    ) -> Result<Vec<Media>, ScrapeError> {
        non_empty(location_id, "location id")?;
        let source = self.source(LocationMedia {
            location_id: location_id.to_string(),
        });
        let items = pagination::accumulate(&source, count, max_id).await?;
        map_items(&items, Media::from_tag_page)
    }

    /// Top posts for a location.
    #[instrument(skip(self))]
    pub async fn get_location_top_medias(&self, location_id: &str) -> Result<Vec<Media>, ScrapeError> {
        non_empty(location_id, "location id")?;
        self.top_posts(
            self.endpoints.location_media(location_id, ""),
            &format!("location {location_id}"),
            "/location/top_posts/nodes",
        )
        .await
    }

    /// Location details.
    #[instrument(skip(self))]
    pub async fn get_location_by_id(&self, location_id: &str) -> Result<Location, ScrapeError> {
        non_empty(location_id, "location id")?;
        let what = format!("location {location_id}");
        let (outcome, body) = self
            .fetch_json(self.endpoints.location_media(location_id, ""), &what)
            .await?;
        let location = require(&outcome, &body, "/location", Missing::NotFound, &what)?;
        Ok(Location::from_json(location)?)
    }

    async fn top_posts(&self, url: String, what: &str, pointer: &str) -> Result<Vec<Media>, ScrapeError> {
        let (outcome, body) = self.fetch_json(url, what).await?;
        require_array(&outcome, &body, pointer)?
            .iter()
            .map(|node| Media::from_tag_page(node).map_err(ScrapeError::from))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------------

    /// Up to `count` comments on a post, walking back from `max_id` (newest
    /// when `None`).
    #[instrument(skip(self))]
    pub async fn get_comments_by_code(
        &self,
        code: &str,
        count: usize,
        max_id: Option<&str>,
    ) -> Result<Vec<Comment>, ScrapeError> {
        non_empty(code, "shortcode")?;
        let source = CommentSource { client: self, code };
        let items = comments::fetch_comments(&source, count, max_id.unwrap_or_default()).await?;
        map_items(&items, Comment::from_api)
    }

    /// Comments on a post identified by numeric id.
    pub async fn get_comments_by_id(
        &self,
        media_id: &str,
        count: usize,
        max_id: Option<&str>,
    ) -> Result<Vec<Comment>, ScrapeError> {
        let code = Media::code_from_id(media_id)?;
        self.get_comments_by_code(&code, count, max_id).await
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Logs in, reusing a live cached session unless `force` is set.
    pub async fn login(&self, force: bool) -> Result<(), ScrapeError> {
        self.session.login(force).await
    }

    /// Liveness probe for `session`, or for the active session when `None`.
    pub async fn is_logged_in(&self, session: Option<&Session>) -> Result<bool, ScrapeError> {
        match session {
            Some(session) => self.session.is_logged_in(Some(session)).await,
            None => self.session.is_logged_in(self.session.active().as_ref()).await,
        }
    }

    /// Persists the active session.
    pub async fn save_session(&self) -> Result<(), ScrapeError> {
        self.session.save_session().await
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }
}

// ============================================================================
// Sources
// ============================================================================

struct ShapeSource<'a, S> {
    client: &'a InstaClient,
    shape: S,
}

#[async_trait]
impl<S: EdgeShape> PageSource for ShapeSource<'_, S> {
    async fn fetch_page(&self, cursor: &str) -> Result<Page, ScrapeError> {
        self.client.fetch_shape(&self.shape, cursor).await
    }
}

struct CommentSource<'a> {
    client: &'a InstaClient,
    code: &'a str,
}

#[async_trait]
impl BatchSource for CommentSource<'_> {
    async fn fetch_batch(&self, size: usize, max_id: &str) -> Result<Page, ScrapeError> {
        let shape = CommentBatch {
            code: self.code.to_string(),
            first: size,
        };
        self.client.fetch_shape(&shape, max_id).await
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn non_empty(value: &str, what: &str) -> Result<(), ScrapeError> {
    if value.trim().is_empty() {
        Err(ScrapeError::InvalidArgument(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

fn map_items<T, E>(items: &[RawItem], map: impl Fn(&Value) -> Result<T, E>) -> Result<Vec<T>, ScrapeError>
where
    ScrapeError: From<E>,
{
    items
        .iter()
        .map(|item| map(&item.node).map_err(ScrapeError::from))
        .collect()
}

fn media_page<E>(
    slice: pagination::PageSlice,
    map: impl Fn(&Value) -> Result<Media, E>,
) -> Result<MediaPage, ScrapeError>
where
    ScrapeError: From<E>,
{
    Ok(MediaPage {
        medias: map_items(&slice.items, map)?,
        max_id: slice.cursor.value,
        has_next_page: slice.cursor.has_next_page,
        total: slice.total,
    })
}

/// Last non-empty path segment of a URL or path.
fn last_path_segment(target: &str) -> Option<String> {
    let path = url::Url::parse(target)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| target.to_string());
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            last_path_segment("https://www.instagram.com/jane/").as_deref(),
            Some("jane")
        );
        assert_eq!(last_path_segment("/jane").as_deref(), Some("jane"));
        assert_eq!(last_path_segment("https://www.instagram.com/"), None);
    }

    #[test]
    fn test_non_empty() {
        assert!(non_empty("x", "tag").is_ok());
        assert!(matches!(
            non_empty("  ", "tag"),
            Err(ScrapeError::InvalidArgument(_))
        ));
    }
}
