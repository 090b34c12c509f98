//! Session manager.
//!
//! Owns the active [`Session`] and is the only writer to it. Login goes
//! through the states in [`SessionState`]:
//!
//! ```text
//! NoSession -> ProbingLiveness -> LoggingIn -> Authenticated
//!                     \________________________/
//!                      cached session still live
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::header::HeaderMap;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::cache::SessionCache;
use crate::client::RetryingClient;
use crate::cookies::{Session, CSRF_TOKEN, DS_USER_ID, MID, SESSION_ID};
use crate::endpoints::Endpoints;
use crate::error::ScrapeError;
use crate::host::http::{HttpOutcome, HttpRequest};

// ============================================================================
// Credentials / State
// ============================================================================

/// Username and password for one account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The username, also the session cache key.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the manager is in acquiring a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No active session; requests go out anonymously.
    NoSession,
    /// Checking whether a cached session is still accepted.
    ProbingLiveness,
    /// Performing a fresh login.
    LoggingIn,
    /// A session is active.
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoSession => "no session",
            Self::ProbingLiveness => "probing liveness",
            Self::LoggingIn => "logging in",
            Self::Authenticated => "authenticated",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Session Manager
// ============================================================================

/// Acquires, checks and persists the session for one credential pair.
pub struct SessionManager {
    credentials: Option<Credentials>,
    cache: Arc<dyn SessionCache>,
    http: RetryingClient,
    endpoints: Endpoints,
    active: Mutex<Option<Session>>,
    state: Mutex<SessionState>,
    login_lock: tokio::sync::Mutex<()>,
}

impl SessionManager {
    /// Creates a manager with no active session.
    pub fn new(
        credentials: Option<Credentials>,
        cache: Arc<dyn SessionCache>,
        http: RetryingClient,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            credentials,
            cache,
            http,
            endpoints,
            active: Mutex::new(None),
            state: Mutex::new(SessionState::NoSession),
            login_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// The configured username.
    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::username)
    }

    /// A copy of the active session.
    pub fn active(&self) -> Option<Session> {
        lock(&self.active).clone()
    }

    /// Makes `session` the active session.
    pub fn adopt(&self, session: Session) {
        *lock(&self.active) = Some(session);
        self.set_state(SessionState::Authenticated);
    }

    /// Headers for an outgoing request; empty when anonymous.
    pub fn request_headers(&self) -> HeaderMap {
        lock(&self.active)
            .as_ref()
            .map(|s| s.request_headers(&self.endpoints.base()))
            .unwrap_or_default()
    }

    /// Picks up a rotated `csrftoken` from a response.
    ///
    /// Anonymous clients stay anonymous: nothing happens without an active
    /// session.
    pub fn refresh_from_response(&self, outcome: &HttpOutcome) {
        let rotated = Session::from_response(outcome);
        let Some(token) = rotated.csrf_token() else {
            return;
        };
        if let Some(active) = lock(&self.active).as_mut() {
            active.insert(CSRF_TOKEN, token);
        }
    }

    /// Ensures a session is active.
    ///
    /// A cached session is reused if it passes the liveness probe, unless
    /// `force` is set. Otherwise a fresh login is performed and the new
    /// session is persisted.
    #[instrument(skip(self), fields(username = self.username().unwrap_or_default()))]
    pub async fn login(&self, force: bool) -> Result<(), ScrapeError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| ScrapeError::AuthConfig("user credentials not provided".into()))?;

        let _guard = self.login_lock.lock().await;
        self.login_locked(credentials, force).await
    }

    /// Logs in on first use when credentials are configured.
    ///
    /// Does nothing for anonymous clients or when a session is already
    /// active. Concurrent callers wait for a single login.
    pub async fn ensure_session(&self) -> Result<(), ScrapeError> {
        let Some(credentials) = self.credentials.as_ref() else {
            return Ok(());
        };
        if self.active().is_some() {
            return Ok(());
        }

        let _guard = self.login_lock.lock().await;
        if self.active().is_some() {
            return Ok(());
        }
        self.login_locked(credentials, false).await
    }

    async fn login_locked(&self, credentials: &Credentials, force: bool) -> Result<(), ScrapeError> {
        let result = self.acquire(credentials, force).await;
        if result.is_err() {
            let fallback = if self.active().is_some() {
                SessionState::Authenticated
            } else {
                SessionState::NoSession
            };
            self.set_state(fallback);
        }
        result
    }

    async fn acquire(&self, credentials: &Credentials, force: bool) -> Result<(), ScrapeError> {
        if !force {
            if let Some(cached) = self.cache.get(credentials.username()).await? {
                self.set_state(SessionState::ProbingLiveness);
                if self.is_logged_in(Some(&cached)).await? {
                    info!("Reusing cached session");
                    self.adopt(cached);
                    return Ok(());
                }
                debug!("Cached session rejected");
            }
        }

        self.set_state(SessionState::LoggingIn);
        let session = self.fresh_login(credentials).await?;
        self.cache.set(credentials.username(), &session).await?;
        self.cache.save().await?;
        info!(cookies = session.len(), "Logged in");
        self.adopt(session);
        Ok(())
    }

    async fn fresh_login(&self, credentials: &Credentials) -> Result<Session, ScrapeError> {
        let landing = self.http.send(&HttpRequest::get(self.endpoints.base())).await?;
        if !landing.is_ok() {
            return Err(ScrapeError::upstream(&landing, "login page unavailable"));
        }

        let anonymous = Session::from_response(&landing);
        let csrf_token = anonymous
            .csrf_token()
            .ok_or_else(|| ScrapeError::upstream(&landing, "login page set no csrftoken"))?;
        let mid = anonymous.mid().map(str::to_string);

        let mut handshake = Session::new();
        handshake.insert(CSRF_TOKEN, csrf_token);
        if let Some(mid) = &mid {
            handshake.insert(MID, mid.as_str());
        }

        let form = vec![
            ("username".to_string(), credentials.username().to_string()),
            ("password".to_string(), credentials.password().to_string()),
        ];
        let request = HttpRequest::post_form(self.endpoints.login(), form)
            .with_headers(handshake.request_headers(&self.endpoints.base()));
        let response = self.http.send(&request).await?;
        if !response.is_ok() {
            warn!(status = %response.status, "Login rejected");
            return Err(ScrapeError::auth_failure(&response));
        }

        let mut session = Session::from_response(&response);
        if let Some(mid) = mid {
            session.insert(MID, mid);
        }
        Ok(session)
    }

    /// Liveness probe for a candidate session.
    ///
    /// Never touches the active session. Transport failures propagate; any
    /// non-200 answer or a missing signed-in marker means "not logged in".
    #[instrument(skip_all)]
    pub async fn is_logged_in(&self, session: Option<&Session>) -> Result<bool, ScrapeError> {
        let Some(session) = session else {
            return Ok(false);
        };
        let Some(session_id) = session.session_id() else {
            return Ok(false);
        };

        let mut probe = Session::new();
        probe.insert(SESSION_ID, session_id);
        if let Some(token) = session.csrf_token() {
            probe.insert(CSRF_TOKEN, token);
        }

        let request = HttpRequest::get(self.endpoints.base())
            .with_headers(probe.request_headers(&self.endpoints.base()));
        let outcome = self.http.send(&request).await?;
        if !outcome.is_ok() {
            debug!(status = %outcome.status, "Probe rejected");
            return Ok(false);
        }

        let live = Session::from_response(&outcome).get(DS_USER_ID).is_some();
        debug!(live, "Probe completed");
        Ok(live)
    }

    /// Writes the active session to the cache, replacing any prior entry.
    pub async fn save_session(&self) -> Result<(), ScrapeError> {
        let username = self
            .username()
            .ok_or_else(|| ScrapeError::AuthConfig("user credentials not provided".into()))?;
        let session = self.active().ok_or(ScrapeError::NoSession)?;
        self.cache.set(username, &session).await?;
        self.cache.save().await
    }

    fn set_state(&self, state: SessionState) {
        *lock(&self.state) = state;
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.credentials)
            .field("state", &self.state())
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

/// Locks a mutex, recovering the data if a holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Tests
// ============================================================================
