//! Cookie jar holding the session.
//!
//! A [`Session`] is the full cookie mapping returned by the web API. It is
//! persisted as-is and turned back into request headers on every call.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::host::http::HttpOutcome;

/// Cookie carrying the anti-forgery token.
pub const CSRF_TOKEN: &str = "csrftoken";
/// Machine id cookie, set on the first anonymous visit.
pub const MID: &str = "mid";
/// Session id cookie, present once logged in.
pub const SESSION_ID: &str = "sessionid";
/// Signed-in user marker.
pub const DS_USER_ID: &str = "ds_user_id";

const X_CSRF_TOKEN: HeaderName = HeaderName::from_static("x-csrftoken");

/// Mapping of cookie name to value.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every cookie set by a response.
    pub fn from_response(outcome: &HttpOutcome) -> Self {
        let mut session = Self::new();
        session.update(outcome.set_cookies());
        session
    }

    /// Upserts cookies from raw `Set-Cookie` header values.
    ///
    /// Attributes after the first `;` are dropped. Entries without `=` are
    /// ignored.
    pub fn update<'a>(&mut self, headers: impl IntoIterator<Item = &'a str>) {
        for value in headers {
            if let Some((name, value)) = parse_set_cookie(value) {
                self.cookies.insert(name, value);
            }
        }
    }

    /// Returns a cookie value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Sets a cookie value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Anti-forgery token.
    pub fn csrf_token(&self) -> Option<&str> {
        self.get(CSRF_TOKEN)
    }

    /// Machine id.
    pub fn mid(&self) -> Option<&str> {
        self.get(MID)
    }

    /// Session id.
    pub fn session_id(&self) -> Option<&str> {
        self.get(SESSION_ID)
    }

    /// Returns true if no cookies are held.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Number of cookies held.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Builds `cookie`, `referer` and `x-csrftoken` headers.
    ///
    /// An empty session yields an empty map so the request goes out
    /// anonymously.
    pub fn request_headers(&self, referer: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.is_empty() {
            return headers;
        }

        let cookie = self
            .cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.insert(header::COOKIE, value);
        }
        if let Ok(value) = HeaderValue::from_str(referer) {
            headers.insert(header::REFERER, value);
        }
        if let Some(value) = self.csrf_token().and_then(|t| HeaderValue::from_str(t).ok()) {
            headers.insert(X_CSRF_TOKEN, value);
        }
        headers
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.cookies.keys().map(|k| (k, "<redacted>")))
            .finish()
    }
}

impl FromIterator<(String, String)> for Session {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            cookies: iter.into_iter().collect(),
        }
    }
}

/// Splits `name=value; attr; attr` into its name and value.
fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}
