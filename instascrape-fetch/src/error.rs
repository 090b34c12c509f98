//! Fetch error types.
//!
//! [`HttpError`] is the only retryable failure: it means the request never
//! produced an HTTP response. Everything that did produce a response is
//! classified into [`ScrapeError`] and surfaces immediately.

use instascrape_core::CoreError;
use thiserror::Error;

use crate::host::http::HttpOutcome;

/// Longest slice of a response body carried inside an error.
const BODY_PREVIEW_LEN: usize = 2048;

// ============================================================================
// Scrape Error
// ============================================================================

/// Error type for client operations.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Input rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream answered 404, or a 200 without the expected primary object.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Login requested without credentials.
    #[error("Credentials not provided: {0}")]
    AuthConfig(String),

    /// The login POST did not return 200.
    #[error("Login failed with status {status}: {body}")]
    AuthFailure {
        /// HTTP status of the login response.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Any other unexpected status, or a 200 whose body has the wrong shape.
    #[error("Upstream error (status {status}): {reason}")]
    Upstream {
        /// HTTP status of the response.
        status: u16,
        /// What was wrong with it.
        reason: String,
        /// Raw response body (truncated).
        body: String,
    },

    /// Network-level failure after all retry attempts.
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    /// An operation needed an active session and there was none.
    #[error("No active session")]
    NoSession,

    /// The session cache backend failed.
    #[error("Session cache error: {0}")]
    Cache(String),
}

impl ScrapeError {
    /// Builds an [`ScrapeError::Upstream`] from a response.
    pub fn upstream(outcome: &HttpOutcome, reason: impl Into<String>) -> Self {
        Self::Upstream {
            status: outcome.status.as_u16(),
            reason: reason.into(),
            body: preview(&outcome.body),
        }
    }

    /// Builds an [`ScrapeError::AuthFailure`] from a login response.
    pub fn auth_failure(outcome: &HttpOutcome) -> Self {
        Self::AuthFailure {
            status: outcome.status.as_u16(),
            body: preview(&outcome.body),
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthFailure { status, .. } | Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true for [`ScrapeError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<CoreError> for ScrapeError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidId(msg) => Self::InvalidArgument(msg),
            other => Self::Upstream {
                status: 200,
                reason: other.to_string(),
                body: String::new(),
            },
        }
    }
}

fn preview(body: &str) -> String {
    if body.len() <= BODY_PREVIEW_LEN {
        return body.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

// ============================================================================
// HTTP Error
// ============================================================================

/// Transport-level error: no HTTP response was obtained.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Connection failed for a reason reported without a `reqwest` error.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Timeout.
    #[error("Request timed out")]
    Timeout,
}

impl HttpError {
    /// Returns true if sending the same request again could succeed.
    ///
    /// URL and allowlist problems are configuration errors and fail the
    /// same way on every attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::DomainNotAllowed(_) | Self::InvalidUrl(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_upstream_carries_status_and_body() {
        let outcome = HttpOutcome::new(StatusCode::BAD_GATEWAY, "oops");
        let err = ScrapeError::upstream(&outcome, "unexpected status");
        assert_eq!(err.status(), Some(502));
        assert!(matches!(err, ScrapeError::Upstream { ref body, .. } if body == "oops"));
    }

    #[test]
    fn test_body_preview_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_PREVIEW_LEN);
        let cut = preview(&body);
        assert!(cut.len() < body.len());
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_invalid_id_maps_to_invalid_argument() {
        let err: ScrapeError = CoreError::InvalidId("x".to_string()).into();
        assert!(matches!(err, ScrapeError::InvalidArgument(_)));
        let err: ScrapeError = CoreError::missing("user").into();
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn test_transient_classification() {
        assert!(HttpError::Timeout.is_transient());
        assert!(HttpError::Connection("reset".into()).is_transient());
        assert!(!HttpError::InvalidUrl("x".into()).is_transient());
    }
}
