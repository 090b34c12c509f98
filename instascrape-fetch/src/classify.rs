//! Response classification.
//!
//! Turns an [`HttpOutcome`] into either a decoded JSON body or a typed
//! [`ScrapeError`]. Nothing in here retries.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::ScrapeError;
use crate::host::http::HttpOutcome;

/// How a missing field is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// The primary object of a lookup is absent: the resource does not exist.
    NotFound,
    /// A structural field is absent: the response has the wrong shape.
    Upstream,
}

/// Fails on 404 and on any other non-200 status.
pub fn ensure_success(outcome: &HttpOutcome, what: &str) -> Result<(), ScrapeError> {
    match outcome.status {
        StatusCode::OK => Ok(()),
        StatusCode::NOT_FOUND => Err(ScrapeError::NotFound(what.to_string())),
        _ => Err(ScrapeError::upstream(outcome, "unexpected status")),
    }
}

/// Decodes the body, which must be a JSON object.
pub fn decode_json(outcome: &HttpOutcome) -> Result<Value, ScrapeError> {
    match serde_json::from_str::<Value>(&outcome.body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(ScrapeError::upstream(outcome, "body is not a JSON object")),
        Err(e) => Err(ScrapeError::upstream(outcome, format!("invalid JSON: {e}"))),
    }
}

/// Checks the status, then decodes the body.
pub fn classify(outcome: &HttpOutcome, what: &str) -> Result<Value, ScrapeError> {
    ensure_success(outcome, what)?;
    decode_json(outcome)
}

/// Looks up a JSON pointer, treating absent and `null` alike.
pub fn require<'a>(
    outcome: &HttpOutcome,
    body: &'a Value,
    pointer: &str,
    missing: Missing,
    what: &str,
) -> Result<&'a Value, ScrapeError> {
    match body.pointer(pointer) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(match missing {
            Missing::NotFound => ScrapeError::NotFound(what.to_string()),
            Missing::Upstream => ScrapeError::upstream(outcome, format!("missing {pointer}")),
        }),
    }
}

/// Like [`require`] for fields that must be arrays.
pub fn require_array<'a>(
    outcome: &HttpOutcome,
    body: &'a Value,
    pointer: &str,
) -> Result<&'a [Value], ScrapeError> {
    require(outcome, body, pointer, Missing::Upstream, pointer)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ScrapeError::upstream(outcome, format!("{pointer} is not an array")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: &str) -> HttpOutcome {
        HttpOutcome::new(StatusCode::OK, body)
    }

    #[test]
    fn test_not_found_status() {
        let outcome = HttpOutcome::new(StatusCode::NOT_FOUND, "<html>");
        assert!(classify(&outcome, "media").unwrap_err().is_not_found());
    }

    #[test]
    fn test_other_status_is_upstream() {
        let outcome = HttpOutcome::new(StatusCode::TOO_MANY_REQUESTS, "slow down");
        let err = classify(&outcome, "media").unwrap_err();
        assert_eq!(err.status(), Some(429));
        assert!(matches!(err, ScrapeError::Upstream { ref body, .. } if body == "slow down"));
    }

    #[test]
    fn test_malformed_ok_body_is_upstream() {
        for body in ["<!DOCTYPE html>", "[1,2]", "", "null"] {
            let err = classify(&ok(body), "media").unwrap_err();
            assert_eq!(err.status(), Some(200), "body {body:?}");
        }
    }

    #[test]
    fn test_require_missing_modes() {
        let outcome = ok("{}");
        let body = json!({"graphql": {"shortcode_media": null}});

        let err = require(&outcome, &body, "/user", Missing::NotFound, "account jane").unwrap_err();
        assert!(err.is_not_found());

        let err = require(
            &outcome,
            &body,
            "/graphql/shortcode_media",
            Missing::Upstream,
            "media",
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn test_require_array() {
        let outcome = ok("{}");
        let body = json!({"items": [1, 2], "more": "no"});
        assert_eq!(require_array(&outcome, &body, "/items").unwrap().len(), 2);
        assert!(require_array(&outcome, &body, "/more").is_err());
    }
}
