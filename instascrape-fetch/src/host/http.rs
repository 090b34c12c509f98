//! HTTP transport.
//!
//! This module provides the single seam through which every request leaves
//! the process:
//! - [`Transport`] - the trait the rest of the crate talks to
//! - [`HttpTransport`] - the `reqwest`-backed implementation with tracing and
//!   an optional domain allowlist
//! - [`HttpRequest`] / [`HttpOutcome`] - owned request and response values
//!
//! A transport sends exactly once. It never retries and never interprets the
//! status code; both are the caller's job.

use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, RequestBuilder, StatusCode,
};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent. The web API rejects obvious non-browser agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

// ============================================================================
// Request / Outcome
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST with a form body.
    Post,
}

/// An outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Fully-qualified URL.
    pub url: String,
    /// Extra headers.
    pub headers: HeaderMap,
    /// Form fields for POST requests.
    pub form: Option<Vec<(String, String)>>,
}

impl HttpRequest {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: HeaderMap::new(),
            form: None,
        }
    }

    /// Creates a form-encoded POST request.
    pub fn post_form(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: HeaderMap::new(),
            form: Some(form),
        }
    }

    /// Adds headers, keeping any already set on the request.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in &headers {
            if !self.headers.contains_key(name) {
                self.headers.insert(name.clone(), value.clone());
            }
        }
        self
    }
}

/// What came back: status, headers and body, nothing interpreted.
#[derive(Debug, Clone)]
pub struct HttpOutcome {
    /// Status code.
    pub status: StatusCode,
    /// Response headers (multi-valued, so every `Set-Cookie` is kept).
    pub headers: HeaderMap,
    /// Raw body text.
    pub body: String,
    /// Final URL after redirects.
    pub url: String,
}

impl HttpOutcome {
    /// Creates an outcome with no headers.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            url: String::new(),
        }
    }

    /// Appends a header value. Invalid values are dropped.
    #[must_use]
    pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the final URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Returns true for HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Iterates over every `Set-Cookie` header value.
    pub fn set_cookies(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
    }

    /// Returns the `Location` header, if any.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Sends one request and reports what came back.
///
/// Implementations fail only when no HTTP response was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request once.
    async fn send(&self, request: &HttpRequest) -> Result<HttpOutcome, HttpError>;
}

// ============================================================================
// HTTP Transport
// ============================================================================

/// `reqwest`-backed transport with tracing and an optional domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpTransport {
    /// Creates a transport with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_settings(Duration::from_secs(DEFAULT_TIMEOUT_SECS), DEFAULT_USER_AGENT)
    }

    /// Creates a transport with a custom timeout and user agent.
    pub fn with_settings(timeout: Duration, user_agent: &str) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            inner: client,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    fn request_builder(&self, request: &HttpRequest) -> RequestBuilder {
        let builder = match request.method {
            Method::Get => self.inner.get(&request.url),
            Method::Post => self.inner.post(&request.url),
        };
        let builder = builder.headers(request.headers.clone());
        match &request.form {
            Some(form) => builder.form(form),
            None => builder,
        }
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    async fn send(&self, request: &HttpRequest) -> Result<HttpOutcome, HttpError> {
        self.is_domain_allowed(&request.url)?;
        debug!("Sending request");

        let response = self.request_builder(request).send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Request(e)
            }
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "Response received");

        Ok(HttpOutcome {
            status,
            headers,
            body,
            url,
        })
    }
}


// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let transport = HttpTransport::new()
            .unwrap()
            .with_allowed_domains(vec!["instagram.com".to_string()]);

        assert!(transport.is_domain_allowed("https://www.instagram.com/x/").is_ok());
        assert!(transport.is_domain_allowed("https://instagram.com").is_ok());
        assert!(matches!(
            transport.is_domain_allowed("https://evil.com/steal"),
            Err(HttpError::DomainNotAllowed(_))
        ));
    }

    #[test]
    fn test_invalid_url_rejected_without_allowlist() {
        let transport = HttpTransport::new().unwrap();
        assert!(matches!(
            transport.is_domain_allowed("not-a-valid-url"),
            Err(HttpError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_with_headers_keeps_request_specific_values() {
        let mut specific = HeaderMap::new();
        specific.insert(header::REFERER, HeaderValue::from_static("https://a/"));
        let mut session = HeaderMap::new();
        session.insert(header::REFERER, HeaderValue::from_static("https://b/"));
        session.insert(header::COOKIE, HeaderValue::from_static("k=v"));

        let mut request = HttpRequest::get("https://a/");
        request.headers = specific;
        let request = request.with_headers(session);

        assert_eq!(request.headers[header::REFERER], "https://a/");
        assert_eq!(request.headers[header::COOKIE], "k=v");
    }

    #[test]
    fn test_form_body_is_url_encoded() {
        let transport = HttpTransport::new().unwrap();
        let request = HttpRequest::post_form(
            "https://www.instagram.com/accounts/login/ajax/",
            vec![
                ("username".to_string(), "jane doe".to_string()),
                ("password".to_string(), "p&ss=1".to_string()),
            ],
        );
        let built = transport.request_builder(&request).build().unwrap();

        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(
            built.headers()[header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
        let body = built.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, b"username=jane+doe&password=p%26ss%3D1");
    }

    #[test]
    fn test_set_cookies_iterates_all_values() {
        let outcome = HttpOutcome::new(StatusCode::OK, "")
            .with_header(header::SET_COOKIE, "a=1; Path=/")
            .with_header(header::SET_COOKIE, "b=2; Secure");
        let cookies: Vec<&str> = outcome.set_cookies().collect();
        assert_eq!(cookies, vec!["a=1; Path=/", "b=2; Secure"]);
    }
}
