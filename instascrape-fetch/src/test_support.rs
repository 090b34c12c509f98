//! Scripted transport used by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::{header, StatusCode};

use crate::error::HttpError;
use crate::host::http::{HttpOutcome, HttpRequest, Transport};

/// Replays queued outcomes in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpOutcome, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, outcome: HttpOutcome) {
        self.script.lock().unwrap().push_back(Ok(outcome));
    }

    pub(crate) fn push_error(&self, error: HttpError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    /// Queues a 200 with a JSON body.
    pub(crate) fn push_json(&self, body: &serde_json::Value) {
        self.push(HttpOutcome::new(StatusCode::OK, body.to_string()));
    }

    /// Queues a 200 carrying the given `Set-Cookie` values.
    pub(crate) fn push_cookies(&self, body: &str, cookies: &[&str]) {
        let outcome = cookies
            .iter()
            .fold(HttpOutcome::new(StatusCode::OK, body), |o, c| {
                o.with_header(header::SET_COOKIE, c)
            });
        self.push(outcome);
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpOutcome, HttpError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::Connection("script exhausted".into())))
    }
}
