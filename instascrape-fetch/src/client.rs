//! Retrying HTTP client.

use std::sync::Arc;

use tracing::debug;

use crate::error::HttpError;
use crate::host::http::{HttpOutcome, HttpRequest, Transport};
use crate::retry::RetryPolicy;

/// A [`Transport`] wrapped in a [`RetryPolicy`].
///
/// Status codes are never inspected here; classification is left to the
/// caller.
#[derive(Clone)]
pub struct RetryingClient {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl RetryingClient {
    /// Creates a client over the given transport.
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// Sends a request, retrying transport failures.
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpOutcome, HttpError> {
        let outcome = self.retry.execute(|| self.transport.send(request)).await?;
        debug!(url = %request.url, status = %outcome.status, "Request completed");
        Ok(outcome)
    }
}

impl std::fmt::Debug for RetryingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingClient")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
