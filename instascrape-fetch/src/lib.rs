// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `instascrape` Fetch
//!
//! Session handling, retrying transport and cursor pagination for the
//! Instagram web API.
//!
//! ## Request path
//!
//! - [`host::http`] - the [`Transport`] seam and its `reqwest` implementation
//! - [`retry`] - fixed-attempt [`RetryPolicy`] for transport failures
//! - [`client`] - [`RetryingClient`], a transport behind a retry policy
//! - [`classify`] - status and body checks producing [`ScrapeError`]
//!
//! ## Session
//!
//! - [`cookies`] - the [`Session`] cookie jar
//! - [`session`] - [`SessionManager`]: login, liveness probe, persistence
//! - [`cache`] - the [`SessionCache`] seam and an in-memory cache
//!
//! ## Pagination
//!
//! - [`pagination`] - generic cursor walk ([`accumulate`](pagination::accumulate)
//!   and [`paginate`](pagination::paginate))
//! - [`shapes`] - where each endpoint keeps its items and cursor
//! - [`comments`] - batched backward walk over comments
//!
//! ## Example
//!
//! ```ignore
//! use instascrape_fetch::{Credentials, InstaClient};
//!
//! let client = InstaClient::builder()
//!     .credentials(Credentials::new("user", "pass"))
//!     .build()?;
//!
//! let medias = client.get_medias_by_tag("rust", 40, "").await?;
//! ```

pub mod api;
pub mod cache;
pub mod classify;
pub mod client;
pub mod comments;
pub mod cookies;
pub mod endpoints;
pub mod error;
pub mod host;
pub mod pagination;
pub mod retry;
pub mod session;
pub mod shapes;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root

pub use api::{InstaClient, InstaClientBuilder, MediaPage};
pub use cache::{MemorySessionCache, SessionCache};
pub use client::RetryingClient;
pub use comments::MAX_COMMENTS_PER_REQUEST;
pub use cookies::Session;
pub use endpoints::{Endpoints, DEFAULT_BASE_URL};
pub use error::{HttpError, ScrapeError};
pub use host::http::{HttpOutcome, HttpRequest, HttpTransport, Method, Transport, DEFAULT_USER_AGENT};
pub use pagination::{Cursor, Page, PageSlice, PageSource, RawItem};
pub use retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
pub use session::{Credentials, SessionManager, SessionState};
