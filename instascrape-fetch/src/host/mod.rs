//! Host APIs for `instascrape` fetching.
//!
//! - [`http`] - the [`Transport`](http::Transport) seam and its `reqwest`
//!   implementation with tracing and a domain allowlist

pub mod http;

pub use http::{HttpOutcome, HttpRequest, HttpTransport, Method, Transport};
