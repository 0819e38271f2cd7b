//! HTTP client for the Graph API messaging endpoint.
//!
//! Gated behind the `client` cargo feature so crates that only need the wire
//! types do not pull in `reqwest`.

mod graph;

pub use graph::{DEFAULT_API_VERSION, DEFAULT_BASE_URL, GraphClient};

use reqwest::StatusCode;

/// Errors produced by [`GraphClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Graph API returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("base url cannot be a base: {0}")]
    InvalidBaseUrl(url::Url),
}
