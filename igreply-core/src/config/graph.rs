//! Graph API configuration.

use igreply_sdk::client::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use std::time::Duration;
use url::Url;

/// Outbound Send API settings.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Graph API root, e.g. `https://graph.instagram.com`.
    pub base_url: Url,
    /// Version path segment, e.g. `v21.0`.
    pub api_version: String,
    /// Upper bound on a single outbound request.
    pub timeout: Duration,
    /// In-flight sends allowed per account.
    pub max_concurrent_sends: usize,
}

impl GraphConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_MAX_CONCURRENT_SENDS: usize = 8;
}

impl Default for GraphConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base url"),
            api_version: DEFAULT_API_VERSION.to_owned(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_concurrent_sends: Self::DEFAULT_MAX_CONCURRENT_SENDS,
        }
    }
}
