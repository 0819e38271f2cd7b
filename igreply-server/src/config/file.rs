//! TOML file configuration structures.
//!
//! These structs directly map to the `igreply.toml` file format. Every
//! section is optional; a missing file behaves like an empty one.

use igreply_core::config::{DEFAULT_REPLY_TEXT, GraphConfig};
use igreply_sdk::client::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Accounts this service may reply on behalf of.
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub graph: GraphApiConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:3000").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Largest `POST /webhook` body read in full, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

/// 16 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Inbound webhook section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Directory for the daily event logs.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Text sent in reply to every inbound message.
    #[serde(default = "default_reply_text")]
    pub reply_text: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            reply_text: default_reply_text(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_reply_text() -> String {
    DEFAULT_REPLY_TEXT.to_owned()
}

/// Graph API section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// In-flight sends allowed per account.
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
}

impl Default for GraphApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_sends: default_max_concurrent_sends(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_timeout_secs() -> u64 {
    GraphConfig::DEFAULT_TIMEOUT.as_secs()
}

fn default_max_concurrent_sends() -> usize {
    GraphConfig::DEFAULT_MAX_CONCURRENT_SENDS
}
