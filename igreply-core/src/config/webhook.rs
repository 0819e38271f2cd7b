//! Inbound webhook configuration.

use std::fmt;
use std::path::PathBuf;

/// Verify token used when `WEBHOOK_VERIFY_TOKEN` is unset. Deployments must
/// override it.
pub const DEFAULT_VERIFY_TOKEN: &str = "your_random_verify_token";

/// Text sent back to every genuine inbound message.
pub const DEFAULT_REPLY_TEXT: &str = "oii";

#[derive(Clone)]
pub struct WebhookConfig {
    /// Shared secret echoed by the platform during the handshake.
    pub verify_token: String,
    /// Directory holding the daily `webhook_<date>.txt` logs.
    pub log_dir: PathBuf,
    pub reply_text: String,
}

impl WebhookConfig {
    pub fn uses_default_verify_token(&self) -> bool {
        self.verify_token == DEFAULT_VERIFY_TOKEN
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            verify_token: DEFAULT_VERIFY_TOKEN.to_owned(),
            log_dir: PathBuf::from("logs"),
            reply_text: DEFAULT_REPLY_TEXT.to_owned(),
        }
    }
}

impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("verify_token", &"<redacted>")
            .field("log_dir", &self.log_dir)
            .field("reply_text", &self.reply_text)
            .finish()
    }
}
