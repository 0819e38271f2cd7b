//! Application state shared across all request handlers.

use crate::config::LoadedConfig;
use igreply_core::credentials::CredentialResolver;
use igreply_core::dispatcher::EventDispatcher;
use igreply_core::env::ReadEnv;
use igreply_core::event_log::EventLogger;
use igreply_core::sender::GraphMessageSender;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
/// Nothing in it changes after start-up.
#[derive(Clone)]
pub struct AppState {
    /// Expected `hub.verify_token` for the subscription handshake.
    pub verify_token: Arc<str>,
    /// Handles `POST /webhook` deliveries.
    pub dispatcher: Arc<EventDispatcher>,
    /// Webhook bodies beyond this many bytes are not read.
    pub max_body_bytes: usize,
}

impl AppState {
    /// Wire the core components from the loaded configuration.
    ///
    /// `env` backs the per-account credential lookups.
    pub fn new<E>(config: &LoadedConfig, env: E) -> Self
    where
        E: ReadEnv + Send + Sync + 'static,
    {
        let sender = GraphMessageSender::new(
            config.accounts.clone(),
            CredentialResolver::new(env),
            &config.graph,
        );
        let dispatcher = EventDispatcher::new(
            EventLogger::new(&config.webhook.log_dir),
            Arc::new(sender),
            config.accounts.clone(),
            config.webhook.reply_text.clone(),
        );

        Self {
            verify_token: Arc::from(config.webhook.verify_token.as_str()),
            dispatcher: Arc::new(dispatcher),
            max_body_bytes: config.server.max_body_bytes,
        }
    }
}
