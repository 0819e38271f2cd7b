//! Inbound event handling.
//!
//! `EventDispatcher` is a single-pass, stateless pipeline per delivery:
//! log the raw event, pick out genuine inbound Instagram messages addressed
//! to a registered account, and answer each one with the configured text.
//! Nothing here can fail the webhook response; every error is logged and
//! swallowed.

use igreply_sdk::objects::{self, MessagingEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::AccountRegistry;
use crate::event_log::EventLogger;
use crate::sender::MessageSender;

/// What happened to one delivery. Used for diagnostics only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub logged: bool,
    pub replies_sent: usize,
    pub replies_failed: usize,
    pub echoes_skipped: usize,
    pub unregistered: usize,
    pub malformed: usize,
}

pub struct EventDispatcher {
    logger: EventLogger,
    sender: Arc<dyn MessageSender>,
    registry: AccountRegistry,
    reply_text: String,
}

impl EventDispatcher {
    pub fn new(
        logger: EventLogger,
        sender: Arc<dyn MessageSender>,
        registry: AccountRegistry,
        reply_text: impl Into<String>,
    ) -> Self {
        Self {
            logger,
            sender,
            registry,
            reply_text: reply_text.into(),
        }
    }

    pub async fn dispatch(&self, event: Value) -> DispatchReport {
        let mut report = DispatchReport::default();

        match self.logger.append(&event).await {
            Ok(path) => {
                report.logged = true;
                info!(file = %path.display(), "Webhook event logged successfully");
            }
            Err(e) => error!(error = %e, "Error logging webhook event"),
        }

        if !objects::is_instagram(&event) {
            debug!(object = ?event.get("object"), "Ignoring non-instagram delivery");
            return report;
        }

        for parsed in objects::messaging_events(&event) {
            match parsed {
                Ok(messaging) => self.handle_messaging_event(&messaging, &mut report).await,
                Err(e) => {
                    report.malformed += 1;
                    debug!(error = %e, "Skipping malformed messaging event");
                }
            }
        }

        debug!(?report, "Webhook delivery processed");
        report
    }

    async fn handle_messaging_event(&self, event: &MessagingEvent, report: &mut DispatchReport) {
        if event.is_echo() {
            report.echoes_skipped += 1;
            return;
        }
        if !event.is_inbound_message() {
            return;
        }

        let sender_id = event.sender.id.as_str();
        let recipient_id = event.recipient.id.as_str();
        if !self.registry.contains(recipient_id) {
            report.unregistered += 1;
            warn!(
                account_id = recipient_id,
                sender_id, "Message for an unregistered account, not replying"
            );
            return;
        }

        match self
            .sender
            .send_text(sender_id, &self.reply_text, recipient_id)
            .await
        {
            Ok(_) => report.replies_sent += 1,
            Err(e) => {
                report.replies_failed += 1;
                error!(
                    account_id = recipient_id,
                    sender_id,
                    error = %e,
                    "Failed to send reply"
                );
            }
        }
    }
}
