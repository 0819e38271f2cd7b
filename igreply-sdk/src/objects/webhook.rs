//! Typed view over an inbound webhook delivery.
//!
//! Deliveries are walked on the raw JSON and each messaging event is parsed
//! on its own, so one malformed event never hides its siblings. Only the
//! fields the dispatcher reads are modelled; the raw JSON is what gets
//! written to the event log.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::INSTAGRAM_OBJECT;

/// Whether the delivery's `object` is the Instagram product.
pub fn is_instagram(delivery: &Value) -> bool {
    delivery.get("object").and_then(Value::as_str) == Some(INSTAGRAM_OBJECT)
}

/// Messaging events across all entries of a delivery, in delivery order.
///
/// Entries without a `messaging` array are skipped. Each event is parsed
/// independently; a malformed one yields `Err` and iteration continues.
pub fn messaging_events(
    delivery: &Value,
) -> impl Iterator<Item = Result<MessagingEvent, serde_json::Error>> {
    delivery
        .get("entry")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get("messaging").and_then(Value::as_array))
        .flatten()
        .map(MessagingEvent::deserialize)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    pub recipient: Participant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl MessagingEvent {
    /// A message written by someone else to the receiving account.
    ///
    /// Events without a `message` (reads, reactions, postbacks) and echoes of
    /// the account's own outgoing messages are excluded.
    pub fn is_inbound_message(&self) -> bool {
        self.message.as_ref().is_some_and(|m| !m.is_echo())
    }

    /// The account's own outgoing message reflected back.
    pub fn is_echo(&self) -> bool {
        self.message.as_ref().is_some_and(Message::is_echo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: CompactString,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_echo: Option<bool>,
}

impl Message {
    /// Only an explicit `"is_echo": true` marks an echo.
    pub fn is_echo(&self) -> bool {
        self.is_echo == Some(true)
    }
}
