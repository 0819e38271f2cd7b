//! Send API request body.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::Participant;

/// `POST /<account>/messages` body: `{"recipient": {"id"}, "message": {"text"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub recipient: Participant,
    pub message: OutgoingMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
}

impl SendMessageRequest {
    /// A plain text message addressed to `recipient_id`.
    pub fn text(recipient_id: impl Into<CompactString>, text: impl Into<String>) -> Self {
        Self {
            recipient: Participant {
                id: recipient_id.into(),
            },
            message: OutgoingMessage { text: text.into() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_shape() {
        let body = SendMessageRequest::text("U1", "oii");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"recipient": {"id": "U1"}, "message": {"text": "oii"}})
        );
    }
}
