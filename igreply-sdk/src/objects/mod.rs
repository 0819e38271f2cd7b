pub mod send_message;
pub mod verification;
pub mod webhook;

pub use send_message::{OutgoingMessage, SendMessageRequest};
pub use verification::VerificationQuery;
pub use webhook::{Message, MessagingEvent, Participant, is_instagram, messaging_events};

/// The `object` value carried by Instagram webhook deliveries.
pub const INSTAGRAM_OBJECT: &str = "instagram";

/// The `hub.mode` value sent by the platform during the subscription handshake.
pub const SUBSCRIBE_MODE: &str = "subscribe";
