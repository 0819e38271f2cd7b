//! Subscription handshake.

use igreply_sdk::objects::{SUBSCRIBE_MODE, VerificationQuery};

/// Outcome of a `GET /webhook` handshake request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Mode and token match: answer 200 with the challenge verbatim.
    Verified { challenge: String },
    /// Mode or token missing: not a handshake, answer 200 with no body.
    NotASubscriptionProbe,
    /// Mode or token wrong: answer 403 without echoing the challenge.
    Forbidden,
}

/// Check a handshake request against the configured verify token.
///
/// Empty `hub.mode` / `hub.verify_token` values count as absent.
pub fn verify_subscription(query: &VerificationQuery, expected_token: &str) -> Verification {
    let mode = query.mode.as_deref().filter(|m| !m.is_empty());
    let token = query.verify_token.as_deref().filter(|t| !t.is_empty());

    let (Some(mode), Some(token)) = (mode, token) else {
        return Verification::NotASubscriptionProbe;
    };

    if mode == SUBSCRIBE_MODE && constant_time_eq(token, expected_token) {
        Verification::Verified {
            challenge: query.challenge.clone().unwrap_or_default(),
        }
    } else {
        Verification::Forbidden
    }
}

/// Compares every byte regardless of where the first mismatch is.
fn constant_time_eq(left: &str, right: &str) -> bool {
    let left = left.as_bytes();
    let right = right.as_bytes();
    let mut diff = left.len() ^ right.len();
    for index in 0..left.len().max(right.len()) {
        let l = left.get(index).copied().unwrap_or(0);
        let r = right.get(index).copied().unwrap_or(0);
        diff |= usize::from(l ^ r);
    }
    diff == 0
}
