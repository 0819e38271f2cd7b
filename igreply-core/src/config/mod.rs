//! Configuration types for igreply.
//!
//! These types represent the validated runtime configuration shared by the
//! core components. Loading and parsing are handled by the server crate.

mod accounts;
mod graph;
mod webhook;

pub use accounts::{AccountId, AccountRegistry, InvalidAccountId};
pub use graph::GraphConfig;
pub use webhook::{DEFAULT_REPLY_TEXT, DEFAULT_VERIFY_TOKEN, WebhookConfig};
