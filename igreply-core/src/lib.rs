#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod env;
pub mod event_log;
pub mod sender;
pub mod verifier;
