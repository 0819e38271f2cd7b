//! Wire types for the Instagram messaging webhook and Send API.
//!
//! The `client` feature adds [`client::GraphClient`], a thin `reqwest`
//! wrapper around the Graph API messaging endpoint.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
