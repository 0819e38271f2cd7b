//! HTTP API handlers.
//!
//! # Endpoints
//!
//! - `GET  /webhook` – subscription handshake
//! - `POST /webhook` – event delivery, always acknowledged with 200

use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::state::AppState;

mod webhook;

/// Build the webhook router.
///
/// The delivery handler enforces `AppState::max_body_bytes` itself.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/webhook",
            get(webhook::verify_subscription).post(webhook::receive_event),
        )
        .layer(DefaultBodyLimit::disable())
}
