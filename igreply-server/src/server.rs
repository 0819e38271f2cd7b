//! Axum server setup and router configuration.

use crate::api;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Liveness probe
        .route("/", get(hello))
        .merge(api::router())
        // Add state to all routes
        .with_state(state)
}

#[derive(Serialize)]
struct HelloResponse {
    message: &'static str,
}

/// Returns a fixed greeting if the server is running.
async fn hello() -> impl IntoResponse {
    Json(HelloResponse {
        message: "Hello World",
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
