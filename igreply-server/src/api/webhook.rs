use axum::{
    Json,
    body::{self, Body},
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use igreply_core::verifier::{self, Verification};
use igreply_sdk::objects::VerificationQuery;
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;

/// `GET /webhook`: answer the platform's subscription handshake.
pub async fn verify_subscription(
    State(state): State<AppState>,
    Query(query): Query<VerificationQuery>,
) -> Response {
    match verifier::verify_subscription(&query, &state.verify_token) {
        Verification::Verified { challenge } => {
            tracing::info!("WEBHOOK_VERIFIED");
            (StatusCode::OK, challenge).into_response()
        }
        Verification::NotASubscriptionProbe => StatusCode::OK.into_response(),
        Verification::Forbidden => {
            tracing::warn!(mode = ?query.mode, "Webhook verification failed");
            (StatusCode::FORBIDDEN, "Forbidden").into_response()
        }
    }
}

/// Delivery acknowledgement.
#[derive(Serialize)]
pub struct Ack {
    status: &'static str,
}

/// `POST /webhook`: accept an event delivery.
///
/// The response is always `200 {"status":"ok"}`: a non-2xx status makes the
/// platform redeliver. A body that is not JSON is logged as a JSON string.
/// A body over `max_body_bytes`, or one that fails mid-read, is replaced by a
/// placeholder string in the log.
pub async fn receive_event(State(state): State<AppState>, request_body: Body) -> Json<Ack> {
    let event = match body::to_bytes(request_body, state.max_body_bytes).await {
        Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Webhook body is not valid JSON");
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
        Err(e) => {
            tracing::warn!(
                error = %e,
                limit = state.max_body_bytes,
                "Webhook body could not be read"
            );
            Value::String(format!("<unreadable webhook body: {e}>"))
        }
    };

    state.dispatcher.dispatch(event).await;

    Json(Ack { status: "ok" })
}
