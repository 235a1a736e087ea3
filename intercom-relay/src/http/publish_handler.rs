use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::http::RelayState;

/// `POST /api/signaling`: fan one JSON document out to every subscriber.
///
/// The body is only checked for being JSON. It is re-encoded compactly so it
/// always fits on a single `data:` line.
pub async fn publish_handler(
    State(state): State<RelayState>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let document: Value = match serde_json::from_slice(&body) {
        Ok(document) => document,
        Err(e) => {
            debug!("Rejecting publish: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": e.to_string() })),
            );
        }
    };

    let payload = document.to_string();
    let delivered = state.hub.publish(&payload);
    trace!("Published {} bytes to {} subscribers", payload.len(), delivered);

    (StatusCode::OK, Json(json!({ "ok": true })))
}
