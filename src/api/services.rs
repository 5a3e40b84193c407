use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use super::error::ApiError;
use super::models::{HealthResponse, NotifyAcceptedResponse};
use super::state::AppState;
use crate::notify::InboundMessage;
use crate::queue::Envelope;

const MAX_PAYLOAD_BYTES: usize = 256 * 1024;

/// Notification ingest endpoint (POST /notify).
///
/// Accepts the queued-notification shape: `title`, `message`, an
/// optional `channels` field (comma-separated string or sequence),
/// and any override fields. The message is queued for the consumer;
/// 202 means accepted, not delivered.
pub async fn notify(
    State(state): State<AppState>,
    body: axum::body::Body,
) -> Result<impl IntoResponse, ApiError> {
    // Decompression is handled by the middleware layer; the size cap
    // applies to the decompressed payload.
    let bytes = axum::body::to_bytes(body, MAX_PAYLOAD_BYTES)
        .await
        .map_err(body_read_error)?;
    let message: InboundMessage = serde_json::from_slice(&bytes)?;

    let envelope = Envelope::new(message);
    let id = envelope.id;
    state
        .inbox
        .push(envelope)
        .await
        .map_err(|_| ApiError::QueueUnavailable)?;

    debug!(%id, "notification accepted");
    Ok((StatusCode::ACCEPTED, Json(NotifyAcceptedResponse { id })))
}

/// Map a body read failure to an API error: 413 only when the length
/// limit was hit, anything else (a broken or truncated body) is a bad
/// request.
fn body_read_error(error: axum::Error) -> ApiError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&error);
    while let Some(inner) = source {
        if inner.is::<http_body_util::LengthLimitError>() {
            return ApiError::PayloadTooLarge;
        }
        source = inner.source();
    }
    ApiError::InvalidPayload(format!("failed to read request body: {error}"))
}

/// Liveness probe (GET /healthz).
pub async fn healthz() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness probe (GET /readyz): ready while the consumer's queue is
/// accepting messages.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.inbox.is_open() {
        (StatusCode::OK, Json(HealthResponse { status: "ready" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
            }),
        )
    }
}

/// Metrics snapshot (GET /metrics), one entry per channel identifier.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
