use serde::Serialize;
use uuid::Uuid;

/// 202 response for an accepted notification. Accepted means queued;
/// delivery outcomes are observable through logs and `/metrics`.
#[derive(Debug, Serialize)]
pub struct NotifyAcceptedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
