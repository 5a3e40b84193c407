use async_trait::async_trait;
use thiserror::Error;

use super::endpoint::EndpointError;
use super::types::Notification;

/// Errors surfaced by a backend sender for one delivery attempt.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] EndpointError),
    #[error("request failed: {0}")]
    Request(String),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend not configured: {0}")]
    Unconfigured(String),
}

/// One backend family's delivery capability.
///
/// `channels` carries every channel identifier in the bucket being
/// served; batching families use the full list, one-call-per-message
/// families ignore it. Implementations are called at most once per
/// request per bucket and are never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, note: &Notification, channels: &[String]) -> Result<(), SendError>;
}
