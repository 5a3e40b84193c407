//! In-process inbound queue and the single-consumer loop.
//!
//! The ingest API pushes envelopes into a bounded channel; one
//! consumer task pulls them and runs each dispatch to completion
//! before taking the next message, so at most one dispatch is ever in
//! flight. A message is taken off the queue before processing; the
//! dispatch result is observable through logs and metrics, never
//! through the ingest call.

use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::dispatch::Dispatcher;
use crate::notify::types::{InboundMessage, Notification};
use crate::routing;

/// One queued inbound message with its delivery id.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub id: Uuid,
    pub received_at: OffsetDateTime,
    pub message: InboundMessage,
}

impl Envelope {
    pub fn new(message: InboundMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            received_at: OffsetDateTime::now_utc(),
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error("queue is closed")]
    Closed,
}

/// Sender half handed to the ingest API.
#[derive(Clone)]
pub struct Inbox {
    tx: mpsc::Sender<Envelope>,
}

impl Inbox {
    /// Queue an envelope, waiting when the queue is full
    /// (backpressure against the ingest side).
    pub async fn push(&self, envelope: Envelope) -> Result<(), EnqueueError> {
        self.tx.send(envelope).await.map_err(|_| EnqueueError::Closed)
    }

    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Create the queue pair: the inbox for producers and the receiver
/// for the consumer loop.
pub fn channel(capacity: usize) -> (Inbox, mpsc::Receiver<Envelope>) {
    let (tx, rx) = mpsc::channel(capacity);
    (Inbox { tx }, rx)
}

/// Consume messages one at a time until every inbox clone is dropped.
///
/// No error here is fatal: dispatch failures are per-channel outcomes
/// and the loop continues with the next message.
pub async fn run_consumer(
    mut rx: mpsc::Receiver<Envelope>,
    dispatcher: Arc<Dispatcher>,
    default_channel: String,
) {
    info!(default_channel, "consumer started");
    while let Some(envelope) = rx.recv().await {
        let channels = routing::resolve(envelope.message.channels.as_ref(), &default_channel);
        let note = Notification::new(envelope.id, envelope.received_at, envelope.message);
        let queued_ms = (OffsetDateTime::now_utc() - note.received_at).whole_milliseconds() as i64;
        info!(id = %note.id, title = %note.title, channels = ?channels, queued_ms, "dispatching");

        let report = dispatcher.dispatch(&note, &channels).await;
        info!(
            id = %note.id,
            delivered = report.delivered(),
            failed = report.failed(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "dispatch complete"
        );
    }
    info!("consumer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_gets_a_fresh_id() {
        let message: InboundMessage =
            serde_json::from_value(serde_json::json!({ "message": "Y" })).unwrap();
        let first = Envelope::new(message.clone());
        let second = Envelope::new(message);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn push_fails_once_the_consumer_is_gone() {
        let (inbox, rx) = channel(4);
        drop(rx);
        let message: InboundMessage =
            serde_json::from_value(serde_json::json!({ "message": "Y" })).unwrap();
        assert!(matches!(
            inbox.push(Envelope::new(message)).await,
            Err(EnqueueError::Closed)
        ));
        assert!(!inbox.is_open());
    }
}
