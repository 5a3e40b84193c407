//! Direct topic-push sender (ntfy).
//!
//! Posts the raw message body to the topic URL. The title travels in
//! a `Title` header, markdown rendering is always requested, and any
//! `X-*` overrides are forwarded as headers.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::endpoint::{self, Endpoint};
use super::traits::{Notifier, SendError};
use super::types::Notification;
use super::{BackendFamily, http};

pub struct NtfySender {
    client: Client,
    base: Endpoint,
}

impl NtfySender {
    pub fn new(client: Client, base: Endpoint) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl Notifier for NtfySender {
    async fn send(&self, note: &Notification, _channels: &[String]) -> Result<(), SendError> {
        let target = endpoint::transform(BackendFamily::TopicPush, &self.base, &note.overrides)?;
        debug!(id = %note.id, endpoint = %target, "posting to ntfy");

        let mut request = self
            .client
            .post(target.url().clone())
            .header("Title", note.title.as_str())
            .header("X-Markdown", "true")
            .body(note.body.clone());
        for (name, value) in &note.overrides.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some((user, pass)) = target.basic_auth() {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SendError::Request(e.to_string()))?;
        http::check_status(response).await
    }
}
