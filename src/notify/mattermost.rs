//! Room-webhook sender (Mattermost).
//!
//! Title and body are combined into the single webhook text field.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::endpoint::{self, Endpoint};
use super::traits::{Notifier, SendError};
use super::types::Notification;
use super::{BackendFamily, http};

pub struct MattermostSender {
    client: Client,
    base: Endpoint,
}

impl MattermostSender {
    pub fn new(client: Client, base: Endpoint) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl Notifier for MattermostSender {
    async fn send(&self, note: &Notification, _channels: &[String]) -> Result<(), SendError> {
        let target = endpoint::transform(BackendFamily::RoomWebhook, &self.base, &note.overrides)?;
        debug!(id = %note.id, endpoint = %target, "posting to mattermost");

        let text = if note.title.is_empty() {
            note.body.clone()
        } else {
            format!("{}: {}", note.title, note.body)
        };
        let mut request = self
            .client
            .post(target.url().clone())
            .json(&json!({ "text": text }));
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
