//! Multi-provider relay sender (Apprise API style).
//!
//! The relay is the batching family: one call per dispatch carries the
//! provider URLs for every requested relay channel along with the
//! title and body.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

use super::endpoint::Endpoint;
use super::http;
use super::traits::{Notifier, SendError};
use super::types::Notification;

pub struct RelaySender {
    client: Client,
    endpoint: Endpoint,
    channels: BTreeMap<String, String>,
}

impl RelaySender {
    pub fn new(client: Client, endpoint: Endpoint, channels: BTreeMap<String, String>) -> Self {
        Self {
            client,
            endpoint,
            channels,
        }
    }

    /// Channel names this relay serves, for binding construction.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    fn urls_for(&self, channels: &[String]) -> Vec<&str> {
        channels
            .iter()
            .filter_map(|channel| self.channels.get(channel).map(String::as_str))
            .collect()
    }
}

#[async_trait]
impl Notifier for RelaySender {
    async fn send(&self, note: &Notification, channels: &[String]) -> Result<(), SendError> {
        let urls = self.urls_for(channels);
        if urls.is_empty() {
            return Err(SendError::Unconfigured(
                "no relay URL for any requested channel".to_string(),
            ));
        }
        debug!(id = %note.id, endpoint = %self.endpoint, count = urls.len(), "posting to relay");

        let payload = json!({
            "urls": urls,
            "title": note.title,
            "body": note.body,
        });
        let mut request = self
            .client
            .post(self.endpoint.url().clone())
            .json(&payload);
        if let Some((user, pass)) = self.endpoint.basic_auth() {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SendError::Request(e.to_string()))?;
        http::check_status(response).await
    }
}
