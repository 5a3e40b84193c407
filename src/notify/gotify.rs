//! Token-push sender (Gotify) with multi-application selection.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::apps::AppRegistry;
use super::endpoint;
use super::traits::{Notifier, SendError};
use super::types::Notification;
use super::{BackendFamily, http};

pub struct GotifySender {
    client: Client,
    apps: AppRegistry,
}

impl GotifySender {
    pub fn new(client: Client, apps: AppRegistry) -> Self {
        Self { client, apps }
    }
}

#[async_trait]
impl Notifier for GotifySender {
    async fn send(&self, note: &Notification, _channels: &[String]) -> Result<(), SendError> {
        let Some((selection, base)) = self.apps.resolve(note.overrides.app.as_deref()) else {
            return Err(SendError::Unconfigured(
                "no gotify application registered".to_string(),
            ));
        };
        let target = endpoint::transform(BackendFamily::TokenPush, base, &note.overrides)?;
        debug!(id = %note.id, endpoint = %target, ?selection, "posting to gotify");

        let payload = json!({
            "title": note.title,
            "message": note.body,
        });
        let mut request = self.client.post(target.url().clone()).json(&payload);
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
