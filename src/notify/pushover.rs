//! Direct push sender (Pushover).
//!
//! Credentials come from a `pover://USER@TOKEN` endpoint (or the user
//! in the path, `pover://TOKEN/USER`); the message itself is a form
//! POST against the fixed Pushover message API.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::endpoint::Endpoint;
use super::http;
use super::priority;
use super::traits::{Notifier, SendError};
use super::types::Notification;

const API_URL: &str = "https://api.pushover.net/1/messages.json";

pub struct PushoverSender {
    client: Client,
    token: String,
    user: String,
}

impl PushoverSender {
    pub fn from_endpoint(client: Client, endpoint: &Endpoint) -> Result<Self, SendError> {
        let token = endpoint
            .url()
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| SendError::Unconfigured("pushover endpoint has no token".into()))?;
        let user = endpoint
            .username()
            .map(str::to_string)
            .or_else(|| {
                let path = endpoint.url().path().trim_matches('/');
                (!path.is_empty()).then(|| path.to_string())
            })
            .ok_or_else(|| SendError::Unconfigured("pushover endpoint has no user key".into()))?;
        Ok(Self {
            client,
            token,
            user,
        })
    }
}

#[async_trait]
impl Notifier for PushoverSender {
    async fn send(&self, note: &Notification, _channels: &[String]) -> Result<(), SendError> {
        debug!(id = %note.id, "posting to pushover");

        let mut form: Vec<(&str, String)> = vec![
            ("token", self.token.clone()),
            ("user", self.user.clone()),
            ("message", note.body.clone()),
            ("html", "1".to_string()),
        ];
        if !note.title.is_empty() {
            form.push(("title", note.title.clone()));
        }
        if let Some(raw) = &note.overrides.priority {
            form.push(("priority", priority::pushover(raw).to_string()));
        }

        let response = self
            .client
            .post(API_URL)
            .form(&form)
            .send()
            .await
            .map_err(|e| SendError::Request(e.to_string()))?;
        http::check_status(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender(url: &str) -> PushoverSender {
        let endpoint = Endpoint::parse(url).unwrap();
        PushoverSender::from_endpoint(Client::new(), &endpoint).unwrap()
    }

    #[test]
    fn parses_user_at_token() {
        let sender = sender("pover://userkey@apptoken");
        assert_eq!(sender.user, "userkey");
        assert_eq!(sender.token, "apptoken");
    }

    #[test]
    fn parses_user_from_path() {
        let sender = sender("pover://apptoken/userkey");
        assert_eq!(sender.user, "userkey");
        assert_eq!(sender.token, "apptoken");
    }

    #[test]
    fn missing_user_is_rejected() {
        let endpoint = Endpoint::parse("pover://apptoken").unwrap();
        assert!(matches!(
            PushoverSender::from_endpoint(Client::new(), &endpoint),
            Err(SendError::Unconfigured(_))
        ));
    }
}
