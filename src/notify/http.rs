//! Shared HTTP client for backend senders.

use reqwest::{Client, Response};
use std::time::Duration;

use super::traits::SendError;

const MAX_DIAGNOSTIC_BODY: usize = 256;

/// Client settings applied to every backend call.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(5),
            user_agent: format!("herald/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Build the client shared by all senders. Every backend call is
/// bounded by the request timeout so one unreachable provider cannot
/// stall the consumer.
pub fn build_client(settings: &HttpSettings) -> Result<Client, SendError> {
    Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .user_agent(&settings.user_agent)
        .build()
        .map_err(|e| SendError::Request(e.to_string()))
}

/// Treat any non-success status as a delivery failure, capturing a
/// truncated response body for diagnostics.
pub async fn check_status(response: Response) -> Result<(), SendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_DIAGNOSTIC_BODY {
        let mut cut = MAX_DIAGNOSTIC_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    Err(SendError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let settings = HttpSettings::default();
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert!(settings.user_agent.starts_with("herald/"));
    }
}
