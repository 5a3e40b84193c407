//! Test producer: posts a notification to a running instance.

use serde_json::json;
use tracing::info;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn send(
    endpoint: &str,
    title: &str,
    message: &str,
    channels: Option<&str>,
    priority: Option<&str>,
) -> Result<(), AnyError> {
    let mut payload = json!({
        "title": title,
        "message": message,
    });
    if let Some(channels) = channels {
        payload["channels"] = json!(channels);
    }
    if let Some(priority) = priority {
        payload["priority"] = json!(priority);
    }

    let url = format!("{}/notify", endpoint.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status.is_success() {
        info!(%status, body, "notification accepted");
        Ok(())
    } else {
        Err(format!("ingest returned {status}: {body}").into())
    }
}
