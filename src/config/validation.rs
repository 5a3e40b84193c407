use thiserror::Error;

use super::models::Config;
use crate::notify::endpoint::Endpoint;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("backend `{backend}` has an invalid URL: {reason}")]
    InvalidUrl { backend: String, reason: String },
    #[error("gotify is configured without a URL or any application")]
    EmptyGotify,
    #[error("relay channel names must not be empty")]
    EmptyRelayChannel,
    #[error("routing.default_channel must not be empty")]
    EmptyDefaultChannel,
    #[error("queue.capacity must be at least 1")]
    ZeroCapacity,
}

/// Reject configurations that could not be wired into a dispatcher.
/// Runs once after deserialization; dispatch never sees an invalid
/// binding.
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.routing.default_channel.trim().is_empty() {
        return Err(ValidationError::EmptyDefaultChannel);
    }
    if config.queue.capacity == 0 {
        return Err(ValidationError::ZeroCapacity);
    }

    if let Some(ntfy) = &config.backends.ntfy {
        check_url("ntfy", &ntfy.url)?;
    }
    if let Some(gotify) = &config.backends.gotify {
        if gotify.url.is_none() && gotify.apps.is_empty() {
            return Err(ValidationError::EmptyGotify);
        }
        if let Some(url) = &gotify.url {
            check_url("gotify", url)?;
        }
        for (name, url) in &gotify.apps {
            check_url(&format!("gotify.apps.{name}"), url)?;
        }
    }
    if let Some(mattermost) = &config.backends.mattermost {
        check_url("mattermost", &mattermost.url)?;
    }
    if let Some(pushover) = &config.backends.pushover {
        check_url("pushover", &pushover.url)?;
    }
    if let Some(relay) = &config.backends.relay {
        check_url("relay", &relay.url)?;
        if relay.channels.keys().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::EmptyRelayChannel);
        }
    }
    Ok(())
}

fn check_url(backend: &str, url: &str) -> Result<(), ValidationError> {
    Endpoint::parse(url).map_err(|e| ValidationError::InvalidUrl {
        backend: backend.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}
