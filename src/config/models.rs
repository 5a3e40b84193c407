use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub backends: BackendsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

/// Inbound queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Bounded capacity of the in-process queue; producers wait when
    /// it is full.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    64
}

/// Channel resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
    /// Channel used when a message names no channels at all.
    #[serde(default = "default_channel")]
    pub default_channel: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_channel: default_channel(),
        }
    }
}

fn default_channel() -> String {
    "ntfy".to_string()
}

/// Backend call configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Per-call request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_connect_timeout_secs() -> u64 {
    3
}

/// Backend bindings. A family with no section here is simply not
/// configured; messages addressed to it get an unconfigured outcome.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BackendsConfig {
    pub ntfy: Option<NtfyConfig>,
    pub gotify: Option<GotifyConfig>,
    pub mattermost: Option<MattermostConfig>,
    pub pushover: Option<PushoverConfig>,
    pub relay: Option<RelayConfig>,
}

/// Topic-push backend (Apprise-style URL, topic as final segment).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NtfyConfig {
    pub url: String,
}

/// Token-push backend with multiple applications.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GotifyConfig {
    /// Legacy single-application slot.
    pub url: Option<String>,
    /// Named applications, app token as the URL's final segment.
    #[serde(default)]
    pub apps: BTreeMap<String, String>,
}

/// Room-webhook backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MattermostConfig {
    pub url: String,
}

/// Direct push backend (`pover://USER@TOKEN`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PushoverConfig {
    pub url: String,
}

/// Multi-provider relay backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Relay ingest endpoint.
    pub url: String,
    /// Channel name to provider URL, forwarded in the relay payload.
    #[serde(default)]
    pub channels: BTreeMap<String, String>,
}
