//! Inbound message shape and dispatch-ready notification types.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::routing::ChannelField;

/// Marker prefix for override fields forwarded verbatim as HTTP
/// headers to header-capable backends.
const HEADER_OVERRIDE_PREFIX: &str = "X-";

/// A notification request as consumed from the ingest boundary.
///
/// `title` and `message` are the payload; `channels` selects targets
/// (absent, a comma-separated string, or a sequence); all remaining
/// fields are treated as override parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub channels: Option<ChannelField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_title() -> String {
    "Notification".to_string()
}

/// A notification ready for dispatch. Immutable once constructed;
/// one exists per queued message and is dropped when dispatch ends.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub received_at: OffsetDateTime,
    pub overrides: Overrides,
}

impl Notification {
    pub fn new(id: Uuid, received_at: OffsetDateTime, message: InboundMessage) -> Self {
        let overrides = Overrides::from_extra(&message.extra);
        Self {
            id,
            title: message.title,
            body: message.message,
            received_at,
            overrides,
        }
    }
}

/// Enumerated per-message override parameters.
///
/// The inbound shape carries an open field bag; only the fields below
/// are recognized, and each backend family reads only the ones it
/// understands. Unrecognized fields are ignored by contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// ntfy topic selector (`ntfy_topic`).
    pub topic: Option<String>,
    /// Gotify application selector (`gotify_app`).
    pub app: Option<String>,
    /// Raw Gotify app token (`gotify_token`).
    pub token: Option<String>,
    /// Mattermost room selector (`mattermost_channel`).
    pub room: Option<String>,
    /// Priority label or integer-like string (`priority`).
    pub priority: Option<String>,
    /// `X-*` fields forwarded as headers.
    pub headers: BTreeMap<String, String>,
}

impl Overrides {
    pub fn from_extra(extra: &Map<String, Value>) -> Self {
        let mut overrides = Self::default();
        for (key, value) in extra {
            let Some(text) = scalar_to_string(value) else {
                continue;
            };
            match key.as_str() {
                "ntfy_topic" => overrides.topic = Some(text),
                "gotify_app" => overrides.app = Some(text),
                "gotify_token" => overrides.token = Some(text),
                "mattermost_channel" => overrides.room = Some(text),
                "priority" => overrides.priority = Some(text),
                _ if key.starts_with(HEADER_OVERRIDE_PREFIX) => {
                    overrides.headers.insert(key.clone(), text);
                }
                _ => {}
            }
        }
        overrides
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
