//! Backend families, senders, and the transformation machinery behind
//! them.
//!
//! ## Key components
//!
//! - [`Notifier`] - the delivery trait each backend family implements
//! - [`endpoint`] - structured endpoint transformation from overrides
//! - [`priority`] - per-family priority normalization tables
//! - [`AppRegistry`] - multi-application selection for the token-push
//!   family
//!
//! The family set is closed: a new provider is added by extending
//! [`BackendFamily`] and its transformation rules, not discovered
//! dynamically.

mod apps;
pub mod endpoint;
mod gotify;
pub mod http;
mod mattermost;
mod ntfy;
pub mod priority;
mod pushover;
mod relay;
mod traits;
pub mod types;

pub use apps::{AppRegistry, Selection};
pub use gotify::GotifySender;
pub use mattermost::MattermostSender;
pub use ntfy::NtfySender;
pub use pushover::PushoverSender;
pub use relay::RelaySender;
pub use traits::{Notifier, SendError};
pub use types::{InboundMessage, Notification, Overrides};

use std::fmt;

/// The closed set of backend families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackendFamily {
    /// Topic-addressed push (ntfy).
    TopicPush,
    /// Token-addressed push with multiple applications (Gotify).
    TokenPush,
    /// Room-addressed team-chat webhook (Mattermost).
    RoomWebhook,
    /// Specialized direct HTTP push (Pushover).
    DirectPush,
    /// Generic multi-provider relay; the only batching family.
    Relay,
}

impl BackendFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendFamily::TopicPush => "topic-push",
            BackendFamily::TokenPush => "token-push",
            BackendFamily::RoomWebhook => "room-webhook",
            BackendFamily::DirectPush => "direct-push",
            BackendFamily::Relay => "relay",
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
