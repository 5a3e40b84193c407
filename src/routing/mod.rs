//! Channel resolution for inbound messages.
//!
//! Extracts the ordered list of requested channel identifiers from a
//! message, substituting the configured default channel when the field
//! is absent, empty, or not a recognized shape. Resolution never fails
//! and never yields an empty list.

use serde::Deserialize;
use serde_json::Value;

/// The `channels` field of an inbound message.
///
/// The `Other` variant absorbs any shape that is neither a string nor
/// a sequence of strings; resolution treats it like an absent field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChannelField {
    Many(Vec<String>),
    One(String),
    Other(Value),
}

/// Resolve the requested channel identifiers.
///
/// A comma-separated string is split, trimmed, and stripped of empty
/// segments with order preserved. A sequence passes through unchanged.
/// Duplicates are kept; dispatch is idempotent under repeated
/// identifiers for the same family.
pub fn resolve(channels: Option<&ChannelField>, default_channel: &str) -> Vec<String> {
    let fallback = || vec![default_channel.to_string()];
    match channels {
        None | Some(ChannelField::Other(_)) => fallback(),
        Some(ChannelField::One(raw)) => {
            let split: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect();
            if split.is_empty() { fallback() } else { split }
        }
        Some(ChannelField::Many(list)) => {
            if list.is_empty() {
                fallback()
            } else {
                list.clone()
            }
        }
    }
}
