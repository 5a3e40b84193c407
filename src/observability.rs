//! Per-channel dispatch metrics.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;

/// Upper bounds (milliseconds) for the dispatch duration histogram.
const BUCKET_BOUNDS_MS: [u64; 6] = [5, 25, 100, 500, 2_500, 10_000];

/// Counters and a duration histogram, labeled by channel identifier.
/// Updated once per dispatch per channel.
#[derive(Debug, Default)]
pub struct Metrics {
    channels: RwLock<BTreeMap<String, ChannelStats>>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ChannelStats {
    pub seen: u64,
    pub delivered: u64,
    pub errored: u64,
    /// One count per bound in the histogram, plus an overflow bucket.
    pub duration_buckets: [u64; BUCKET_BOUNDS_MS.len() + 1],
    pub duration_sum_ms: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, channel: &str) {
        self.with(channel, |stats| stats.seen += 1);
    }

    pub fn delivered(&self, channel: &str) {
        self.with(channel, |stats| stats.delivered += 1);
    }

    pub fn errored(&self, channel: &str) {
        self.with(channel, |stats| stats.errored += 1);
    }

    pub fn observe(&self, channel: &str, elapsed: Duration) {
        let ms = elapsed.as_millis() as u64;
        self.with(channel, |stats| {
            let bucket = BUCKET_BOUNDS_MS
                .iter()
                .position(|bound| ms <= *bound)
                .unwrap_or(BUCKET_BOUNDS_MS.len());
            stats.duration_buckets[bucket] += 1;
            stats.duration_sum_ms += ms;
        });
    }

    pub fn snapshot(&self) -> BTreeMap<String, ChannelStats> {
        self.channels
            .read()
            .map(|channels| channels.clone())
            .unwrap_or_default()
    }

    fn with(&self, channel: &str, update: impl FnOnce(&mut ChannelStats)) {
        if let Ok(mut channels) = self.channels.write() {
            update(channels.entry(channel.to_string()).or_default());
        }
    }
}
