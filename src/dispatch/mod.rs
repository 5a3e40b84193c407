//! Multi-backend dispatch coordination.
//!
//! The dispatcher partitions resolved channels into family buckets,
//! calls each configured family at most once per request, isolates
//! per-bucket failures, and attributes an outcome to every channel.
//! It is built once at startup from configuration and holds no
//! mutable state across requests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::notify::{BackendFamily, Notification, Notifier};
use crate::observability::Metrics;

/// Per-channel result of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delivered,
    /// Transformation or delivery failure, with the reason captured.
    Failed(String),
    /// No backend binding exists for the channel; never attempted.
    Unconfigured,
}

/// Aggregated result of one dispatch. The elapsed duration is
/// measured once across the whole dispatch, not per bucket.
#[derive(Debug)]
pub struct DispatchReport {
    pub outcomes: BTreeMap<String, Outcome>,
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.outcomes
            .values()
            .filter(|outcome| **outcome == Outcome::Delivered)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// Channel-to-family bindings plus one sender per configured family.
pub struct Dispatcher {
    bindings: BTreeMap<String, BackendFamily>,
    senders: BTreeMap<BackendFamily, Arc<dyn Notifier>>,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            bindings: BTreeMap::new(),
            senders: BTreeMap::new(),
            metrics,
        }
    }

    /// Bind a channel identifier to a backend family. Identifiers are
    /// compared case-sensitively.
    pub fn bind(&mut self, channel: impl Into<String>, family: BackendFamily) {
        self.bindings.insert(channel.into(), family);
    }

    /// Register the sender for a family.
    pub fn register(&mut self, family: BackendFamily, sender: Arc<dyn Notifier>) {
        self.senders.insert(family, sender);
    }

    pub fn is_bound(&self, channel: &str) -> bool {
        self.bindings.contains_key(channel)
    }

    /// Dispatch one notification to every resolved channel.
    ///
    /// A failure in one bucket never prevents sibling buckets from
    /// being attempted; the failure is attributed to every channel in
    /// the failing bucket. Unconfigured channels are recorded without
    /// a delivery attempt.
    pub async fn dispatch(&self, note: &Notification, channels: &[String]) -> DispatchReport {
        let started = Instant::now();
        let mut outcomes: BTreeMap<String, Outcome> = BTreeMap::new();
        let mut buckets: Vec<(BackendFamily, Vec<String>)> = Vec::new();

        for channel in channels {
            match self.bindings.get(channel.as_str()) {
                Some(family) => match buckets.iter_mut().find(|(f, _)| f == family) {
                    Some((_, members)) => {
                        if !members.contains(channel) {
                            members.push(channel.clone());
                        }
                    }
                    None => buckets.push((*family, vec![channel.clone()])),
                },
                None => {
                    warn!(id = %note.id, channel = %channel, "no backend configured for channel");
                    outcomes.insert(channel.clone(), Outcome::Unconfigured);
                }
            }
        }

        for (family, members) in &buckets {
            let Some(sender) = self.senders.get(family) else {
                // Binding without a sender is a wiring gap; report it
                // like any other missing configuration.
                warn!(id = %note.id, family = %family, "bound family has no sender");
                for channel in members {
                    outcomes.insert(channel.clone(), Outcome::Unconfigured);
                }
                continue;
            };
            match sender.send(note, members).await {
                Ok(()) => {
                    info!(id = %note.id, family = %family, channels = ?members, "delivered");
                    for channel in members {
                        outcomes.insert(channel.clone(), Outcome::Delivered);
                    }
                }
                Err(error) => {
                    warn!(
                        id = %note.id,
                        family = %family,
                        channels = ?members,
                        error = %error,
                        "delivery failed"
                    );
                    let reason = error.to_string();
                    for channel in members {
                        outcomes.insert(channel.clone(), Outcome::Failed(reason.clone()));
                    }
                }
            }
        }

        let elapsed = started.elapsed();
        for (channel, outcome) in &outcomes {
            self.metrics.seen(channel);
            match outcome {
                Outcome::Delivered => self.metrics.delivered(channel),
                Outcome::Failed(_) | Outcome::Unconfigured => self.metrics.errored(channel),
            }
            self.metrics.observe(channel, elapsed);
        }

        DispatchReport { outcomes, elapsed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SendError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use time::OffsetDateTime;
    use uuid::Uuid;

    /// Records every call it receives; fails when told to.
    struct FakeSender {
        calls: Mutex<Vec<Vec<String>>>,
        fail: bool,
    }

    impl FakeSender {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail,
            })
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeSender {
        async fn send(&self, _note: &Notification, channels: &[String]) -> Result<(), SendError> {
            self.calls.lock().unwrap().push(channels.to_vec());
            if self.fail {
                Err(SendError::Request("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn note() -> Notification {
        let message = serde_json::from_value(json!({ "title": "X", "message": "Y" })).unwrap();
        Notification::new(Uuid::new_v4(), OffsetDateTime::now_utc(), message)
    }

    fn channels(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[tokio::test]
    async fn unconfigured_channels_are_reported_not_attempted() {
        let metrics = Arc::new(Metrics::new());
        let sender = FakeSender::new(false);
        let mut dispatcher = Dispatcher::new(metrics.clone());
        dispatcher.bind("ntfy", BackendFamily::TopicPush);
        dispatcher.register(BackendFamily::TopicPush, sender.clone());

        let report = dispatcher
            .dispatch(&note(), &channels(&["ntfy", "unconfigured"]))
            .await;

        assert_eq!(report.outcomes["ntfy"], Outcome::Delivered);
        assert_eq!(report.outcomes["unconfigured"], Outcome::Unconfigured);
        assert_eq!(sender.calls(), vec![vec!["ntfy".to_string()]]);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot["ntfy"].delivered, 1);
        assert_eq!(snapshot["unconfigured"].errored, 1);
    }

    #[tokio::test]
    async fn bucket_failure_does_not_abort_siblings() {
        let failing = FakeSender::new(true);
        let healthy = FakeSender::new(false);
        let mut dispatcher = Dispatcher::new(Arc::new(Metrics::new()));
        dispatcher.bind("ntfy", BackendFamily::TopicPush);
        dispatcher.bind("mattermost", BackendFamily::RoomWebhook);
        dispatcher.register(BackendFamily::TopicPush, failing.clone());
        dispatcher.register(BackendFamily::RoomWebhook, healthy.clone());

        let report = dispatcher
            .dispatch(&note(), &channels(&["ntfy", "mattermost"]))
            .await;

        assert!(matches!(report.outcomes["ntfy"], Outcome::Failed(_)));
        assert_eq!(report.outcomes["mattermost"], Outcome::Delivered);
        assert_eq!(healthy.calls().len(), 1);
    }

    #[tokio::test]
    async fn relay_channels_merge_into_one_call() {
        let relay = FakeSender::new(false);
        let mut dispatcher = Dispatcher::new(Arc::new(Metrics::new()));
        dispatcher.bind("discord", BackendFamily::Relay);
        dispatcher.bind("email", BackendFamily::Relay);
        dispatcher.register(BackendFamily::Relay, relay.clone());

        let report = dispatcher
            .dispatch(&note(), &channels(&["discord", "email"]))
            .await;

        assert_eq!(
            relay.calls(),
            vec![vec!["discord".to_string(), "email".to_string()]]
        );
        assert_eq!(report.delivered(), 2);
    }

    #[tokio::test]
    async fn repeated_identifiers_trigger_a_single_call() {
        let sender = FakeSender::new(false);
        let mut dispatcher = Dispatcher::new(Arc::new(Metrics::new()));
        dispatcher.bind("ntfy", BackendFamily::TopicPush);
        dispatcher.register(BackendFamily::TopicPush, sender.clone());

        let report = dispatcher
            .dispatch(&note(), &channels(&["ntfy", "ntfy"]))
            .await;

        assert_eq!(sender.calls(), vec![vec!["ntfy".to_string()]]);
        assert_eq!(report.outcomes.len(), 1);
    }

    #[tokio::test]
    async fn failure_is_attributed_to_every_channel_in_the_bucket() {
        let relay = FakeSender::new(true);
        let mut dispatcher = Dispatcher::new(Arc::new(Metrics::new()));
        dispatcher.bind("discord", BackendFamily::Relay);
        dispatcher.bind("email", BackendFamily::Relay);
        dispatcher.register(BackendFamily::Relay, relay);

        let report = dispatcher
            .dispatch(&note(), &channels(&["discord", "email"]))
            .await;

        assert!(matches!(report.outcomes["discord"], Outcome::Failed(_)));
        assert!(matches!(report.outcomes["email"], Outcome::Failed(_)));
        assert_eq!(report.failed(), 2);
    }
}
