//! Service wiring: configuration, backend senders, queue, consumer,
//! and the HTTP server.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::config::{BackendsConfig, Config};
use crate::dispatch::Dispatcher;
use crate::notify::endpoint::Endpoint;
use crate::notify::http::{self, HttpSettings};
use crate::notify::{
    AppRegistry, BackendFamily, GotifySender, MattermostSender, NtfySender, PushoverSender,
    RelaySender,
};
use crate::observability::Metrics;
use crate::queue;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    info!("loading configuration");
    let config = Config::load().map_err(|e| format!("failed to load config: {e}"))?;
    let bind_addr = address.unwrap_or(config.server.bind_addr);

    let metrics = Arc::new(Metrics::new());

    let settings = HttpSettings {
        connect_timeout: Duration::from_secs(config.delivery.connect_timeout_secs),
        request_timeout: Duration::from_secs(config.delivery.timeout_secs),
        ..HttpSettings::default()
    };
    let client = http::build_client(&settings)
        .map_err(|e| format!("failed to build HTTP client: {e}"))?;

    let dispatcher = Arc::new(build_dispatcher(&config.backends, client, metrics.clone())?);

    let (inbox, receiver) = queue::channel(config.queue.capacity);
    let consumer = tokio::spawn(queue::run_consumer(
        receiver,
        dispatcher,
        config.routing.default_channel.clone(),
    ));

    let state = AppState::new(inbox, metrics);
    let app = api::router(state);

    info!(%bind_addr, "listening");
    let listener = TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the router drops the last inbox clone; the consumer
    // drains anything already queued and exits.
    consumer.await?;
    info!("shutdown complete");
    Ok(())
}

/// Build the dispatcher from the configured backends. Each configured
/// family contributes one sender and its channel bindings; families
/// with no section are left unbound and show up as unconfigured
/// outcomes at dispatch time.
fn build_dispatcher(
    backends: &BackendsConfig,
    client: Client,
    metrics: Arc<Metrics>,
) -> Result<Dispatcher, AnyError> {
    let mut dispatcher = Dispatcher::new(metrics);

    if let Some(relay) = &backends.relay {
        let endpoint = Endpoint::parse(&relay.url)?;
        let sender = RelaySender::new(client.clone(), endpoint, relay.channels.clone());
        for name in sender.channel_names() {
            dispatcher.bind(name, BackendFamily::Relay);
        }
        dispatcher.register(BackendFamily::Relay, Arc::new(sender));
        info!(channels = relay.channels.len(), "relay backend configured");
    }

    if let Some(ntfy) = &backends.ntfy {
        let base = Endpoint::parse(&ntfy.url)?;
        info!(endpoint = %base, "ntfy backend configured");
        dispatcher.bind("ntfy", BackendFamily::TopicPush);
        dispatcher.register(
            BackendFamily::TopicPush,
            Arc::new(NtfySender::new(client.clone(), base)),
        );
    }

    if let Some(gotify) = &backends.gotify {
        let legacy = gotify.url.as_deref().map(Endpoint::parse).transpose()?;
        let mut apps = BTreeMap::new();
        for (name, url) in &gotify.apps {
            apps.insert(name.clone(), Endpoint::parse(url)?);
        }
        let registry = AppRegistry::new(legacy, apps);
        if registry.is_empty() {
            warn!("gotify section present but empty, skipping");
        } else {
            info!(apps = gotify.apps.len(), "gotify backend configured");
            dispatcher.bind("gotify", BackendFamily::TokenPush);
            dispatcher.register(
                BackendFamily::TokenPush,
                Arc::new(GotifySender::new(client.clone(), registry)),
            );
        }
    }

    if let Some(mattermost) = &backends.mattermost {
        let base = Endpoint::parse(&mattermost.url)?;
        info!(endpoint = %base, "mattermost backend configured");
        dispatcher.bind("mattermost", BackendFamily::RoomWebhook);
        dispatcher.register(
            BackendFamily::RoomWebhook,
            Arc::new(MattermostSender::new(client.clone(), base)),
        );
    }

    if let Some(pushover) = &backends.pushover {
        let endpoint = Endpoint::parse(&pushover.url)?;
        let sender = PushoverSender::from_endpoint(client.clone(), &endpoint)?;
        info!("pushover backend configured");
        dispatcher.bind("pushover", BackendFamily::DirectPush);
        dispatcher.register(BackendFamily::DirectPush, Arc::new(sender));
    }

    Ok(dispatcher)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
