use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Notification delivery hub", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the hub: ingest API plus dispatch consumer
    Server(ServerArgs),
    /// Post a test notification to a running instance
    Send(SendArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to (overrides configuration)
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct SendArgs {
    /// Base URL of the running instance
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    pub endpoint: String,

    #[arg(long, default_value = "Test notification")]
    pub title: String,

    #[arg(long, default_value = "Hello from the herald CLI")]
    pub message: String,

    /// Comma-separated list of channels (e.g. ntfy,mattermost)
    #[arg(long)]
    pub channels: Option<String>,

    /// Priority label forwarded as an override
    #[arg(long)]
    pub priority: Option<String>,
}
