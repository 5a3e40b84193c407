mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => herald::server::run(args.address).await?,
        Commands::Send(args) => {
            herald::producer::send(
                &args.endpoint,
                &args.title,
                &args.message,
                args.channels.as_deref(),
                args.priority.as_deref(),
            )
            .await?
        }
    }

    Ok(())
}
