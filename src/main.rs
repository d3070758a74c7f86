//! ARK - CLI entry point.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ark_agent::cli::{Cli, Command};
use ark_agent::{acquire, ingest, repl, AppContext, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ark_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!(model = %config.model, "loaded configuration");

    let ctx = AppContext::new(config);

    match cli.command.unwrap_or(Command::Agent) {
        Command::Agent => repl::run_agent_repl(&ctx).await?,
        Command::Ask { collection } => repl::run_ask_repl(&ctx, &collection).await?,
        Command::Acquire => acquire::run(&ctx.config).await?,
        Command::Ingest { path, collection } => match path {
            Some(path) => ingest::ingest_directory(&ctx, &path, &collection).await?,
            None => ingest::ingest_system_profile(&ctx).await?,
        },
        Command::Forget { collection, path } => {
            ingest::forget_source(&ctx, &collection, &path).await?
        }
    }

    Ok(())
}
