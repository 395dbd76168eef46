//! Convoy CLI - drive a fleet of container agents from one terminal.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod index;
mod runtime;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "convoy=debug,convoy_core=debug,convoy_cli=debug"
    } else {
        "convoy=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config_path = cli.config.clone();
    match cli.command {
        Commands::Config(args) => commands::config::execute(args, config_path.as_deref()),
        Commands::List => commands::list::execute(config_path.as_deref()).await,
        Commands::Start(args) => commands::start::execute(args, config_path.as_deref()).await,
        Commands::Stop(args) => commands::stop::execute(args, config_path.as_deref()).await,
        Commands::Remove(args) => commands::remove::execute(args, config_path.as_deref()).await,
        Commands::Exec(args) => commands::exec::execute(args, config_path.as_deref()).await,
        Commands::Shell(args) => commands::shell::execute(args, config_path.as_deref()).await,
        Commands::Copy(args) => commands::copy::execute(args, config_path.as_deref()).await,
        Commands::Health(args) => commands::health::execute(args, config_path.as_deref()).await,
    }
}
