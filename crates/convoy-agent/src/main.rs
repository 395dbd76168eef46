//! Convoy agent binary.
//!
//! Runs inside a managed container and serves the ConvoyService gRPC surface
//! until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use convoy_agent::{AgentConfig, AgentServer};
use convoy_protocol::ConvoyServiceServer;

#[derive(Parser)]
#[command(name = "convoy-agent", about = "Convoy in-container agent", version)]
struct Cli {
    /// Path to the agent config file (default: ~/.config/convoy/agent.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convoy_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = AgentConfig::load(cli.config.as_deref()).context("load config")?;

    let addr: SocketAddr = ([0, 0, 0, 0], cfg.grpc_port).into();
    tracing::info!(agent_id = %cfg.agent_id, %addr, "convoy agent listening");

    let server = AgentServer::new(cfg);
    tonic::transport::Server::builder()
        .add_service(ConvoyServiceServer::new(server))
        .serve_with_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
        .context("serve")?;

    Ok(())
}
