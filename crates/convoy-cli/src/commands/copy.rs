//! Copy command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use convoy_core::relay;
use convoy_core::{CopyEndpoint, RpcConfig, RpcPool};

use crate::commands::load_manager;
use crate::index::ContainerIndex;

/// Arguments for the copy command.
#[derive(Args)]
#[command(after_help = "\
Paths can be specified as:
  - Local path: /path/to/file or ./relative/path
  - Container path: container-name:/path/in/container

Examples:
  # Copy from host to single container
  convoy copy ./myfile.txt mycontainer:/tmp/myfile.txt

  # Copy from host to multiple containers
  convoy copy ./config.yaml c1:/etc/app/config.yaml c2:/etc/app/config.yaml

  # Copy from container to host
  convoy copy mycontainer:/var/log/app.log ./logs

  # Copy between containers (uses the client as relay)
  convoy copy c1:/data c2:/backup")]
pub struct CopyArgs {
    /// Source endpoint
    pub source: String,

    /// Destination endpoints
    #[arg(required = true)]
    pub destinations: Vec<String>,

    /// Timeout in seconds for establishing connections
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,

    /// Overwrite existing files
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub overwrite: bool,
}

/// Executes the copy command.
pub async fn execute(args: CopyArgs, config_path: Option<&Path>) -> Result<()> {
    let source = CopyEndpoint::parse(&args.source).context("invalid source")?;

    let mut destinations = Vec::with_capacity(args.destinations.len());
    for dest in &args.destinations {
        destinations
            .push(CopyEndpoint::parse(dest).with_context(|| format!("invalid destination {dest:?}"))?);
    }

    let (_cfg, manager) = load_manager(config_path)?;
    let index = ContainerIndex::load(&manager).await?;

    let pool = RpcPool::new(RpcConfig {
        dial_timeout: Duration::from_secs(args.timeout),
        call_timeout: Duration::ZERO,
    });

    let result = relay::copy(&pool, index.list(), &source, &destinations, args.overwrite).await;
    pool.close().await;

    result?;
    println!("Copy complete");
    Ok(())
}
