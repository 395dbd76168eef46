//! Stop command implementation.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;

use convoy_core::Registry;

use crate::commands::load_manager;
use crate::index::ContainerIndex;

/// Arguments for the stop command.
#[derive(Args)]
pub struct StopArgs {
    /// Container names or ids
    pub containers: Vec<String>,

    /// Stop and remove all managed containers
    #[arg(short, long)]
    pub all: bool,
}

/// Executes the stop command. Stopped containers are also removed and
/// deregistered.
pub async fn execute(args: StopArgs, config_path: Option<&Path>) -> Result<()> {
    let (_cfg, manager) = load_manager(config_path)?;
    let index = ContainerIndex::load(&manager).await?;

    let registry = Registry::new();
    for record in index.list() {
        if let Err(err) = registry.register(record.clone()) {
            tracing::warn!(id = %record.id, %err, "failed to register container");
        }
    }

    let targets: Vec<String> = if args.all {
        let containers = registry.list();
        if containers.is_empty() {
            println!("No containers registered");
            return Ok(());
        }
        containers.into_iter().map(|c| c.id).collect()
    } else if args.containers.is_empty() {
        bail!("provide container names or IDs, or use -a");
    } else {
        args.containers.clone()
    };

    let mut failed = false;
    for target in &targets {
        let target = target.trim();
        if target.is_empty() {
            continue;
        }

        let (id, label) = match registry
            .get_by_name(target)
            .or_else(|| registry.get(target))
        {
            Some(record) => (record.id.clone(), record.label().to_string()),
            None => (target.to_string(), target.to_string()),
        };

        if let Err(err) = manager.stop(&id).await {
            eprintln!("Failed to stop {label}: {err}");
            failed = true;
            continue;
        }

        if let Err(err) = manager.remove(&id).await {
            eprintln!("Failed to remove {label}: {err}");
            failed = true;
            continue;
        }

        registry.remove(&id);
        println!("Stopped and removed {label}");
    }

    if failed {
        bail!("one or more containers failed to stop");
    }
    Ok(())
}
