//! Remove command implementation.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;

use crate::commands::load_manager;
use crate::index::ContainerIndex;

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Container names or ids
    #[arg(required = true)]
    pub containers: Vec<String>,
}

/// Executes the remove command.
pub async fn execute(args: RemoveArgs, config_path: Option<&Path>) -> Result<()> {
    let (_cfg, manager) = load_manager(config_path)?;
    let index = ContainerIndex::load(&manager).await?;

    let mut failed = false;
    for reference in &args.containers {
        let reference = reference.trim();
        if reference.is_empty() {
            continue;
        }

        let (id, label) = match index.resolve(reference) {
            Some(record) => (record.id.clone(), record.label().to_string()),
            None => (reference.to_string(), reference.to_string()),
        };

        if let Err(err) = manager.remove(&id).await {
            eprintln!("Failed to remove {label}: {err}");
            failed = true;
            continue;
        }

        println!("Removed {label}");
    }

    if failed {
        bail!("one or more containers failed to remove");
    }
    Ok(())
}
