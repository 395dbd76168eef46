//! Start command implementation.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;

use convoy_core::{ContainerSpec, Registry};

use crate::commands::load_manager;
use crate::index::ContainerIndex;

/// Arguments for the start command.
#[derive(Args)]
pub struct StartArgs {
    /// Container names or ids; unknown names are created first
    #[arg(required = true)]
    pub containers: Vec<String>,
}

/// Executes the start command.
pub async fn execute(args: StartArgs, config_path: Option<&Path>) -> Result<()> {
    let (cfg, manager) = load_manager(config_path)?;
    let registry = Registry::new();
    let index = ContainerIndex::load(&manager).await?;

    let mut failed = false;
    for reference in &args.containers {
        let reference = reference.trim();
        if reference.is_empty() {
            continue;
        }

        let (id, label) = if let Some(existing) = index.resolve(reference) {
            (existing.id.clone(), existing.label().to_string())
        } else {
            println!("No registered container: {reference}\nCreating new container...");
            let spec = ContainerSpec {
                name: reference.to_string(),
                image: cfg.image.clone(),
                ..Default::default()
            };

            let record = match manager.create(spec).await {
                Ok(record) => record,
                Err(err) => {
                    eprintln!("Failed to create container {reference}: {err}");
                    failed = true;
                    continue;
                }
            };

            println!("Created container {} (id={})", reference, record.id);
            let id = record.id.clone();
            if let Err(err) = registry.register(record) {
                eprintln!("Warning: failed to register {id}: {err}");
            }
            (id, reference.to_string())
        };

        if let Err(err) = manager.start(&id).await {
            eprintln!("Failed to start {label}: {err}");
            failed = true;
            continue;
        }

        println!("Started {label}");
    }

    if failed {
        bail!("one or more containers failed to start");
    }
    Ok(())
}
