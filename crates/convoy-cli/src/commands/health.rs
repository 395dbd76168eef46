//! Health command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;

use convoy_core::{ContainerRecord, RpcConfig, RpcPool};
use convoy_protocol::HealthStatus;

use crate::commands::{load_manager, print_table};
use crate::index::ContainerIndex;

/// Arguments for the health command.
#[derive(Args)]
pub struct HealthArgs {
    /// Container names or ids
    pub targets: Vec<String>,

    /// Check all containers
    #[arg(short, long)]
    pub all: bool,

    /// Timeout in seconds for health checks
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,
}

struct HealthRow {
    label: String,
    status: String,
    healthy: bool,
}

/// Executes the health command.
pub async fn execute(args: HealthArgs, config_path: Option<&Path>) -> Result<()> {
    let (_cfg, manager) = load_manager(config_path)?;
    let index = ContainerIndex::load(&manager).await?;

    let mut rows: Vec<HealthRow> = Vec::new();
    let mut targets: Vec<ContainerRecord> = Vec::new();

    if args.all {
        if index.list().is_empty() {
            println!("all  unhealthy: no containers registered");
            bail!("no containers registered");
        }
        targets.extend(index.list().iter().cloned());
    } else {
        if args.targets.is_empty() {
            bail!("container id or name is required");
        }
        for reference in &args.targets {
            let reference = reference.trim();
            if reference.is_empty() {
                continue;
            }
            match index.resolve(reference) {
                Some(record) => targets.push(record.clone()),
                None => rows.push(HealthRow {
                    label: reference.to_string(),
                    status: "unhealthy: container not found".to_string(),
                    healthy: false,
                }),
            }
        }
    }

    let timeout = Duration::from_secs(args.timeout);
    let pool = RpcPool::new(RpcConfig {
        dial_timeout: timeout,
        call_timeout: timeout,
    });

    for record in &targets {
        rows.push(check_target(&pool, record).await);
    }
    pool.close().await;

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| vec![row.label.clone(), row.status.clone()])
        .collect();
    print_table(&["NAME", "STATUS"], &table);

    if rows.iter().any(|row| !row.healthy) {
        bail!("one or more containers unhealthy");
    }
    Ok(())
}

async fn check_target(pool: &RpcPool, record: &ContainerRecord) -> HealthRow {
    let label = record.label().to_string();

    if record.endpoint.is_empty() {
        return HealthRow {
            label,
            status: "unhealthy: missing endpoint".to_string(),
            healthy: false,
        };
    }

    match pool.check_health(&record.endpoint).await {
        Ok(resp) if resp.status() == HealthStatus::Healthy => HealthRow {
            label,
            status: "healthy".to_string(),
            healthy: true,
        },
        Ok(resp) => {
            let message = if resp.message.is_empty() {
                resp.status().as_str_name().to_string()
            } else {
                resp.message
            };
            HealthRow {
                label,
                status: format!("unhealthy: {message}"),
                healthy: false,
            }
        }
        Err(err) => HealthRow {
            label,
            status: format!("unhealthy: {err}"),
            healthy: false,
        },
    }
}
