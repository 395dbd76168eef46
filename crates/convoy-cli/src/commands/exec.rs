//! Exec command implementation.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use convoy_core::{RpcConfig, RpcPool};
use convoy_protocol::CommandRequest;

use crate::commands::{load_manager, parse_env_vars};
use crate::index::ContainerIndex;

/// Arguments for the exec command.
#[derive(Args)]
pub struct ExecArgs {
    /// Container name or id
    pub container: String,

    /// Command to execute (joined and run through `sh -c`)
    #[arg(trailing_var_arg = true, required = true)]
    pub command: Vec<String>,

    /// Set environment variables (can be repeated)
    #[arg(short, long)]
    pub env: Vec<String>,

    /// Working directory inside the container
    #[arg(short, long, default_value = "")]
    pub workdir: String,

    /// Timeout in seconds for command execution
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

/// Executes the exec command.
pub async fn execute(args: ExecArgs, config_path: Option<&Path>) -> Result<()> {
    let (_cfg, manager) = load_manager(config_path)?;
    let index = ContainerIndex::load(&manager).await?;
    let record = index.resolve_with_endpoint(&args.container)?;

    let request = CommandRequest {
        args: vec!["sh".to_string(), "-c".to_string(), args.command.join(" ")],
        env: parse_env_vars(&args.env),
        work_dir: args.workdir.clone(),
        timeout_seconds: args.timeout as i32,
    };

    let timeout = Duration::from_secs(args.timeout);
    let pool = RpcPool::new(RpcConfig {
        dial_timeout: timeout,
        call_timeout: timeout,
    });

    let resp = pool
        .execute_command(&record.endpoint, request)
        .await
        .context("execute command")?;
    pool.close().await;

    if !resp.stdout.is_empty() {
        print!("{}", resp.stdout);
        std::io::stdout().flush().ok();
    }
    if !resp.stderr.is_empty() {
        eprint!("{}", resp.stderr);
    }
    if !resp.error_message.is_empty() {
        eprintln!("error: {}", resp.error_message);
    }

    if resp.exit_code != 0 {
        std::process::exit(resp.exit_code);
    }
    Ok(())
}
