//! CLI surface: argument types and per-verb implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use convoy_core::{Config, Manager};

use crate::runtime::DockerCliRuntime;

pub mod config;
pub mod copy;
pub mod exec;
pub mod health;
pub mod list;
pub mod remove;
pub mod shell;
pub mod start;
pub mod stop;

/// Container fleet controller.
#[derive(Parser)]
#[command(name = "convoy", about = "Container fleet controller", version)]
pub struct Cli {
    /// Path to the orchestrator config file (default: ~/.config/convoy/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show or initialize configuration
    Config(config::ConfigArgs),
    /// List containers
    List,
    /// Start containers, creating them when needed
    Start(start::StartArgs),
    /// Stop and remove containers
    Stop(stop::StopArgs),
    /// Remove containers
    Remove(remove::RemoveArgs),
    /// Execute a command in a container
    Exec(exec::ExecArgs),
    /// Open an interactive shell in a container
    Shell(shell::ShellArgs),
    /// Copy files/folders to or from containers
    Copy(copy::CopyArgs),
    /// Check container agent health
    Health(health::HealthArgs),
}

/// Loads the orchestrator config and builds a manager over the Docker
/// runtime driver.
pub(crate) fn load_manager(config_path: Option<&Path>) -> Result<(Config, Manager)> {
    let cfg = Config::load(config_path)?;
    let runtime = DockerCliRuntime::new(&cfg);
    let manager = Manager::new(Arc::new(runtime));
    Ok((cfg, manager))
}

/// Renders rows as a left-aligned, two-space-separated table.
pub(crate) fn print_table(header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let render = |cells: Vec<String>| {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i + 1 == widths.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:width$}  ", cell, width = widths[i]));
            }
        }
        line.trim_end().to_string()
    };

    println!(
        "{}",
        render(header.iter().map(|h| h.to_string()).collect())
    );
    for row in rows {
        println!("{}", render(row.clone()));
    }
}

/// Converts `KEY=value` pairs into the request environment map, ignoring
/// entries without a key.
pub(crate) fn parse_env_vars(vars: &[String]) -> std::collections::HashMap<String, String> {
    let mut env = std::collections::HashMap::new();
    for var in vars {
        if let Some(idx) = var.find('=') {
            if idx > 0 {
                env.insert(var[..idx].to_string(), var[idx + 1..].to_string());
            }
        }
    }
    env
}
