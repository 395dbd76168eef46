//! Config command implementation.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use convoy_core::config::{default_config_path, init_config};
use convoy_core::Config;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Executes the config command.
pub fn execute(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        Some(ConfigCommands::Init { force }) => {
            let path = init_config(config_path, force)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        None => {
            let path = match config_path {
                Some(p) => p.to_path_buf(),
                None => default_config_path()?,
            };
            let cfg = Config::load(Some(&path))?;

            println!("Config file: {}", path.display());
            println!("image: {}", cfg.image);
            println!("agent_port: {}", cfg.agent_port);
            println!("docker_host: {}", cfg.docker_host);
            if !cfg.docker_network.is_empty() {
                println!("docker_network: {}", cfg.docker_network);
            }
            println!("pull_always: {}", cfg.pull_always);
            println!("pull_timeout_secs: {}", cfg.pull_timeout.as_secs());
            Ok(())
        }
    }
}
