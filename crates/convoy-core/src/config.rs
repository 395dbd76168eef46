//! Orchestrator configuration.
//!
//! Loaded from `~/.config/convoy/config.yaml`; the directory is overridable
//! via `CONVOY_CONFIG_DIR`. `config init` writes a commented starter file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CoreError, Result};

const CONFIG_DIR_ENV: &str = "CONVOY_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".config/convoy";
const CONFIG_FILE_NAME: &str = "config.yaml";

const DEFAULT_AGENT_PORT: u16 = 6000;
const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";
const DEFAULT_PULL_TIMEOUT_SECS: u64 = 300;

/// Starter file written by `config init`.
const INIT_TEMPLATE: &str = "\
# Convoy orchestrator configuration.

# Image used when `start` creates a container.
image: convoy-agent:latest

# Port the in-container agent listens on.
agent_port: 6000

# Docker endpoint the runtime driver talks to.
docker_host: unix:///var/run/docker.sock

# Optional network to attach new containers to.
# docker_network: convoy

# Always pull the image before creating a container.
pull_always: false

# Deadline for image pulls, in seconds.
pull_timeout_secs: 300
";

/// Application configuration after defaults are applied.
#[derive(Debug, Clone)]
pub struct Config {
    /// Image used when creating containers.
    pub image: String,
    /// Port agents listen on inside containers.
    pub agent_port: u16,
    /// Docker endpoint for the runtime driver.
    pub docker_host: String,
    /// Optional container network.
    pub docker_network: String,
    /// Pull the image even when present locally.
    pub pull_always: bool,
    /// Deadline for image pulls.
    pub pull_timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    image: Option<String>,
    agent_port: Option<u16>,
    docker_host: Option<String>,
    docker_network: Option<String>,
    pull_always: Option<bool>,
    pull_timeout_secs: Option<u64>,
}

impl Config {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file is missing, unreadable, unparsable, or
    /// invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        let data =
            std::fs::read_to_string(&config_path).map_err(|source| CoreError::ConfigRead {
                path: config_path.clone(),
                source,
            })?;

        let file: FileConfig =
            serde_yaml::from_str(&data).map_err(|source| CoreError::ConfigParse {
                path: config_path.clone(),
                source,
            })?;

        let cfg = file.into_config();
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.image.trim().is_empty() {
            problems.push("image is required");
        }
        if self.agent_port == 0 {
            problems.push("agent_port must be between 1 and 65535");
        }
        if self.docker_host.trim().is_empty() {
            problems.push("docker_host is required");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CoreError::ConfigInvalid(problems.join("; ")))
        }
    }
}

impl FileConfig {
    fn into_config(self) -> Config {
        Config {
            image: self.image.unwrap_or_default(),
            agent_port: self.agent_port.unwrap_or(DEFAULT_AGENT_PORT),
            docker_host: self
                .docker_host
                .filter(|h| !h.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DOCKER_HOST.to_string()),
            docker_network: self.docker_network.unwrap_or_default(),
            pull_always: self.pull_always.unwrap_or(false),
            pull_timeout: Duration::from_secs(
                self.pull_timeout_secs
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_PULL_TIMEOUT_SECS),
            ),
        }
    }
}

/// Default path of the orchestrator config file.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join(CONFIG_FILE_NAME));
        }
    }

    let home = std::env::var("HOME").map_err(|_| CoreError::NoHomeDir)?;
    Ok(PathBuf::from(home)
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

/// Writes the starter config file, refusing to overwrite unless `force`.
///
/// Returns the path written.
pub fn init_config(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if config_path.exists() && !force {
        return Err(CoreError::InvalidInput(format!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config_path, INIT_TEMPLATE)?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_applies_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "image: convoy-agent:latest\n").unwrap();

        let cfg = Config::load(Some(&path)).unwrap();

        assert_eq!(cfg.image, "convoy-agent:latest");
        assert_eq!(cfg.agent_port, 6000);
        assert_eq!(cfg.docker_host, "unix:///var/run/docker.sock");
        assert!(cfg.docker_network.is_empty());
        assert!(!cfg.pull_always);
        assert_eq!(cfg.pull_timeout, Duration::from_secs(300));
    }

    #[test]
    fn load_requires_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "agent_port: 7000\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        match err {
            CoreError::ConfigInvalid(msg) => assert!(msg.contains("image")),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }

    #[test]
    fn init_writes_a_loadable_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let written = init_config(Some(&path), false).unwrap();
        assert_eq!(written, path);

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.image, "convoy-agent:latest");

        // A second init without force refuses to clobber.
        assert!(init_config(Some(&path), false).is_err());
        init_config(Some(&path), true).unwrap();
    }
}
