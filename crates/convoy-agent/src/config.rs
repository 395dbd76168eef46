//! Agent runtime configuration.
//!
//! Configuration is read from `~/.config/convoy/agent.yaml` (the directory is
//! overridable via `CONVOY_CONFIG_DIR`), with `CONVOY_AGENT_*` environment
//! variables winning over file values. A missing file yields the defaults so
//! the agent boots in a bare container image.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const CONFIG_DIR_ENV: &str = "CONVOY_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".config/convoy";
const CONFIG_FILE_NAME: &str = "agent.yaml";

const DEFAULT_GRPC_PORT: u16 = 6000;
const DEFAULT_SHELL_PATH: &str = "/bin/sh";
const DEFAULT_MAX_CONCURRENT: usize = 4;
const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 60;
const FALLBACK_AGENT_ID: &str = "convoy-agent";

/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading agent configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("resolve home dir: HOME is not set")]
    NoHomeDir,
}

/// Agent runtime configuration after defaults and overrides are applied.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Port the gRPC server listens on.
    pub grpc_port: u16,
    /// Shell spawned when an ExecuteShell start frame carries no args.
    pub shell_path: String,
    /// Capacity of the concurrency gate.
    pub max_concurrent: usize,
    /// Default deadline for subprocess lifetimes.
    pub exec_timeout: Duration,
    /// Identifier reported in logs.
    pub agent_id: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            grpc_port: DEFAULT_GRPC_PORT,
            shell_path: DEFAULT_SHELL_PATH.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            exec_timeout: Duration::from_secs(DEFAULT_EXEC_TIMEOUT_SECS),
            agent_id: default_agent_id(),
        }
    }
}

/// On-disk representation of the agent config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    grpc_port: Option<u16>,
    shell_path: Option<String>,
    max_concurrent: Option<usize>,
    exec_timeout_secs: Option<u64>,
    agent_id: Option<String>,
}

impl AgentConfig {
    /// Loads configuration, applying file values and environment overrides.
    ///
    /// When `path` is `None` the default location is used and a missing file
    /// is not an error; an explicitly given path must exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed, or when the
    /// resulting configuration is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path()?, false),
        };

        let mut cfg = match std::fs::read_to_string(&config_path) {
            Ok(data) => {
                let file: FileConfig =
                    serde_yaml::from_str(&data).map_err(|source| ConfigError::Parse {
                        path: config_path.clone(),
                        source,
                    })?;
                file.into_config()
            }
            Err(source) if !required && source.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: config_path,
                    source,
                })
            }
        };

        cfg.apply_env_overrides();
        cfg.validate()?;

        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(port) = env_parsed::<u16>("CONVOY_AGENT_GRPC_PORT") {
            self.grpc_port = port;
        }
        if let Some(shell) = env_nonempty("CONVOY_AGENT_SHELL") {
            self.shell_path = shell;
        }
        if let Some(max) = env_parsed::<usize>("CONVOY_AGENT_MAX_CONCURRENT") {
            self.max_concurrent = max;
        }
        if let Some(secs) = env_parsed::<u64>("CONVOY_AGENT_EXEC_TIMEOUT") {
            if secs > 0 {
                self.exec_timeout = Duration::from_secs(secs);
            }
        }
        if let Some(id) = env_nonempty("CONVOY_AGENT_ID") {
            self.agent_id = id;
        }
    }

    fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.grpc_port == 0 {
            problems.push("grpc_port must be between 1 and 65535");
        }
        if self.shell_path.trim().is_empty() {
            problems.push("shell_path is required");
        }
        if self.max_concurrent == 0 {
            problems.push("max_concurrent must be greater than 0");
        }
        if self.exec_timeout.is_zero() {
            problems.push("exec_timeout_secs must be greater than 0");
        }
        if self.agent_id.trim().is_empty() {
            problems.push("agent_id is required");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }
}

impl FileConfig {
    fn into_config(self) -> AgentConfig {
        let defaults = AgentConfig::default();
        AgentConfig {
            grpc_port: self.grpc_port.unwrap_or(defaults.grpc_port),
            shell_path: self
                .shell_path
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.shell_path),
            max_concurrent: self.max_concurrent.unwrap_or(defaults.max_concurrent),
            exec_timeout: self
                .exec_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.exec_timeout),
            agent_id: self
                .agent_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.agent_id),
        }
    }
}

/// Default path of the agent config file.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(dir) = env_nonempty(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir).join(CONFIG_FILE_NAME));
    }

    let home = env_nonempty("HOME").ok_or(ConfigError::NoHomeDir)?;
    Ok(PathBuf::from(home)
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn default_agent_id() -> String {
    if let Some(hostname) = env_nonempty("HOSTNAME") {
        return hostname;
    }
    if let Ok(hostname) = std::fs::read_to_string("/etc/hostname") {
        let hostname = hostname.trim();
        if !hostname.is_empty() {
            return hostname.to_string();
        }
    }
    FALLBACK_AGENT_ID.to_string()
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_nonempty(key).and_then(|v| v.parse().ok())
}
