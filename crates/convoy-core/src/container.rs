//! Container records, specs, and the runtime driver abstraction.
//!
//! The concrete runtime (Docker or otherwise) is an external collaborator;
//! the orchestrator only assumes the capability set expressed by [`Runtime`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{CoreError, Result};

/// Metadata for a managed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    /// Opaque, globally unique identifier.
    pub id: String,
    /// Optional human-facing name; unique across the registry when present.
    pub name: String,
    /// Image the container was created from.
    pub image: String,
    /// `host:port` of the in-container agent; empty disables RPC.
    pub endpoint: String,
    /// Free-form labels.
    pub labels: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContainerRecord {
    /// Display label: the name when present, the id otherwise.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Request to create a container.
#[derive(Debug, Clone, Default)]
pub struct ContainerSpec {
    /// Optional name for the new container.
    pub name: String,
    /// Image to run; required.
    pub image: String,
    pub labels: HashMap<String, String>,
    pub environment: HashMap<String, String>,
    /// Command override; empty keeps the image default.
    pub command: Vec<String>,
}

/// Capability surface a container runtime must provide.
#[async_trait]
pub trait Runtime: Send + Sync {
    /// Creates a container and reports its metadata, including the derived
    /// agent endpoint (empty when unreachable).
    async fn create_container(&self, spec: ContainerSpec) -> Result<ContainerRecord>;

    async fn start_container(&self, id: &str) -> Result<()>;

    async fn stop_container(&self, id: &str) -> Result<()>;

    async fn remove_container(&self, id: &str) -> Result<()>;

    /// Runs a command through the runtime and returns its combined output.
    async fn exec(&self, id: &str, cmd: &[String]) -> Result<String>;

    /// Attaches an interactive shell through the runtime, inheriting the
    /// caller's stdio.
    async fn shell(&self, id: &str) -> Result<()>;

    /// Lists the containers this runtime manages.
    async fn list_containers(&self) -> Result<Vec<ContainerRecord>>;
}

/// Coordinates container operations through the [`Runtime`] abstraction,
/// validating inputs before delegating.
pub struct Manager {
    runtime: Arc<dyn Runtime>,
}

impl Manager {
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self { runtime }
    }

    /// Provisions a new container.
    pub async fn create(&self, spec: ContainerSpec) -> Result<ContainerRecord> {
        if spec.image.trim().is_empty() {
            return Err(CoreError::InvalidInput("image is required".into()));
        }

        self.runtime.create_container(spec).await
    }

    pub async fn start(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.runtime.start_container(id).await
    }

    pub async fn stop(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.runtime.stop_container(id).await
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.runtime.remove_container(id).await
    }

    /// Executes a command inside the container via the runtime and returns
    /// its combined output.
    pub async fn exec(&self, id: &str, cmd: &[String]) -> Result<String> {
        require_id(id)?;
        if cmd.is_empty() {
            return Err(CoreError::InvalidInput("command is required".into()));
        }
        self.runtime.exec(id, cmd).await
    }

    /// Attaches an interactive runtime-level shell.
    pub async fn shell(&self, id: &str) -> Result<()> {
        require_id(id)?;
        self.runtime.shell(id).await
    }

    pub async fn list(&self) -> Result<Vec<ContainerRecord>> {
        self.runtime.list_containers().await
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(CoreError::InvalidInput("container id is required".into()));
    }
    Ok(())
}
