//! Container lookup by name or id.

use anyhow::{bail, Result};

use convoy_core::relay;
use convoy_core::{ContainerRecord, Manager};

/// Snapshot of managed containers with name-first resolution.
pub struct ContainerIndex {
    list: Vec<ContainerRecord>,
}

impl ContainerIndex {
    pub fn new(list: Vec<ContainerRecord>) -> Self {
        Self { list }
    }

    /// Fetches the container list from the manager.
    pub async fn load(manager: &Manager) -> Result<Self> {
        Ok(Self::new(manager.list().await?))
    }

    /// Finds a container by name first, then by id.
    pub fn resolve(&self, reference: &str) -> Option<&ContainerRecord> {
        relay::resolve(&self.list, reference)
    }

    /// Finds a container and requires it to have an agent endpoint.
    pub fn resolve_with_endpoint(&self, reference: &str) -> Result<&ContainerRecord> {
        let Some(record) = self.resolve(reference) else {
            bail!("container not found: {reference}");
        };
        if record.endpoint.is_empty() {
            bail!("container {reference} has no agent endpoint");
        }
        Ok(record)
    }

    /// All containers in the snapshot.
    pub fn list(&self) -> &[ContainerRecord] {
        &self.list
    }
}
