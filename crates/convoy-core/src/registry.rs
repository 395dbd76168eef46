//! In-memory container registry.
//!
//! Records are indexed by id with a secondary name index. Names are unique:
//! registering a name already bound to a different id fails, while
//! re-registering the same id is an update and re-indexes its name. Lookups
//! take a read lock; register/remove are exclusive.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::container::ContainerRecord;
use crate::error::{CoreError, Result};

#[derive(Debug, Default)]
struct Inner {
    containers: HashMap<String, ContainerRecord>,
    name_index: HashMap<String, String>,
}

/// Stores metadata about managed containers.
#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or updates a container entry.
    ///
    /// # Errors
    ///
    /// Fails when the record has no id, or when its name is already bound to
    /// a different container.
    pub fn register(&self, record: ContainerRecord) -> Result<()> {
        if record.id.is_empty() {
            return Err(CoreError::InvalidInput("container id is required".into()));
        }

        let name = record.name.trim().to_string();
        let mut inner = write_lock(&self.inner);

        if !name.is_empty() {
            if let Some(existing_id) = inner.name_index.get(&name) {
                if existing_id != &record.id {
                    return Err(CoreError::NameConflict {
                        name,
                        existing_id: existing_id.clone(),
                    });
                }
            }
        }

        if let Some(existing) = inner.containers.get(&record.id).cloned() {
            remove_name_entry(&mut inner, &existing);
        }

        if !name.is_empty() {
            inner.name_index.insert(name, record.id.clone());
        }
        inner.containers.insert(record.id.clone(), record);

        Ok(())
    }

    /// Deletes a container from the registry.
    ///
    /// The name entry is removed only when it still points at this id.
    pub fn remove(&self, id: &str) {
        if id.is_empty() {
            return;
        }

        let mut inner = write_lock(&self.inner);
        if let Some(record) = inner.containers.remove(id) {
            remove_name_entry(&mut inner, &record);
        }
    }

    /// Returns a container by id.
    pub fn get(&self, id: &str) -> Option<ContainerRecord> {
        if id.is_empty() {
            return None;
        }
        read_lock(&self.inner).containers.get(id).cloned()
    }

    /// Returns a container by name. Names are trimmed; empty names never
    /// match.
    pub fn get_by_name(&self, name: &str) -> Option<ContainerRecord> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let inner = read_lock(&self.inner);
        let id = inner.name_index.get(name)?;
        inner.containers.get(id).cloned()
    }

    /// Returns all registered containers.
    pub fn list(&self) -> Vec<ContainerRecord> {
        read_lock(&self.inner).containers.values().cloned().collect()
    }

    /// Returns the container or an error naming it.
    pub fn require(&self, id: &str) -> Result<ContainerRecord> {
        self.get(id)
            .ok_or_else(|| CoreError::ContainerNotFound(id.to_string()))
    }
}

fn remove_name_entry(inner: &mut Inner, record: &ContainerRecord) {
    let name = record.name.trim();
    if name.is_empty() {
        return;
    }
    if inner.name_index.get(name) == Some(&record.id) {
        inner.name_index.remove(name);
    }
}

fn read_lock(lock: &RwLock<Inner>) -> std::sync::RwLockReadGuard<'_, Inner> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock(lock: &RwLock<Inner>) -> std::sync::RwLockWriteGuard<'_, Inner> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn record(id: &str, name: &str) -> ContainerRecord {
        ContainerRecord {
            id: id.to_string(),
            name: name.to_string(),
            image: "busybox".to_string(),
            endpoint: format!("{id}.local:6000"),
            labels: HashMap::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn register_and_lookup_by_id_and_name() {
        let registry = Registry::new();
        registry.register(record("c1", "alpha")).unwrap();

        assert_eq!(registry.get("c1").unwrap().name, "alpha");
        assert_eq!(registry.get_by_name("alpha").unwrap().id, "c1");
        assert_eq!(registry.get_by_name(" alpha ").unwrap().id, "c1");
        assert!(registry.get_by_name("beta").is_none());
    }

    #[test]
    fn register_requires_id() {
        let registry = Registry::new();
        let err = registry.register(record("", "alpha")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn name_conflict_with_different_id_fails() {
        let registry = Registry::new();
        registry.register(record("c1", "alpha")).unwrap();

        let err = registry.register(record("c2", "alpha")).unwrap_err();
        assert!(matches!(err, CoreError::NameConflict { .. }));

        // The original binding is untouched.
        assert_eq!(registry.get_by_name("alpha").unwrap().id, "c1");
    }

    #[test]
    fn same_id_same_name_is_idempotent() {
        let registry = Registry::new();
        registry.register(record("c3", "beta")).unwrap();
        registry.register(record("c3", "beta")).unwrap();

        assert_eq!(registry.get_by_name("beta").unwrap().id, "c3");
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn reregistering_id_replaces_record_and_reindexes_name() {
        let registry = Registry::new();
        registry.register(record("c1", "alpha")).unwrap();
        registry.register(record("c1", "gamma")).unwrap();

        assert!(registry.get_by_name("alpha").is_none());
        assert_eq!(registry.get_by_name("gamma").unwrap().id, "c1");
    }

    #[test]
    fn remove_is_stale_reference_safe() {
        let registry = Registry::new();
        registry.register(record("c1", "alpha")).unwrap();
        // c1's name moves on; "alpha" no longer points at it.
        registry.register(record("c1", "delta")).unwrap();
        registry.register(record("c2", "alpha")).unwrap();

        // Removing c1 must not disturb c2's claim on "alpha".
        registry.remove("c1");
        assert!(registry.get("c1").is_none());
        assert_eq!(registry.get_by_name("alpha").unwrap().id, "c2");
        assert!(registry.get_by_name("delta").is_none());
    }

    #[test]
    fn empty_names_never_index() {
        let registry = Registry::new();
        registry.register(record("c1", "")).unwrap();
        registry.register(record("c2", "   ")).unwrap();

        assert!(registry.get_by_name("").is_none());
        assert!(registry.get_by_name("   ").is_none());
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn require_reports_missing_containers() {
        let registry = Registry::new();
        let err = registry.require("ghost").unwrap_err();
        assert!(matches!(err, CoreError::ContainerNotFound(_)));
    }
}
