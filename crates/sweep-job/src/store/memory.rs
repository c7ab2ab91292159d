//! In-process configuration store.

use std::sync::RwLock;

use serde_json::Value;
use sweep_core::{Error, Result};

use super::{Changeset, ConfigStore, KeyPath, lookup};
use crate::TRACING_TARGET_STORE;

/// Configuration store holding its tree in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    root: RwLock<Value>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `root`.
    pub fn with_root(root: Value) -> Self {
        Self {
            root: RwLock::new(root),
        }
    }

    /// Returns a copy of the whole tree.
    pub fn snapshot(&self) -> Result<Value> {
        self.root
            .read()
            .map(|root| root.clone())
            .map_err(|_| Error::persistence().with_message("memory store lock poisoned"))
    }
}

impl ConfigStore for MemoryStore {
    fn get(&self, path: &KeyPath) -> Result<Option<Value>> {
        let root = self
            .root
            .read()
            .map_err(|_| Error::persistence().with_message("memory store lock poisoned"))?;
        Ok(lookup(&root, path).cloned())
    }

    fn save(&self, changes: Changeset) -> Result<()> {
        let mut root = self
            .root
            .write()
            .map_err(|_| Error::persistence().with_message("memory store lock poisoned"))?;

        changes.apply(&mut root);

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            writes = changes.len(),
            "Memory store saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PATH: KeyPath = KeyPath::new(&["job", "enabled"]);

    #[test]
    fn test_get_after_save() {
        let store = MemoryStore::new();
        assert_eq!(store.get(&PATH).unwrap(), None);

        store.save(Changeset::new().set(PATH, true)).unwrap();
        assert_eq!(store.get(&PATH).unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_seeded_root() {
        let store = MemoryStore::with_root(json!({ "job": { "enabled": false } }));
        assert_eq!(store.get(&PATH).unwrap(), Some(json!(false)));
    }
}
