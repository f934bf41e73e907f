//! In-memory snapshot store.
//!
//! Suitable for unit tests and for embedding where nothing should touch
//! disk. Clones share the same underlying map.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Snapshot, SnapshotStore};
use crate::error::{StoreError, StoreResult};

/// In-memory snapshot store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Snapshot>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::Internal("memory store lock poisoned".to_string())
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> StoreResult<Option<Snapshot>> {
        let data = self.data.read().map_err(poisoned)?;
        Ok(data.get(key).cloned())
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.insert(snapshot.key.clone(), snapshot.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut data = self.data.write().map_err(poisoned)?;
        data.remove(key);
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let data = self.data.read().map_err(poisoned)?;
        let mut keys: Vec<String> = data.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
