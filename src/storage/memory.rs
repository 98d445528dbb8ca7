use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::errors::{WatchError, WatchResult};
use crate::storage::traits::KeyValueStore;

/// Process-local store, used for tests and dry runs
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> WatchResult<MutexGuard<'_, HashMap<String, Value>>> {
        self.entries
            .lock()
            .map_err(|_| WatchError::Config("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, keys: &[String]) -> WatchResult<HashMap<String, Value>> {
        let entries = self.entries()?;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    fn set(&self, new_entries: HashMap<String, Value>) -> WatchResult<()> {
        self.entries()?.extend(new_entries);
        Ok(())
    }

    fn remove(&self, keys: &[String]) -> WatchResult<()> {
        let mut entries = self.entries()?;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}
