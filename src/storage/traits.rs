use std::collections::HashMap;

use serde_json::Value;

use crate::errors::WatchResult;

/// Minimal persistent store: named JSON records read and written in batches
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Return the records that exist among `keys`; missing keys are absent
    fn get(&self, keys: &[String]) -> WatchResult<HashMap<String, Value>>;
    /// Write all `entries` at once, replacing previous values
    fn set(&self, entries: HashMap<String, Value>) -> WatchResult<()>;
    fn remove(&self, keys: &[String]) -> WatchResult<()>;
}
