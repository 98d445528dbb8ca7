use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{FetchedItem, LastSeenMap, Site};
use crate::errors::WatchResult;
use crate::storage::traits::KeyValueStore;

pub const SITES_KEY: &str = "wp_sites";
pub const LAST_SEEN_KEY: &str = "wp_lasts";
pub const INTERVAL_KEY: &str = "wp_interval_minutes";
pub const DEFAULT_INTERVAL_MINUTES: u32 = 1;

pub fn cache_key(site_id: &str) -> String {
    format!("cache_{}", site_id)
}

/// Typed view over the key-value store shared by every component
pub struct StateStore<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> StateStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Seed an empty site list and the default interval when absent
    pub fn init_defaults(&self) -> WatchResult<()> {
        let existing = self
            .store
            .get(&[SITES_KEY.to_string(), INTERVAL_KEY.to_string()])?;

        let mut seed = HashMap::new();
        if !existing.contains_key(SITES_KEY) {
            seed.insert(SITES_KEY.to_string(), Value::Array(Vec::new()));
        }
        if !existing.contains_key(INTERVAL_KEY) {
            seed.insert(INTERVAL_KEY.to_string(), Value::from(DEFAULT_INTERVAL_MINUTES));
        }

        if seed.is_empty() {
            return Ok(());
        }
        self.store.set(seed)
    }

    pub fn sites(&self) -> WatchResult<Vec<Site>> {
        Ok(self.read(SITES_KEY)?.unwrap_or_default())
    }

    pub fn save_sites(&self, sites: &[Site]) -> WatchResult<()> {
        self.write(SITES_KEY, &sites)
    }

    /// Sites and last-seen map in a single read
    pub fn batch_state(&self) -> WatchResult<(Vec<Site>, LastSeenMap)> {
        let mut values = self
            .store
            .get(&[SITES_KEY.to_string(), LAST_SEEN_KEY.to_string()])?;

        let sites = decode(values.remove(SITES_KEY))?.unwrap_or_default();
        let last_seen = decode(values.remove(LAST_SEEN_KEY))?.unwrap_or_default();
        Ok((sites, last_seen))
    }

    pub fn last_seen(&self) -> WatchResult<LastSeenMap> {
        Ok(self.read(LAST_SEEN_KEY)?.unwrap_or_default())
    }

    pub fn save_last_seen(&self, last_seen: &LastSeenMap) -> WatchResult<()> {
        self.write(LAST_SEEN_KEY, last_seen)
    }

    pub fn cache(&self, site_id: &str) -> WatchResult<Vec<FetchedItem>> {
        Ok(self.read(&cache_key(site_id))?.unwrap_or_default())
    }

    pub fn save_cache(&self, site_id: &str, items: &[FetchedItem]) -> WatchResult<()> {
        self.write(&cache_key(site_id), &items)
    }

    pub fn remove_cache(&self, site_id: &str) -> WatchResult<()> {
        self.store.remove(&[cache_key(site_id)])
    }

    /// Stored interval, falling back to the default when unset or invalid
    pub fn interval_minutes(&self) -> WatchResult<u32> {
        let stored: Option<Value> = self.read(INTERVAL_KEY)?;
        Ok(stored
            .and_then(|v| v.as_u64())
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_INTERVAL_MINUTES))
    }

    pub fn set_interval_minutes(&self, minutes: u32) -> WatchResult<()> {
        self.write(INTERVAL_KEY, &minutes.max(1))
    }

    /// Drop the last-seen record and cache that belong to a deleted site
    pub fn forget_site(&self, site_id: &str) -> WatchResult<()> {
        let mut last_seen = self.last_seen()?;
        if last_seen.remove(site_id).is_some() {
            self.save_last_seen(&last_seen)?;
        }
        self.remove_cache(site_id)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> WatchResult<Option<T>> {
        let mut values = self.store.get(&[key.to_string()])?;
        decode(values.remove(key))
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> WatchResult<()> {
        let value = serde_json::to_value(value)?;
        self.store.set(HashMap::from([(key.to_string(), value)]))
    }
}

fn decode<T: DeserializeOwned>(value: Option<Value>) -> WatchResult<Option<T>> {
    value
        .filter(|v| !v.is_null())
        .map(serde_json::from_value)
        .transpose()
        .map_err(Into::into)
}
