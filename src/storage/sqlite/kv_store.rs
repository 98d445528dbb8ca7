use std::collections::HashMap;

use serde_json::Value;

use crate::errors::WatchResult;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::KeyValueStore;

pub struct SqliteKeyValueStore {
    storage: SqliteStorage,
}

impl SqliteKeyValueStore {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, keys: &[String]) -> WatchResult<HashMap<String, Value>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.storage.connection()?;

        // Build placeholders for IN clause
        let placeholders: Vec<String> = (0..keys.len()).map(|i| format!("?{}", i + 1)).collect();
        let query = format!(
            "SELECT key, value FROM kv_store WHERE key IN ({})",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(keys.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = HashMap::with_capacity(rows.len());
        for (key, raw) in rows {
            entries.insert(key, serde_json::from_str(&raw)?);
        }
        Ok(entries)
    }

    fn set(&self, entries: HashMap<String, Value>) -> WatchResult<()> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            )?;
            for (key, value) in &entries {
                stmt.execute((key, serde_json::to_string(value)?))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, keys: &[String]) -> WatchResult<()> {
        let conn = self.storage.connection()?;
        for key in keys {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        }
        Ok(())
    }
}
