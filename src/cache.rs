// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Record cache with a best-effort persisted backing store
//!
//! The in-memory map is the source of truth for the session. Every record is
//! registered under both its numeric id and its name, so either lookup
//! succeeds. Entries are never evicted or expired; a re-fetch overwrites the
//! persisted copy.

use crate::types::Keyed;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, warn};

/// Store key prefix for creature records
pub const CREATURE_PREFIX: &str = "pkm:";

/// Store key prefix for item records
pub const ITEM_PREFIX: &str = "itm:";

// =============================================================================
// Persisted store
// =============================================================================

/// Summary of a persisted store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored entries
    pub entries: usize,
    /// Total payload size in bytes
    pub bytes: u64,
}

/// String-keyed JSON store that survives restarts
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<Value>>;
    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &Value) -> Result<()>;
    /// Remove every entry, returning how many were removed
    fn clear(&self) -> Result<usize>;
    /// Entry count and size
    fn stats(&self) -> Result<StoreStats>;
}

/// On-disk envelope for one stored value
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    stored_at: DateTime<Utc>,
    value: Value,
}

/// Directory-backed store: one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir` (created lazily on first write)
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the entries
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`; names are hashed so any key is a valid file name
    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = hex::encode(hasher.finalize());
        self.dir.join(format!("{}.json", &hash[..16]))
    }

    fn entry_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let entry: StoredEntry = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if entry.key != key {
            // Hash prefix collision
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;
        let entry = StoredEntry { key: key.to_string(), stored_at: Utc::now(), value: value.clone() };
        let path = self.path_for(key);
        let json = serde_json::to_string(&entry).context("Failed to serialize cache entry")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        let files = self.entry_files()?;
        for path in &files {
            fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(files.len())
    }

    fn stats(&self) -> Result<StoreStats> {
        let mut stats = StoreStats::default();
        for path in self.entry_files()? {
            stats.entries += 1;
            stats.bytes += fs::metadata(&path)?.len();
        }
        Ok(stats)
    }
}

/// Volatile store, used when persistence is disabled and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }

    fn stats(&self) -> Result<StoreStats> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let bytes = entries.values().map(|v| v.to_string().len() as u64).sum();
        Ok(StoreStats { entries: entries.len(), bytes })
    }
}

// =============================================================================
// Record cache
// =============================================================================

/// Session cache of records keyed by id and by name
pub struct RecordCache<T> {
    prefix: &'static str,
    records: RwLock<HashMap<String, Arc<T>>>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl<T> std::fmt::Debug for RecordCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordCache")
            .field("prefix", &self.prefix)
            .field("keys", &self.records.read().map(|r| r.len()).unwrap_or_default())
            .field("persisted", &self.store.is_some())
            .finish()
    }
}

impl<T> RecordCache<T>
where
    T: Keyed + Serialize + DeserializeOwned,
{
    /// In-memory cache without a backing store
    #[must_use]
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, records: RwLock::new(HashMap::new()), store: None }
    }

    /// Cache that writes through to `store`
    #[must_use]
    pub fn with_store(prefix: &'static str, store: Arc<dyn KeyValueStore>) -> Self {
        Self { prefix, records: RwLock::new(HashMap::new()), store: Some(store) }
    }

    /// Look up a record by id or name, hydrating from the store on a miss
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        {
            let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(record) = records.get(key) {
                debug!("cache hit {}{}", self.prefix, key);
                return Some(Arc::clone(record));
            }
        }

        let store = self.store.as_ref()?;
        let stored_key = format!("{}{}", self.prefix, key);
        let value = match store.get(&stored_key) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!("cache store read failed for {}: {:#}", stored_key, e);
                return None;
            }
        };

        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                debug!("cache hydrated {}", stored_key);
                Some(self.register(key, record))
            }
            Err(e) => {
                warn!("discarding unreadable cache entry {}: {}", stored_key, e);
                None
            }
        }
    }

    /// Store `record` under `key` and under its id and name
    pub fn set(&self, key: &str, record: T) -> Arc<T> {
        let record = self.register(key, record);
        self.persist(key, &record);
        record
    }

    /// Store `record` under its id and name
    pub fn insert(&self, record: T) -> Arc<T> {
        let key = record.id().to_string();
        self.set(&key, record)
    }

    /// Number of distinct keys held in memory
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is held in memory
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn keys_for(key: &str, record: &T) -> Vec<String> {
        let mut keys = vec![key.to_string(), record.id().to_string(), record.name().to_string()];
        keys.sort_unstable();
        keys.dedup();
        keys.retain(|k| !k.is_empty());
        keys
    }

    fn register(&self, key: &str, record: T) -> Arc<T> {
        let keys = Self::keys_for(key, &record);
        let record = Arc::new(record);
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        for k in keys {
            records.insert(k, Arc::clone(&record));
        }
        record
    }

    fn persist(&self, key: &str, record: &T) {
        let Some(store) = &self.store else { return };
        let value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(e) => {
                warn!("cannot persist {}{}: {}", self.prefix, key, e);
                return;
            }
        };
        for k in Self::keys_for(key, record) {
            let stored_key = format!("{}{}", self.prefix, k);
            if let Err(e) = store.set(&stored_key, &value) {
                warn!("cache store write failed for {}: {:#}", stored_key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CreatureRecord, ItemRecord};
    use tempfile::TempDir;

    fn creature(id: u32, name: &str) -> CreatureRecord {
        CreatureRecord { id, name: name.into(), height: 4, weight: 60, ..Default::default() }
    }

    #[test]
    fn test_set_registers_id_and_name() {
        let cache = RecordCache::new(CREATURE_PREFIX);
        cache.set("pikachu", creature(25, "pikachu"));

        assert_eq!(cache.get("25").unwrap().name, "pikachu");
        assert_eq!(cache.get("pikachu").unwrap().id, 25);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_set_overwrites_previous_record() {
        let cache = RecordCache::new(CREATURE_PREFIX);
        cache.insert(creature(25, "pikachu"));
        let mut heavier = creature(25, "pikachu");
        heavier.weight = 70;
        cache.insert(heavier);

        assert_eq!(cache.get("pikachu").unwrap().weight, 70);
        assert_eq!(cache.get("25").unwrap().weight, 70);
    }

    #[test]
    fn test_miss_returns_none() {
        let cache: RecordCache<CreatureRecord> = RecordCache::new(CREATURE_PREFIX);
        assert!(cache.get("missingno").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_hydrates_from_store_across_instances() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let first = RecordCache::with_store(CREATURE_PREFIX, Arc::clone(&store));
        first.insert(creature(1, "bulbasaur"));

        let second: RecordCache<CreatureRecord> = RecordCache::with_store(CREATURE_PREFIX, store);
        let record = second.get("bulbasaur").unwrap();
        assert_eq!(record.id, 1);
        // Hydration registers the complementary key in memory
        assert!(second.records.read().unwrap().contains_key("1"));
    }

    #[test]
    fn test_prefixes_keep_kinds_apart() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let creatures = RecordCache::with_store(CREATURE_PREFIX, Arc::clone(&store));
        creatures.insert(creature(1, "bulbasaur"));

        let items: RecordCache<ItemRecord> = RecordCache::with_store(ITEM_PREFIX, Arc::clone(&store));
        assert!(items.get("1").is_none());
        assert!(store.get("pkm:1").unwrap().is_some());
    }

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("records"));

        assert!(store.get("pkm:1").unwrap().is_none());
        store.set("pkm:1", &serde_json::json!({ "id": 1 })).unwrap();
        store.set("pkm:mr-mime/../x", &serde_json::json!({ "id": 122 })).unwrap();

        assert_eq!(store.get("pkm:1").unwrap().unwrap()["id"], 1);
        assert_eq!(store.stats().unwrap().entries, 2);
        assert_eq!(store.clear().unwrap(), 2);
        assert_eq!(store.stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn test_corrupt_entry_is_ignored() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("pkm:25", &serde_json::json!("not a record")).unwrap();

        let cache: RecordCache<CreatureRecord> = RecordCache::with_store(CREATURE_PREFIX, store);
        assert!(cache.get("25").is_none());
    }
}
