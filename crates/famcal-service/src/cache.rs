//! Holiday cache.
//!
//! Holiday batches are kept in memory and mirrored to the durable store under
//! `holidays_{key}`, where the key is a country code or `COUNTRY-YEAR`.
//! Reads are memory-first and fall through to the store, repopulating memory.
//!
//! Entries never expire; they stay valid until [`HolidayCache::clear`].
//! Store failures are logged and never surfaced: the cache only makes fetches
//! cheaper, it is never a reason for one to fail.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use famcal_core::HolidayRecord;
use tracing::{debug, error, warn};

use crate::store::KeyValueStore;

/// Prefix of every holiday entry in the durable store.
pub const HOLIDAY_KEY_PREFIX: &str = "holidays_";

/// Returns the durable store key for a cache key.
pub fn store_key(key: &str) -> String {
    format!("{}{}", HOLIDAY_KEY_PREFIX, key)
}

/// Two-level cache of holiday batches.
pub struct HolidayCache {
    store: Arc<dyn KeyValueStore>,
    entries: RwLock<HashMap<String, Vec<HolidayRecord>>>,
}

impl HolidayCache {
    /// Creates an empty cache backed by `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true if `key` is cached in memory or in the store.
    pub fn has(&self, key: &str) -> bool {
        if self.memory_get(key).is_some() {
            return true;
        }
        match self.store.get(&store_key(key)) {
            Ok(value) => value.is_some(),
            Err(e) => {
                error!(key = %key, error = %e, "failed to read holiday cache");
                false
            }
        }
    }

    /// Returns the batch cached under `key`.
    ///
    /// A value in the store that does not parse is logged and treated as a miss.
    pub fn get(&self, key: &str) -> Option<Vec<HolidayRecord>> {
        if let Some(records) = self.memory_get(key) {
            debug!(key = %key, "holiday cache hit (memory)");
            return Some(records);
        }

        let raw = match self.store.get(&store_key(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "holiday cache miss");
                return None;
            }
            Err(e) => {
                error!(key = %key, error = %e, "failed to read holiday cache");
                return None;
            }
        };

        match serde_json::from_str::<Vec<HolidayRecord>>(&raw) {
            Ok(records) => {
                self.entries
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.to_string(), records.clone());
                debug!(key = %key, count = records.len(), "holiday cache hit (store)");
                Some(records)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "ignoring malformed cached holidays");
                None
            }
        }
    }

    /// Caches `records` under `key`, in memory and in the store.
    ///
    /// A store failure is logged; the memory entry is kept.
    pub fn put(&self, key: &str, records: Vec<HolidayRecord>) {
        let serialized = serde_json::to_string(&records);
        let count = records.len();

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), records);

        let result = serialized
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.store
                    .set(&store_key(key), &json)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(()) => debug!(key = %key, count, "cached holidays"),
            Err(e) => error!(key = %key, error = %e, "failed to persist holiday cache"),
        }
    }

    /// Empties memory and removes every holiday entry from the store.
    ///
    /// Other store keys are left alone.
    pub fn clear(&self) {
        let count = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let count = entries.len();
            entries.clear();
            count
        };

        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!(error = %e, "failed to list store keys while clearing cache");
                return;
            }
        };

        let mut removed = 0;
        for key in keys.iter().filter(|k| k.starts_with(HOLIDAY_KEY_PREFIX)) {
            match self.store.remove(key) {
                Ok(_) => removed += 1,
                Err(e) => error!(key = %key, error = %e, "failed to remove cached holidays"),
            }
        }

        debug!(memory = count, store = removed, "cleared holiday cache");
    }

    /// Returns the keys cached in memory, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Returns the cache keys present in the durable store, sorted.
    ///
    /// Unlike [`keys`](Self::keys) this includes batches cached by earlier
    /// processes that have not been read yet.
    pub fn stored_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = match self.store.keys() {
            Ok(keys) => keys
                .iter()
                .filter_map(|k| k.strip_prefix(HOLIDAY_KEY_PREFIX))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                error!(error = %e, "failed to list store keys");
                Vec::new()
            }
        };
        keys.sort();
        keys
    }

    fn memory_get(&self, key: &str) -> Option<Vec<HolidayRecord>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl std::fmt::Debug for HolidayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayCache")
            .field("keys", &self.keys())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use famcal_providers::mock::fallback_holidays;

    fn cache_with_store() -> (HolidayCache, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (HolidayCache::new(store.clone()), store)
    }

    #[test]
    fn put_then_get() {
        let (cache, store) = cache_with_store();
        let records = fallback_holidays();

        assert!(!cache.has("ES"));
        assert_eq!(cache.get("ES"), None);

        cache.put("ES", records.clone());
        assert!(cache.has("ES"));
        assert_eq!(cache.get("ES"), Some(records));
        assert!(store.get("holidays_ES").unwrap().is_some());
        assert_eq!(cache.keys(), vec!["ES"]);
    }

    #[test]
    fn put_is_idempotent() {
        let (cache, store) = cache_with_store();
        let records = fallback_holidays();

        cache.put("ES", records.clone());
        let first = store.get("holidays_ES").unwrap();
        cache.put("ES", records.clone());

        assert_eq!(store.get("holidays_ES").unwrap(), first);
        assert_eq!(cache.get("ES"), Some(records));
        assert_eq!(cache.keys().len(), 1);
    }

    #[test]
    fn read_through_from_store() {
        let store = Arc::new(MemoryStore::new());
        HolidayCache::new(store.clone()).put("ES-2025", fallback_holidays());

        // A fresh cache over the same store starts with empty memory.
        let cache = HolidayCache::new(store);
        assert!(cache.keys().is_empty());
        assert_eq!(cache.stored_keys(), vec!["ES-2025"]);
        assert!(cache.has("ES-2025"));

        assert_eq!(cache.get("ES-2025"), Some(fallback_holidays()));
        assert_eq!(cache.keys(), vec!["ES-2025"]);
    }

    #[test]
    fn malformed_store_value_is_a_miss() {
        let (cache, store) = cache_with_store();
        store.set("holidays_FR", "{not json").unwrap();

        assert_eq!(cache.get("FR"), None);
        assert!(cache.keys().is_empty());
    }

    #[test]
    fn clear_removes_only_holiday_keys() {
        let (cache, store) = cache_with_store();
        cache.put("ES", fallback_holidays());
        cache.put("FR-2024", fallback_holidays());
        store.set("lastUpdate", "2025-04-20T10:00:00Z").unwrap();
        store.set("app_logs", "[]").unwrap();

        cache.clear();

        assert_eq!(cache.get("ES"), None);
        assert!(!cache.has("FR-2024"));
        assert!(cache.keys().is_empty());
        assert!(cache.stored_keys().is_empty());
        assert_eq!(store.keys().unwrap(), vec!["app_logs", "lastUpdate"]);
    }

    #[test]
    fn quota_failure_is_swallowed_and_memory_serves() {
        let store = Arc::new(MemoryStore::with_quota(16));
        let cache = HolidayCache::new(store.clone());

        cache.put("ES", fallback_holidays());

        assert_eq!(store.get("holidays_ES").unwrap(), None);
        assert_eq!(cache.get("ES"), Some(fallback_holidays()));
    }
}
