//! Durable key-value storage.
//!
//! Values are opaque strings (JSON text in practice). Two implementations:
//!
//! - [`FileStore`]: every key in a single JSON object file, rewritten
//!   atomically (temp file + rename) on each change
//! - [`MemoryStore`]: process-local, with an optional byte quota
//!
//! Implementations must not emit log events while holding their internal
//! lock: the log journal writes back into the same store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// A string-to-string durable map.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Returns whether it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Returns every key, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;
}

/// In-memory store.
///
/// With a quota, a `set` that would push the total size of keys and values
/// past the limit fails with [`StoreError::QuotaExceeded`] and leaves the
/// store unchanged.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store limited to `quota` bytes of keys plus values.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::default(),
            quota: Some(quota),
        }
    }

    /// Returns the current size of keys plus values in bytes.
    pub fn used_bytes(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(quota) = self.quota {
            let current: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
            let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = current - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.keys().cloned().collect())
    }
}

/// File-backed store.
///
/// The whole map lives in memory and is written to disk after every change.
/// The file is created with `0600` permissions on Unix.
#[derive(Debug)]
pub struct FileStore {
    /// Path to the store file.
    path: PathBuf,

    /// In-memory copy of the file contents.
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, loading it if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = entries.len(), "opened store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&temp_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Applies `change` to a copy of the map, persists it, then commits it.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> StoreResult<T> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        let result = change(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(result)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let existed = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key);
        if !existed {
            return Ok(false);
        }
        self.update(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.keys().cloned().collect())
    }
}
