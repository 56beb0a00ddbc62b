//! The storage medium behind image collections.
//!
//! [`TextStore`] mirrors a per-origin browser store: flat string keys, string
//! values, full replacement on write, no atomicity across read-modify-write.
//! Concurrent writers to the same key race and the last writer wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// Synchronous string-keyed text storage.
pub trait TextStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any prior value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value under `key` if present.
    fn remove(&self, key: &str);
}

/// In-memory text storage. Contents die with the process.
pub struct MemoryTextStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTextStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryTextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextStore for MemoryTextStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// Directory-backed text storage: one UTF-8 file per key.
///
/// Keys are restricted to `[A-Za-z0-9._-]` so they stay path-safe; anything
/// else is rejected with [`StoreError::InvalidKey`] on write and treated as
/// absent on read.
pub struct DirTextStore {
    root: PathBuf,
}

impl DirTextStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl TextStore for DirTextStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key = %key, %e, "Failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) {
        let Ok(path) = self.path_for(key) else { return };
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(key = %key, %e, "Failed to remove stored value");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_get_remove() {
        let store = MemoryTextStore::new();
        assert_eq!(store.get("k"), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k"), Some("v1".to_string()));

        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k"), Some("v2".to_string()));

        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_dir_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let store = DirTextStore::new(dir.path()).unwrap();
        store.set("uploadedImages", "[\"a.png\"]").unwrap();
        drop(store);

        let reopened = DirTextStore::new(dir.path()).unwrap();
        assert_eq!(
            reopened.get("uploadedImages"),
            Some("[\"a.png\"]".to_string())
        );
    }

    #[test]
    fn test_dir_store_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTextStore::new(dir.path()).unwrap();

        store.set("k", "v").unwrap();
        store.remove("k");
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_dir_store_rejects_unsafe_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTextStore::new(dir.path()).unwrap();

        for key in ["", ".", "..", "a/b", "a\\b", "a b"] {
            let result = store.set(key, "v");
            assert!(
                matches!(result, Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
            assert_eq!(store.get(key), None);
        }
    }

    #[test]
    fn test_dir_store_accepts_wellknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirTextStore::new(dir.path()).unwrap();

        for key in ["uploadedImages", "productImages", "uploadedFiles"] {
            store.set(key, "[]").unwrap();
            assert_eq!(store.get(key), Some("[]".to_string()));
        }
    }
}
