//! Key-value backends for the persisted cart.
//!
//! The cart is written to a single named slot (`cart`). Backends are
//! synchronous: cart operations run to completion without suspending, and
//! async sources (the HTTP session) are bridged by snapshotting them first.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors reading or writing a key-value slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The key cannot be used as a slot name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A string-keyed byte store.
///
/// Writes overwrite the previous value. There is no conflict detection:
/// concurrent writers to the same slot are last-writer-wins.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
}

/// In-memory store, mainly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one pre-populated slot.
    #[must_use]
    pub fn with_value(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.into());
        Self { values }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// One file per key inside a data directory.
///
/// Used by the CLI so a local cart survives between invocations.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Use `root` as the data directory. It is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(self.root.join(key))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl KeyValueStore for DirectoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.slot_path(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.root)?;

        // Replace atomically: readers never observe a partially written slot.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("boutique-storage-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();
        assert!(store.get("cart").unwrap().is_none());

        store.set("cart", b"[1]".to_vec()).unwrap();
        store.set("cart", b"[2]".to_vec()).unwrap();
        assert_eq!(store.get("cart").unwrap().unwrap(), b"[2]");
    }

    #[test]
    fn test_directory_store_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let mut store = DirectoryStore::new(&dir);

        assert!(store.get("cart").unwrap().is_none());
        store.set("cart", b"[]".to_vec()).unwrap();
        assert_eq!(store.get("cart").unwrap().unwrap(), b"[]");

        // A second handle on the same directory sees the write.
        let reopened = DirectoryStore::new(&dir);
        assert_eq!(reopened.get("cart").unwrap().unwrap(), b"[]");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_directory_store_rejects_path_keys() {
        let mut store = DirectoryStore::new(scratch_dir("keys"));
        assert!(matches!(
            store.get("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("", Vec::new()),
            Err(StorageError::InvalidKey(_))
        ));
    }
}
