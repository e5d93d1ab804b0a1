//! Session-backed key-value slots.
//!
//! Each browser session is the storefront's per-visitor "local storage".
//! `tower-sessions` is async, while cart operations are synchronous, so a
//! handler snapshots the slots it needs, runs the cart operations against
//! the snapshot, then flushes only the slots that were written.

use std::collections::{BTreeSet, HashMap};

use tower_sessions::Session;

use super::storage::{KeyValueStore, StorageError};

/// A synchronous view of selected session slots.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    values: HashMap<String, Vec<u8>>,
    dirty: BTreeSet<String>,
}

impl SessionSnapshot {
    /// Read `keys` from the session.
    ///
    /// String values are taken verbatim; any other JSON value is kept as its
    /// JSON text so the caller's decoder can judge it.
    ///
    /// # Errors
    ///
    /// Returns the session error if the session store cannot be read.
    pub async fn load(
        session: &Session,
        keys: &[&str],
    ) -> Result<Self, tower_sessions::session::Error> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            let bytes = match session.get_value(key).await? {
                Some(serde_json::Value::String(text)) => text.into_bytes(),
                Some(other) => other.to_string().into_bytes(),
                None => continue,
            };
            values.insert((*key).to_string(), bytes);
        }

        Ok(Self {
            values,
            dirty: BTreeSet::new(),
        })
    }

    /// Write every slot that was `set` back into the session.
    ///
    /// # Errors
    ///
    /// Returns the session error if the session cannot be updated.
    pub async fn flush(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        for key in &self.dirty {
            if let Some(bytes) = self.values.get(key) {
                let text = String::from_utf8_lossy(bytes).into_owned();
                session.insert(key, text).await?;
            }
        }
        Ok(())
    }

    /// Whether any slot was written since the snapshot was taken.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

impl KeyValueStore for SessionSnapshot {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        self.dirty.insert(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_load_missing_key() {
        let session = session();
        let snapshot = SessionSnapshot::load(&session, &["cart"]).await.unwrap();
        assert!(snapshot.get("cart").unwrap().is_none());
        assert!(!snapshot.is_dirty());
    }

    #[tokio::test]
    async fn test_flush_writes_dirty_slots() {
        let session = session();

        let mut snapshot = SessionSnapshot::load(&session, &["cart"]).await.unwrap();
        snapshot.set("cart", b"[]".to_vec()).unwrap();
        assert!(snapshot.is_dirty());
        snapshot.flush(&session).await.unwrap();

        let reloaded = SessionSnapshot::load(&session, &["cart"]).await.unwrap();
        assert_eq!(reloaded.get("cart").unwrap().unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_non_string_value_is_kept_as_json_text() {
        let session = session();
        session.insert("cart", 42).await.unwrap();

        let snapshot = SessionSnapshot::load(&session, &["cart"]).await.unwrap();
        assert_eq!(snapshot.get("cart").unwrap().unwrap(), b"42");
    }
}
