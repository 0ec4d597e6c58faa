//! In-memory [`KvStore`].
//!
//! Backs tests and ephemeral runs. Writes can be made to fail on demand so
//! callers' fallback paths are exercisable.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use antigravity_types::error::StorageError;

use super::kv_store::KvStore;

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    namespaces: Mutex<HashMap<String, BTreeMap<String, serde_json::Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a namespace with entries.
    pub fn with_namespace<I, K>(self, namespace: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, serde_json::Value)>,
        K: Into<String>,
    {
        {
            let mut namespaces = self.lock();
            let ns = namespaces.entry(namespace.to_string()).or_default();
            for (key, value) in entries {
                ns.insert(key.into(), value);
            }
        }
        self
    }

    /// Make every subsequent `set`/`delete` fail with an IO error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, BTreeMap<String, serde_json::Value>>> {
        self.namespaces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Ok(self.lock().get(namespace).and_then(|ns| ns.get(key)).cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        self.check_writable()?;
        self.lock()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn load_all(&self, namespace: &str) -> Result<BTreeMap<String, serde_json::Value>, StorageError> {
        Ok(self.lock().get(namespace).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryKvStore::new();
        assert!(store.get("logs", "u1").await.unwrap().is_none());

        store.set("logs", "u1", json!(["User: hi"])).await.unwrap();
        assert_eq!(store.get("logs", "u1").await.unwrap(), Some(json!(["User: hi"])));
        assert!(store.get("logs", "u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failing_writes_leave_data_untouched() {
        let store = MemoryKvStore::new().with_namespace("logs", [("u1", json!([]))]);
        store.set_fail_writes(true);
        assert!(store.set("logs", "u1", json!(["x"])).await.is_err());
        assert_eq!(store.load_all("logs").await.unwrap().len(), 1);
        assert_eq!(store.get("logs", "u1").await.unwrap(), Some(json!([])));
    }
}
