//! JSON-file key-value store.
//!
//! Each namespace is one JSON object file: `{data_dir}/{namespace}.json`.
//! A missing file reads as an empty namespace. Writes replace the whole file
//! through a temp file and a rename, and a store-wide async mutex serializes
//! read-modify-write cycles.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use antigravity_core::storage::kv_store::KvStore;
use antigravity_types::error::StorageError;

type Namespace = BTreeMap<String, serde_json::Value>;

pub struct JsonFileKvStore {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileKvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing `namespace`. Namespaces are restricted to `[A-Za-z0-9_-]`.
    pub fn namespace_path(&self, namespace: &str) -> Result<PathBuf, StorageError> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidNamespace(namespace.to_string()));
        }
        Ok(self.data_dir.join(format!("{namespace}.json")))
    }

    async fn read_namespace(&self, path: &Path) -> Result<Namespace, StorageError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Namespace::new()),
            Err(err) => return Err(StorageError::Io(format!("{}: {err}", path.display()))),
        };
        if content.trim().is_empty() {
            return Ok(Namespace::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))
    }

    async fn write_namespace(&self, path: &Path, namespace: &Namespace) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(format!("{}: {e}", parent.display())))?;
        }

        let body = serde_json::to_string_pretty(namespace)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), entries = namespace.len(), "namespace written");
        Ok(())
    }
}

impl KvStore for JsonFileKvStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let path = self.namespace_path(namespace)?;
        let _guard = self.lock.lock().await;
        let mut entries = self.read_namespace(&path).await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, namespace: &str, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        let path = self.namespace_path(namespace)?;
        let _guard = self.lock.lock().await;
        let mut entries = self.read_namespace(&path).await?;
        entries.insert(key.to_string(), value);
        self.write_namespace(&path, &entries).await
    }

    async fn load_all(&self, namespace: &str) -> Result<Namespace, StorageError> {
        let path = self.namespace_path(namespace)?;
        let _guard = self.lock.lock().await;
        self.read_namespace(&path).await
    }
}
