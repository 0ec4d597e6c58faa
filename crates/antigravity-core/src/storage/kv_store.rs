//! Key-value store trait.
//!
//! Values are JSON, grouped into namespaces (`logs`, `viettat`, ...).
//! Implementations live in antigravity-infra; [`MemoryKvStore`] is the
//! in-process stand-in.
//!
//! [`MemoryKvStore`]: super::memory::MemoryKvStore

use std::collections::BTreeMap;

use antigravity_types::error::StorageError;

/// Namespace holding per-user conversation logs.
pub const LOGS_NAMESPACE: &str = "logs";

/// Namespace holding the abbreviation table (`viettat.json` on disk).
pub const ABBREVIATIONS_NAMESPACE: &str = "viettat";

/// Trait for namespaced key-value persistent storage.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        namespace: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, StorageError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        namespace: &str,
        key: &str,
        value: serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send;

    /// Every entry of a namespace. A namespace that was never written is empty.
    fn load_all(
        &self,
        namespace: &str,
    ) -> impl std::future::Future<Output = Result<BTreeMap<String, serde_json::Value>, StorageError>>
    + Send;
}
