//! Conversation store.
//!
//! Each user id owns one slot guarded by an async mutex, held across append
//! and persist so a user's turns are serialized while different users proceed
//! in parallel. A slot is filled from the `logs` namespace on first touch.
//! The in-memory window is authoritative: a failed write is logged and
//! otherwise ignored.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use antigravity_types::conversation::{ConversationEntry, HISTORY_WINDOW, Role};

use crate::storage::kv_store::{KvStore, LOGS_NAMESPACE};

type Slot = Arc<Mutex<Option<VecDeque<ConversationEntry>>>>;

pub struct ConversationStore<K: KvStore> {
    store: Arc<K>,
    slots: DashMap<String, Slot>,
}

impl<K: KvStore> ConversationStore<K> {
    pub fn new(store: Arc<K>) -> Self {
        Self {
            store,
            slots: DashMap::new(),
        }
    }

    /// Append an entry, keep the newest [`HISTORY_WINDOW`] and persist.
    pub async fn append(&self, user_id: &str, role: Role, content: &str) {
        let slot = self.slot(user_id);
        let mut guard = slot.lock().await;
        let history = self.loaded(user_id, &mut guard).await;
        self.push_and_persist(user_id, history, ConversationEntry::new(role, content))
            .await;
    }

    /// Record a user turn and return the context that precedes it.
    ///
    /// Append and snapshot happen under one slot lock, so an overlapping
    /// message from the same user can never stand in for this one as the
    /// excluded last entry.
    pub async fn append_user_turn(&self, user_id: &str, content: &str) -> String {
        let slot = self.slot(user_id);
        let mut guard = slot.lock().await;
        let history = self.loaded(user_id, &mut guard).await;
        self.push_and_persist(user_id, history, ConversationEntry::new(Role::User, content))
            .await;
        join_excluding_last(history)
    }

    /// Every entry except the newest, as `\n`-joined role-tagged lines.
    ///
    /// Empty when the user has fewer than two entries.
    pub async fn history_excluding_last(&self, user_id: &str) -> String {
        let slot = self.slot(user_id);
        let mut guard = slot.lock().await;
        let history = self.loaded(user_id, &mut guard).await;

        join_excluding_last(history)
    }

    /// Snapshot of a user's history, oldest first.
    ///
    /// A user with no slot yet is read straight from the store without
    /// creating one.
    pub async fn history(&self, user_id: &str) -> Vec<ConversationEntry> {
        let existing = self.slots.get(user_id).map(|slot| Arc::clone(slot.value()));
        match existing {
            Some(slot) => {
                let mut guard = slot.lock().await;
                self.loaded(user_id, &mut guard).await.iter().cloned().collect()
            }
            None => self.fetch(user_id).await.into(),
        }
    }

    async fn push_and_persist(
        &self,
        user_id: &str,
        history: &mut VecDeque<ConversationEntry>,
        entry: ConversationEntry,
    ) {
        history.push_back(entry);
        while history.len() > HISTORY_WINDOW {
            history.pop_front();
        }

        let lines: Vec<String> = history.iter().map(ConversationEntry::to_line).collect();
        if let Err(e) = self
            .store
            .set(LOGS_NAMESPACE, user_id, serde_json::Value::from(lines))
            .await
        {
            tracing::warn!(user_id, error = %e, "failed to persist conversation history");
        }
    }

    fn slot(&self, user_id: &str) -> Slot {
        self.slots.entry(user_id.to_string()).or_default().clone()
    }

    async fn loaded<'a>(
        &self,
        user_id: &str,
        slot: &'a mut Option<VecDeque<ConversationEntry>>,
    ) -> &'a mut VecDeque<ConversationEntry> {
        if slot.is_none() {
            *slot = Some(self.fetch(user_id).await);
        }
        slot.get_or_insert_with(VecDeque::new)
    }

    async fn fetch(&self, user_id: &str) -> VecDeque<ConversationEntry> {
        let value = match self.store.get(LOGS_NAMESPACE, user_id).await {
            Ok(Some(value)) => value,
            Ok(None) => return VecDeque::new(),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "failed to load conversation history");
                return VecDeque::new();
            }
        };

        let lines: Vec<String> = match serde_json::from_value(value) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "stored conversation history is malformed");
                return VecDeque::new();
            }
        };

        let mut history: VecDeque<ConversationEntry> = lines
            .iter()
            .filter_map(|line| ConversationEntry::parse_line(line))
            .collect();
        while history.len() > HISTORY_WINDOW {
            history.pop_front();
        }
        history
    }
}

/// Every entry except the newest, as `\n`-joined role-tagged lines.
fn join_excluding_last(history: &VecDeque<ConversationEntry>) -> String {
    if history.len() < 2 {
        return String::new();
    }
    history
        .iter()
        .take(history.len() - 1)
        .map(ConversationEntry::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryKvStore;
    use serde_json::json;

    fn store() -> (Arc<MemoryKvStore>, ConversationStore<MemoryKvStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        (kv.clone(), ConversationStore::new(kv))
    }

    #[tokio::test]
    async fn history_excluding_last_needs_two_entries() {
        let (_, store) = store();
        assert_eq!(store.history_excluding_last("u1").await, "");

        store.append("u1", Role::User, "chào").await;
        assert_eq!(store.history_excluding_last("u1").await, "");

        store.append("u1", Role::Assistant, "xin chào").await;
        store.append("u1", Role::User, "khỏe không").await;
        assert_eq!(
            store.history_excluding_last("u1").await,
            "User: chào\nBot: xin chào"
        );
    }

    #[tokio::test]
    async fn window_evicts_oldest_first() {
        let (kv, store) = store();
        for i in 0..25 {
            store.append("u1", Role::User, &format!("m{i}")).await;
        }

        let history = store.history("u1").await;
        assert_eq!(history.len(), HISTORY_WINDOW);
        assert_eq!(history[0].content, "m5");
        assert_eq!(history[HISTORY_WINDOW - 1].content, "m24");

        let persisted = kv.get(LOGS_NAMESPACE, "u1").await.unwrap().unwrap();
        assert_eq!(persisted.as_array().unwrap().len(), HISTORY_WINDOW);
        assert_eq!(persisted[0], json!("User: m5"));
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let (_, store) = store();
        store.append("a", Role::User, "one").await;
        store.append("b", Role::User, "two").await;
        assert_eq!(store.history("a").await.len(), 1);
        assert_eq!(store.history("b").await[0].content, "two");
    }

    #[tokio::test]
    async fn history_reloads_from_store() {
        let kv = Arc::new(MemoryKvStore::new().with_namespace(
            LOGS_NAMESPACE,
            [("u1", json!(["User: trước", "Bot: đáp", "garbage"]))],
        ));
        let store = ConversationStore::new(kv);
        let history = store.history("u1").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], ConversationEntry::new(Role::Assistant, "đáp"));
    }

    #[tokio::test]
    async fn malformed_stored_history_starts_empty() {
        let kv = Arc::new(
            MemoryKvStore::new().with_namespace(LOGS_NAMESPACE, [("u1", json!({"not": "a list"}))]),
        );
        let store = ConversationStore::new(kv);
        assert!(store.history("u1").await.is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_keeps_memory_authoritative() {
        let (kv, store) = store();
        kv.set_fail_writes(true);
        store.append("u1", Role::User, "a").await;
        store.append("u1", Role::Assistant, "b").await;

        assert_eq!(store.history("u1").await.len(), 2);
        assert!(kv.get(LOGS_NAMESPACE, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn append_user_turn_returns_preceding_context() {
        let (_, store) = store();
        assert_eq!(store.append_user_turn("u1", "chào").await, "");

        store.append("u1", Role::Assistant, "xin chào").await;
        assert_eq!(
            store.append_user_turn("u1", "khỏe không").await,
            "User: chào\nBot: xin chào"
        );
        assert_eq!(store.history("u1").await.len(), 3);
    }

    #[tokio::test]
    async fn reading_unknown_user_does_not_allocate_a_slot() {
        let (_, store) = store();
        assert!(store.history("nobody").await.is_empty());
        assert!(store.slots.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn overlapping_user_turns_never_include_themselves() {
        let (_, store) = store();
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let text = format!("q{i}");
                let context = store.append_user_turn("u1", &text).await;
                (text, context)
            }));
        }
        for handle in handles {
            let (text, context) = handle.await.unwrap();
            assert!(!context.lines().any(|line| line == format!("User: {text}")));
        }
    }

    #[tokio::test]
    async fn concurrent_appends_for_one_user_are_serialized() {
        let (_, store) = store();
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append("u1", Role::User, &format!("m{i}")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.history("u1").await.len(), 10);
    }
}
