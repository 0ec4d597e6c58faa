//! Abbreviation expansion for user input.
//!
//! All shorthands compile into one case-insensitive, whole-word alternation,
//! longest first. Matching is a single left-to-right pass, so an expansion is
//! never expanded again and `"kog"` wins over `"ko"`.

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::storage::kv_store::{ABBREVIATIONS_NAMESPACE, KvStore};

/// Read-only shorthand → expansion table.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTable {
    expansions: HashMap<String, String>,
    pattern: Option<Regex>,
}

impl AbbreviationTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table. Keys are matched case-insensitively; blank keys are dropped.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let expansions: HashMap<String, String> = entries
            .into_iter()
            .filter_map(|(k, v)| {
                let key = k.as_ref().trim().to_lowercase();
                (!key.is_empty()).then(|| (key, v.into()))
            })
            .collect();

        if expansions.is_empty() {
            return Self::default();
        }

        let mut keys: Vec<&String> = expansions.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = match Regex::new(&format!(r"(?i)\b(?:{alternation})\b")) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(error = %e, "abbreviation table could not be compiled, expansion disabled");
                None
            }
        };

        Self {
            expansions,
            pattern,
        }
    }

    /// Load the table from the `viettat` namespace.
    ///
    /// Non-string values are ignored; a read failure yields an empty table.
    pub async fn load<K: KvStore>(store: &K) -> Self {
        match store.load_all(ABBREVIATIONS_NAMESPACE).await {
            Ok(entries) => {
                let table = Self::from_entries(entries.into_iter().filter_map(|(k, v)| match v {
                    serde_json::Value::String(s) => Some((k, s)),
                    _ => None,
                }));
                tracing::info!(count = table.len(), "loaded abbreviation table");
                table
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load abbreviations, expansion disabled");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }

    /// Expand every whole-word shorthand in `input`.
    pub fn expand(&self, input: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return input.to_string();
        };
        pattern
            .replace_all(input, |caps: &Captures<'_>| {
                let matched = &caps[0];
                self.expansions
                    .get(&matched.to_lowercase())
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryKvStore;
    use serde_json::json;

    #[test]
    fn expands_whole_words_only() {
        let table = AbbreviationTable::from_entries([("ko", "không")]);
        assert_eq!(table.expand("ko biet"), "không biet");
        assert_eq!(table.expand("kola ko"), "kola không");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let table = AbbreviationTable::from_entries([("KO", "không")]);
        assert_eq!(table.expand("Ko biết, KO"), "không biết, không");
    }

    #[test]
    fn longer_shorthand_wins_and_expansions_are_not_reexpanded() {
        let table = AbbreviationTable::from_entries([
            ("ko", "không"),
            ("ko bt", "không biết"),
            ("bt", "bt ko"),
        ]);
        assert_eq!(table.expand("ko bt"), "không biết");
        assert_eq!(table.expand("bt"), "bt ko");
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let table = AbbreviationTable::from_entries([("c.", "của")]);
        assert_eq!(table.expand("cx"), "cx");
    }

    #[test]
    fn empty_table_is_identity() {
        let table = AbbreviationTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.expand("ko biet"), "ko biet");
    }

    #[tokio::test]
    async fn load_ignores_non_string_values() {
        let store = MemoryKvStore::new().with_namespace(
            ABBREVIATIONS_NAMESPACE,
            [("ko", json!("không")), ("n", json!(3)), ("dc", json!("được"))],
        );
        let table = AbbreviationTable::load(&store).await;
        assert_eq!(table.len(), 2);
        assert_eq!(table.expand("ko dc"), "không được");
    }
}
