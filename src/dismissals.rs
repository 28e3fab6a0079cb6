//! Persisted dismissal state.
//!
//! Once an administrator hides a suggestion, its descriptor id lands in a
//! single persisted record and the matcher skips it forever. The set only
//! grows — no un-dismiss operation exists.
//!
//! Concurrent dismissals of different ids perform read-modify-write on the
//! same record, so a simultaneous pair can lose one update. This is a
//! known limitation; the record is deduplicated on every write.

use std::collections::HashSet;
use std::sync::Arc;

use crate::store::KvStore;

/// Record key holding the JSON array of dismissed descriptor ids.
pub const DISMISSED_HINTS_KEY: &str = "dismissed_hints";

#[derive(Clone)]
pub struct DismissalStore {
    kv: Arc<dyn KvStore>,
}

impl DismissalStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// The full dismissed-id set. Missing or malformed records read as
    /// empty — a corrupt record must not block the search pipeline.
    pub async fn dismissed(&self) -> HashSet<String> {
        match self.kv.get(DISMISSED_HINTS_KEY).await {
            Ok(Some(serde_json::Value::Array(ids))) => ids
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => HashSet::new(),
        }
    }

    pub async fn is_dismissed(&self, id: &str) -> bool {
        self.dismissed().await.contains(id)
    }

    /// Adds `id` to the persisted set.
    ///
    /// Returns whether the state is now persisted: `true` for both a fresh
    /// dismissal and a repeat (idempotent no-op), `false` when the write
    /// fails — in that case nothing changed and the caller must surface
    /// the failure.
    pub async fn dismiss(&self, id: &str) -> bool {
        let mut ordered = self.ordered_ids().await;
        if ordered.iter().any(|existing| existing == id) {
            return true;
        }
        ordered.push(id.to_string());

        let value = serde_json::json!(ordered);
        self.kv.set(DISMISSED_HINTS_KEY, &value, None).await.is_ok()
    }

    /// Insertion-ordered view of the record, deduplicated. Keeping the
    /// stored array ordered makes the persisted layout deterministic.
    async fn ordered_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        match self.kv.get(DISMISSED_HINTS_KEY).await {
            Ok(Some(serde_json::Value::Array(ids))) => ids
                .into_iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) if seen.insert(s.clone()) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
