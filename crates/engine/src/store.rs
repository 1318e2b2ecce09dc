//! Global filter cache keyed by list type.
//!
//! Holds the non-default filter values last saved for each list type so
//! filters persist across navigation away and back. Volatile memory only;
//! shared by cloning; last write wins across concurrent writers. Every
//! operation is an idempotent no-op on missing types or keys.

use std::sync::Arc;

use dashmap::DashMap;
use filters::FormState;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    entries: Arc<DashMap<String, FormState>>,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge `values` into the partial state for `list_type`;
    /// new keys overwrite, untouched keys persist.
    pub fn save_partial(&self, list_type: &str, values: &FormState) {
        let mut entry = self.entries.entry(list_type.to_string()).or_default();
        for (key, value) in values {
            entry.insert(key.clone(), value.clone());
        }
        debug!(list_type = %list_type, keys = values.len(), "saved partial filter state");
    }

    /// Delete the named keys from the partial state for `list_type`,
    /// leaving other keys intact.
    pub fn clear_partial(&self, list_type: &str, keys: &[String]) {
        if let Some(mut entry) = self.entries.get_mut(list_type) {
            for key in keys {
                entry.remove(key);
            }
            debug!(list_type = %list_type, keys = keys.len(), "cleared partial filter state");
        }
    }

    /// Reset the partial state for `list_type` to an empty mapping.
    pub fn clear_filter(&self, list_type: &str) {
        self.entries.remove(list_type);
        debug!(list_type = %list_type, "cleared filter state");
    }

    /// Read accessor; returns an empty mapping when `list_type` was never
    /// saved.
    pub fn filters_by_type(&self, list_type: &str) -> FormState {
        self.entries
            .get(list_type)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use filters::FieldValue;

    use super::*;

    #[test]
    fn test_save_partial_merges() {
        let store = FilterStore::new();
        store.save_partial(
            "tasks",
            &FormState::from([("q".to_string(), FieldValue::text("urgent"))]),
        );
        store.save_partial(
            "tasks",
            &FormState::from([("status".to_string(), FieldValue::text("open"))]),
        );

        let state = store.filters_by_type("tasks");
        assert_eq!(state["q"], FieldValue::text("urgent"));
        assert_eq!(state["status"], FieldValue::text("open"));
    }

    #[test]
    fn test_save_partial_overwrites_existing_keys() {
        let store = FilterStore::new();
        store.save_partial(
            "tasks",
            &FormState::from([("q".to_string(), FieldValue::text("old"))]),
        );
        store.save_partial(
            "tasks",
            &FormState::from([("q".to_string(), FieldValue::text("new"))]),
        );
        assert_eq!(store.filters_by_type("tasks")["q"], FieldValue::text("new"));
    }

    #[test]
    fn test_clear_partial_leaves_other_keys() {
        let store = FilterStore::new();
        store.save_partial(
            "tasks",
            &FormState::from([
                ("q".to_string(), FieldValue::text("urgent")),
                ("status".to_string(), FieldValue::text("open")),
            ]),
        );
        store.clear_partial("tasks", &["q".to_string()]);

        let state = store.filters_by_type("tasks");
        assert!(!state.contains_key("q"));
        assert_eq!(state["status"], FieldValue::text("open"));
    }

    #[test]
    fn test_operations_are_noops_on_missing_types() {
        let store = FilterStore::new();
        store.clear_partial("projects", &["q".to_string()]);
        store.clear_filter("projects");
        assert!(store.filters_by_type("projects").is_empty());
    }

    #[test]
    fn test_clear_filter_resets_type() {
        let store = FilterStore::new();
        store.save_partial(
            "tasks",
            &FormState::from([("q".to_string(), FieldValue::text("urgent"))]),
        );
        store.clear_filter("tasks");
        assert!(store.filters_by_type("tasks").is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = FilterStore::new();
        let other = store.clone();
        store.save_partial(
            "tasks",
            &FormState::from([("q".to_string(), FieldValue::text("urgent"))]),
        );
        assert_eq!(other.filters_by_type("tasks")["q"], FieldValue::text("urgent"));
    }
}
