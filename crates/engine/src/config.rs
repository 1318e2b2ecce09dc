use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet window between the last user edit and reconciliation
const DEFAULT_DEBOUNCE_MS: u64 = 350;

/// Number of filter controls always shown before the show-all toggle
const DEFAULT_VISIBLE_FILTERS: usize = 4;

/// Tuning for one filter group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_visible_filters")]
    pub visible_filters: usize,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_visible_filters() -> usize {
    DEFAULT_VISIBLE_FILTERS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            visible_filters: DEFAULT_VISIBLE_FILTERS,
        }
    }
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
