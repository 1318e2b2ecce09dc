use filters::FormState;
use serde::Serialize;
use ts_rs::TS;

/// Events a filter group emits to its consumer.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterEvent {
    /// A reconciliation cycle completed; `values` is the fully reconciled
    /// state over the known controls (empty after clear-all).
    Changed { values: FormState },
    /// A multi-select search box changed; the consumer is expected to
    /// fetch matching options. The engine never fetches data itself.
    Search { control: String, term: String },
}
