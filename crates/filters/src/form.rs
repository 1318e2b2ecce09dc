//! Form construction and default-state comparison over filter metadata.
//!
//! All functions here are total over well-formed metadata: no I/O, no
//! error cases.

use crate::metadata::FilterMetadata;
use crate::value::{FieldValue, FormState};

/// In-memory form model over one filter set.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterForm {
    values: FormState,
}

impl FilterForm {
    /// Build a form with every control initialized to its metadata default.
    ///
    /// Duplicate control names are last-write-wins.
    pub fn new(filters: &[FilterMetadata]) -> Self {
        Self {
            values: default_form_values(filters),
        }
    }

    /// Set a control's value. Returns false when the control is unknown,
    /// leaving the form untouched.
    pub fn set(&mut self, control_name: &str, value: FieldValue) -> bool {
        match self.values.get_mut(control_name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, control_name: &str) -> Option<&FieldValue> {
        self.values.get(control_name)
    }

    pub fn values(&self) -> &FormState {
        &self.values
    }

    /// Reset every control to its default.
    pub fn reset(&mut self, filters: &[FilterMetadata]) {
        self.values = default_form_values(filters);
    }

    /// Overwrite the form from an already-normalized state, keeping only
    /// known controls and defaulting the missing ones.
    pub fn load(&mut self, filters: &[FilterMetadata], state: &FormState) {
        self.values = filters
            .iter()
            .map(|meta| {
                let value = state
                    .get(&meta.control_name)
                    .cloned()
                    .unwrap_or_else(|| meta.default_value());
                (meta.control_name.clone(), value)
            })
            .collect();
    }
}

/// The default mapping for a filter set, used as the comparison baseline
/// for "is this filter set in its default state".
pub fn default_form_values(filters: &[FilterMetadata]) -> FormState {
    filters
        .iter()
        .map(|meta| (meta.control_name.clone(), meta.default_value()))
        .collect()
}

/// Restrict an arbitrary state to the known control names, coercing
/// missing scalar controls to the empty string (and missing multi-selects
/// to the empty list).
pub fn reduce_to_known(filters: &[FilterMetadata], values: &FormState) -> FormState {
    filters
        .iter()
        .map(|meta| {
            let value = values
                .get(&meta.control_name)
                .cloned()
                .unwrap_or_else(|| meta.kind.empty_value());
            (meta.control_name.clone(), value)
        })
        .collect()
}

/// True iff every known control holds its default value.
pub fn in_default_state(filters: &[FilterMetadata], values: &FormState) -> bool {
    filters.iter().all(|meta| {
        values
            .get(&meta.control_name)
            .map(|value| *value == meta.default_value())
            .unwrap_or(true)
    })
}
