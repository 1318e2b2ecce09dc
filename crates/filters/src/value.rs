use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Current value of a single filter control.
///
/// Scalar kinds (text, number, date, select, check-select) carry a string;
/// number values are numbers-as-strings and check-select values are a
/// comma-joined subset of the option values. Multi-select controls carry a
/// list of option ids. Comparing a `Text` against an `Ids` is always
/// not-equal rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Ids(Vec<i64>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn ids(ids: impl Into<Vec<i64>>) -> Self {
        Self::Ids(ids.into())
    }

    /// True for the empty string and the empty id list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Ids(ids) => ids.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Ids(_) => None,
        }
    }

    pub fn as_ids(&self) -> Option<&[i64]> {
        match self {
            Self::Text(_) => None,
            Self::Ids(ids) => Some(ids),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(ids: Vec<i64>) -> Self {
        Self::Ids(ids)
    }
}

/// Mapping from control name to its current value.
pub type FormState = HashMap<String, FieldValue>;
