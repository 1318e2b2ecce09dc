//! URL query codec for filter state.
//!
//! The canonical wire encoding for multi-select id lists is the repeated
//! parameter form (`categoryIds=5&categoryIds=7`); the legacy comma-joined
//! form (`categoryIds=5,7`) is accepted on input only and normalized here,
//! at the parsing boundary. Malformed values never error: they fall back
//! to the control's default.

use std::collections::{BTreeMap, btree_map::Entry};

use chrono::NaiveDate;
use filters::{FieldValue, FilterKind, FilterMetadata, FormState};
use serde::{Deserialize, Serialize};
use url::Url;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One query parameter's value: a single string or a repeated parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

impl QueryValue {
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    pub fn many(values: impl Into<Vec<String>>) -> Self {
        Self::Many(values.into())
    }

    /// The first raw entry, or the empty string.
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Many(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// All entries, splitting a single comma-joined string into parts.
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Single(value) => value
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Many(values) => values.clone(),
        }
    }
}

/// Query parameters in stable key order.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// Decode a URL's query pairs; repeated keys collapse into [`QueryValue::Many`].
pub fn parse_query(url: &Url) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in url.query_pairs() {
        let value = value.into_owned();
        match params.entry(key.into_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(QueryValue::Single(value));
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                match current {
                    QueryValue::Single(existing) => {
                        let first = std::mem::take(existing);
                        *current = QueryValue::Many(vec![first, value]);
                    }
                    QueryValue::Many(values) => values.push(value),
                }
            }
        }
    }
    params
}

/// Percent-encode parameters back into a query string.
pub fn encode_query(params: &QueryParams) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            QueryValue::Single(value) => {
                serializer.append_pair(key, value);
            }
            QueryValue::Many(values) => {
                for value in values {
                    serializer.append_pair(key, value);
                }
            }
        }
    }
    serializer.finish()
}

/// Build the form state for `filters` from URL query parameters.
///
/// Known keys are coerced to the control's value domain, unknown keys are
/// ignored, missing keys take the control's default.
pub fn populate_form(filters: &[FilterMetadata], params: &QueryParams) -> FormState {
    filters
        .iter()
        .map(|meta| {
            let value = params
                .get(&meta.control_name)
                .map(|param| coerce(meta, param))
                .unwrap_or_else(|| meta.default_value());
            (meta.control_name.clone(), value)
        })
        .collect()
}

fn coerce(meta: &FilterMetadata, param: &QueryValue) -> FieldValue {
    match &meta.kind {
        FilterKind::Text | FilterKind::Select { .. } | FilterKind::CheckSelect { .. } => {
            FieldValue::Text(param.first().to_string())
        }
        FilterKind::Number => {
            let raw = param.first().trim();
            match raw.parse::<f64>() {
                Ok(number) if number.is_finite() => FieldValue::Text(raw.to_string()),
                _ => meta.default_value(),
            }
        }
        FilterKind::Date => {
            let raw = param.first().trim();
            match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(_) => FieldValue::Text(raw.to_string()),
                Err(_) => meta.default_value(),
            }
        }
        FilterKind::EditableMultiSelect { .. } => {
            let ids: Vec<i64> = param
                .entries()
                .iter()
                .filter_map(|entry| entry.parse().ok())
                .collect();
            FieldValue::Ids(ids)
        }
    }
}

/// Serialize form values into query parameters, one entry per control.
pub fn form_to_query(filters: &[FilterMetadata], values: &FormState) -> QueryParams {
    filters
        .iter()
        .map(|meta| {
            let value = values
                .get(&meta.control_name)
                .cloned()
                .unwrap_or_else(|| meta.kind.empty_value());
            let param = match value {
                FieldValue::Text(text) => QueryValue::Single(text),
                FieldValue::Ids(ids) => {
                    QueryValue::Many(ids.iter().map(i64::to_string).collect())
                }
            };
            (meta.control_name.clone(), param)
        })
        .collect()
}

/// Query parameters that do not belong to any known control (pagination
/// and the like); these survive every navigation untouched.
pub fn foreign_params(filters: &[FilterMetadata], params: &QueryParams) -> QueryParams {
    params
        .iter()
        .filter(|(key, _)| !filters.iter().any(|meta| meta.control_name == **key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
