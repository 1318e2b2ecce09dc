use serde::{Deserialize, Serialize};
use strum_macros::Display;
use ts_rs::TS;

use crate::value::FieldValue;

/// One selectable entry of a select or check-select control.
///
/// `label` is a translation key resolved by the consumer's translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One candidate entry of an editable multi-select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MultiselectOption {
    pub id: i64,
    pub name: String,
}

impl MultiselectOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Control kind of a filter field, carrying only the data that kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Display)]
#[serde(tag = "type", rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum FilterKind {
    Text,
    Number,
    Date,
    Select {
        options: Vec<SelectOption>,
    },
    CheckSelect {
        options: Vec<SelectOption>,
    },
    EditableMultiSelect {
        options: Vec<MultiselectOption>,
        max_selected_items: Option<usize>,
        min_term_length: Option<usize>,
        allow_add_tag: bool,
    },
}

impl FilterKind {
    /// The value that represents "unset" for this kind.
    pub fn empty_value(&self) -> FieldValue {
        match self {
            Self::Text | Self::Number | Self::Date | Self::Select { .. } | Self::CheckSelect { .. } => {
                FieldValue::Text(String::new())
            }
            Self::EditableMultiSelect { .. } => FieldValue::Ids(Vec::new()),
        }
    }
}

/// Static description of one filter field.
///
/// `control_name` doubles as the URL query-parameter name and must be unique
/// within one filter set; a duplicate silently wins over earlier entries in
/// the generated form (a caller defect, not supported behavior).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct FilterMetadata {
    pub control_name: String,
    pub label_key: String,
    pub default_value: Option<FieldValue>,
    pub kind: FilterKind,
}

impl FilterMetadata {
    fn new(control_name: impl Into<String>, label_key: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            control_name: control_name.into(),
            label_key: label_key.into(),
            default_value: None,
            kind,
        }
    }

    pub fn text(control_name: impl Into<String>, label_key: impl Into<String>) -> Self {
        Self::new(control_name, label_key, FilterKind::Text)
    }

    pub fn number(control_name: impl Into<String>, label_key: impl Into<String>) -> Self {
        Self::new(control_name, label_key, FilterKind::Number)
    }

    pub fn date(control_name: impl Into<String>, label_key: impl Into<String>) -> Self {
        Self::new(control_name, label_key, FilterKind::Date)
    }

    pub fn select(
        control_name: impl Into<String>,
        label_key: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(control_name, label_key, FilterKind::Select { options })
    }

    pub fn check_select(
        control_name: impl Into<String>,
        label_key: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::new(control_name, label_key, FilterKind::CheckSelect { options })
    }

    pub fn multi_select(
        control_name: impl Into<String>,
        label_key: impl Into<String>,
        options: Vec<MultiselectOption>,
    ) -> Self {
        Self::new(
            control_name,
            label_key,
            FilterKind::EditableMultiSelect {
                options,
                max_selected_items: None,
                min_term_length: None,
                allow_add_tag: false,
            },
        )
    }

    pub fn with_default(mut self, default_value: FieldValue) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// The baseline value this control starts from and resets to.
    pub fn default_value(&self) -> FieldValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }
}
