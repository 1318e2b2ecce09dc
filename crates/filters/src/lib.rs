//! Declarative filter model and pure form operations for list views.

pub mod form;
pub mod metadata;
pub mod value;

pub use form::{FilterForm, default_form_values, in_default_state, reduce_to_known};
pub use metadata::{FilterKind, FilterMetadata, MultiselectOption, SelectOption};
pub use value::{FieldValue, FormState};
