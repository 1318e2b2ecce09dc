//! Human-readable projection of the non-default filter values.

use filters::{FieldValue, FilterKind, FilterMetadata, FormState, MultiselectOption, SelectOption};
use serde::Serialize;
use ts_rs::TS;

use crate::translate::Translator;

/// One chip in the "filled filters" display: the control name and a
/// translated, human-readable rendering of its value. Derived state,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct FilledFilter {
    pub id: String,
    pub value: String,
}

/// Project every control whose value differs from its default and is
/// non-empty, in metadata order.
pub fn filled_filters(
    filters: &[FilterMetadata],
    values: &FormState,
    translator: &dyn Translator,
) -> Vec<FilledFilter> {
    filters
        .iter()
        .filter_map(|meta| {
            let value = values
                .get(&meta.control_name)
                .cloned()
                .unwrap_or_else(|| meta.default_value());
            if value.is_empty() || value == meta.default_value() {
                return None;
            }
            render(meta, &value, translator).map(|rendered| FilledFilter {
                id: meta.control_name.clone(),
                value: rendered,
            })
        })
        .collect()
}

fn render(meta: &FilterMetadata, value: &FieldValue, translator: &dyn Translator) -> Option<String> {
    match (&meta.kind, value) {
        (FilterKind::Text | FilterKind::Number | FilterKind::Date, FieldValue::Text(raw)) => {
            Some(raw.clone())
        }
        (FilterKind::Select { options }, FieldValue::Text(raw)) => {
            Some(resolve_option(options, raw, translator))
        }
        (FilterKind::CheckSelect { options }, FieldValue::Text(raw)) => {
            let labels: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| resolve_option(options, part, translator))
                .collect();
            Some(labels.join(", "))
        }
        (FilterKind::EditableMultiSelect { options, .. }, FieldValue::Ids(ids)) => {
            let names: Vec<String> = ids.iter().map(|id| resolve_name(options, *id)).collect();
            Some(names.join(", "))
        }
        // Value domain does not match the control kind; nothing to show.
        _ => None,
    }
}

fn resolve_option(options: &[SelectOption], value: &str, translator: &dyn Translator) -> String {
    options
        .iter()
        .find(|option| option.value == value)
        .map(|option| translator.instant(&option.label))
        .unwrap_or_else(|| value.to_string())
}

fn resolve_name(options: &[MultiselectOption], id: i64) -> String {
    options
        .iter()
        .find(|option| option.id == id)
        .map(|option| option.name.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use filters::FieldValue;

    use crate::translate::StaticTranslator;

    use super::*;

    fn translator() -> StaticTranslator {
        let translator = StaticTranslator::new("en");
        translator.add_catalog(
            "en",
            [("Status.open", "Open"), ("Status.done", "Done")],
        );
        translator
    }

    fn task_filters() -> Vec<FilterMetadata> {
        vec![
            FilterMetadata::text("q", "Filters.search"),
            FilterMetadata::select(
                "status",
                "Filters.status",
                vec![
                    SelectOption::new("open", "Status.open"),
                    SelectOption::new("done", "Status.done"),
                ],
            ),
            FilterMetadata::multi_select(
                "categoryIds",
                "Filters.categories",
                vec![MultiselectOption::new(5, "Backend")],
            ),
        ]
    }

    #[test]
    fn test_default_and_empty_values_are_excluded() {
        let filters = task_filters();
        let values = filters::default_form_values(&filters);
        assert!(filled_filters(&filters, &values, &translator()).is_empty());
    }

    #[test]
    fn test_select_value_resolves_to_translated_label() {
        let filters = task_filters();
        let mut values = filters::default_form_values(&filters);
        values.insert("status".into(), FieldValue::text("open"));

        let filled = filled_filters(&filters, &values, &translator());
        assert_eq!(
            filled,
            vec![FilledFilter {
                id: "status".into(),
                value: "Open".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_option_falls_back_to_raw_value() {
        let filters = task_filters();
        let mut values = filters::default_form_values(&filters);
        values.insert("status".into(), FieldValue::text("archived"));

        let filled = filled_filters(&filters, &values, &translator());
        assert_eq!(filled[0].value, "archived");
    }

    #[test]
    fn test_multiselect_ids_resolve_to_names_with_id_fallback() {
        let filters = task_filters();
        let mut values = filters::default_form_values(&filters);
        values.insert("categoryIds".into(), FieldValue::ids(vec![5, 9]));

        let filled = filled_filters(&filters, &values, &translator());
        assert_eq!(filled[0].id, "categoryIds");
        assert_eq!(filled[0].value, "Backend, 9");
    }

    #[test]
    fn test_check_select_renders_each_entry() {
        let filters = vec![FilterMetadata::check_select(
            "statuses",
            "Filters.statuses",
            vec![
                SelectOption::new("open", "Status.open"),
                SelectOption::new("done", "Status.done"),
            ],
        )];
        let mut values = FormState::new();
        values.insert("statuses".into(), FieldValue::text("open,done"));

        let filled = filled_filters(&filters, &values, &translator());
        assert_eq!(filled[0].value, "Open, Done");
    }
}
