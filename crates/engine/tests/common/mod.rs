use std::sync::Arc;

use engine::{FilterGroup, FilterGroupHandle, FilterStore, MemoryRouter, StaticTranslator, SyncConfig};
use filters::FilterMetadata;

pub struct Harness {
    pub store: FilterStore,
    pub router: Arc<MemoryRouter>,
    pub translator: Arc<StaticTranslator>,
    pub handle: FilterGroupHandle,
}

/// Spawn a filter group against an in-memory router and a small en/de
/// catalog.
pub fn spawn(url: &str, filters: Vec<FilterMetadata>, list_type: &str) -> Harness {
    let store = FilterStore::new();
    let router = Arc::new(MemoryRouter::new(url).expect("harness url"));
    let translator = Arc::new(StaticTranslator::new("en"));
    translator.add_catalog("en", [("Status.open", "Open"), ("Status.done", "Done")]);
    translator.add_catalog("de", [("Status.open", "Offen"), ("Status.done", "Erledigt")]);

    let handle = FilterGroup::spawn(
        filters,
        list_type,
        store.clone(),
        router.clone(),
        translator.clone(),
        SyncConfig::default(),
    );

    Harness {
        store,
        router,
        translator,
        handle,
    }
}
