//! Wires a tasks list view end to end: metadata, store, router and
//! translator, then drives a few edits and prints what the consumer
//! would observe.
//!
//! Run with `cargo run -p engine --example task_list`.

use std::sync::Arc;

use anyhow::Result;
use engine::{FilterEvent, FilterGroup, FilterStore, MemoryRouter, StaticTranslator, SyncConfig};
use filters::{FilterMetadata, MultiselectOption, SelectOption};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let filters = vec![
        FilterMetadata::text("q", "Filters.search"),
        FilterMetadata::select(
            "status",
            "Filters.status",
            vec![
                SelectOption::new("open", "Status.open"),
                SelectOption::new("done", "Status.done"),
            ],
        ),
        FilterMetadata::date("dueDate", "Filters.dueDate"),
        FilterMetadata::multi_select(
            "categoryIds",
            "Filters.categories",
            vec![
                MultiselectOption::new(5, "Backend"),
                MultiselectOption::new(7, "Frontend"),
            ],
        ),
    ];

    let store = FilterStore::new();
    let router = Arc::new(MemoryRouter::new("http://app.local/tasks?page=1")?);
    let translator = Arc::new(StaticTranslator::new("en"));
    translator.add_catalog("en", [("Status.open", "Open"), ("Status.done", "Done")]);

    let handle = FilterGroup::spawn(
        filters,
        "tasks",
        store.clone(),
        router.clone(),
        translator.clone(),
        SyncConfig::default(),
    );
    let mut events = handle.subscribe();
    let state = handle.state();

    // A burst of edits; the quiet window coalesces them into one cycle.
    handle.set_value("q", "urgent");
    handle.set_value("status", "open");
    handle.set_value("categoryIds", vec![5i64]);

    if let Ok(FilterEvent::Changed { values }) = events.recv().await {
        println!("reconciled values: {values:?}");
    }
    println!("url:    {}", router.current_url());
    println!("store:  {:?}", store.filters_by_type("tasks"));
    println!("chips:  {:?}", state.borrow().filled);

    handle.clear_all();
    if let Ok(FilterEvent::Changed { values }) = events.recv().await {
        println!("after clear: {values:?}");
    }
    println!("url:    {}", router.current_url());

    handle.shutdown().await;
    Ok(())
}
