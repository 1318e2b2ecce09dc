//! Debounce coalescing, the stale-navigation guard and the navigation
//! failure path, driven on a paused clock.

mod common;

use std::time::Duration;

use engine::FilterEvent;
use filters::{FieldValue, FilterMetadata, FormState};

fn search_filter() -> Vec<FilterMetadata> {
    vec![FilterMetadata::text("q", "Filters.search")]
}

fn changed(control: &str, value: &str) -> FilterEvent {
    FilterEvent::Changed {
        values: FormState::from([(control.to_string(), FieldValue::text(value))]),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_coalesce_into_one_cycle() {
    let harness = common::spawn("http://app.local/tasks", search_filter(), "tasks");
    let mut events = harness.handle.subscribe();

    // Three keystrokes, each within the 350 ms quiet window of the last.
    harness.handle.set_value("q", "u");
    tokio::time::sleep(Duration::from_millis(200)).await;
    harness.handle.set_value("q", "ur");
    tokio::time::sleep(Duration::from_millis(200)).await;
    harness.handle.set_value("q", "urgent");

    let event = events.recv().await.unwrap();
    assert_eq!(event, changed("q", "urgent"));
    assert_eq!(harness.router.navigations(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(events.try_recv().is_err());
    assert_eq!(harness.router.navigations(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_spaced_edits_each_reconcile() {
    let harness = common::spawn("http://app.local/tasks", search_filter(), "tasks");
    let mut events = harness.handle.subscribe();

    harness.handle.set_value("q", "one");
    tokio::time::sleep(Duration::from_millis(500)).await;
    harness.handle.set_value("q", "two");

    assert_eq!(events.recv().await.unwrap(), changed("q", "one"));
    assert_eq!(events.recv().await.unwrap(), changed("q", "two"));
    assert_eq!(harness.router.navigations(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_navigation_completion_never_emits() {
    let harness = common::spawn("http://app.local/tasks", search_filter(), "tasks");
    let mut events = harness.handle.subscribe();

    // First cycle's navigation is slow; a second cycle overtakes it.
    harness.router.set_latency(Duration::from_millis(1000));
    harness.handle.set_value("q", "old");
    tokio::time::sleep(Duration::from_millis(400)).await;

    harness.router.set_latency(Duration::ZERO);
    harness.handle.set_value("q", "new");

    let event = events.recv().await.unwrap();
    assert_eq!(event, changed("q", "new"));

    // Let the slow navigation resolve; its completion must be discarded.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(events.try_recv().is_err());
    assert_eq!(harness.router.navigations(), 2);
    assert_eq!(harness.router.current_url().query(), Some("q=old"));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_navigation_drops_emit_but_leaves_group_usable() {
    let harness = common::spawn("http://app.local/tasks", search_filter(), "tasks");
    let mut events = harness.handle.subscribe();

    harness.router.fail_next_navigation();
    harness.handle.set_value("q", "urgent");

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(events.try_recv().is_err());
    // The store dispatch precedes the navigation, so it already happened.
    assert_eq!(
        harness.store.filters_by_type("tasks")["q"],
        FieldValue::text("urgent")
    );

    harness.handle.set_value("q", "later");
    assert_eq!(events.recv().await.unwrap(), changed("q", "later"));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_the_group() {
    let harness = common::spawn("http://app.local/tasks", search_filter(), "tasks");
    let handle = harness.handle;
    handle.shutdown().await;
}
