//! Filter group orchestrator.
//!
//! Owns the form model for one list view and reconciles it against the
//! URL and the global filter store after every debounced edit. One cycle:
//! idle, an edit arrives, a 350 ms quiet window elapses, then reconcile
//! (store dispatch, navigation, emit) and back to idle. Within a cycle
//! the store dispatch always precedes the navigation and the navigation
//! always precedes the emit; a monotonic epoch discards navigation
//! completions from superseded cycles so out-of-order resolutions can
//! never emit stale values.

use std::sync::Arc;

use filters::{FieldValue, FilterForm, FilterMetadata, FormState, form};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::config::SyncConfig;
use crate::display::{self, FilledFilter};
use crate::events::FilterEvent;
use crate::query;
use crate::router::{NavigateOptions, Router};
use crate::store::FilterStore;
use crate::translate::Translator;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Observable snapshot of one filter group.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct GroupState {
    /// Current form model over the known controls.
    pub values: FormState,
    /// Human-readable projection of the non-default values.
    pub filled: Vec<FilledFilter>,
    /// Control names currently rendered.
    pub visible: Vec<String>,
    /// Control names behind the show-all toggle.
    pub hidden: Vec<String>,
    pub show_all: bool,
}

enum Command {
    Edit { control: String, value: FieldValue },
    Search { control: String, term: String },
    ClearAll,
    ReplaceFilters(Vec<FilterMetadata>),
    ShowAll(bool),
}

/// Completion notice of an in-flight navigation.
struct NavigationDone {
    epoch: u64,
    values: FormState,
}

/// Consumer handle to a spawned [`FilterGroup`]. Dropping the handle
/// closes the command channel and shuts the group down, releasing its
/// debounce pipeline and language subscription.
pub struct FilterGroupHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<FilterEvent>,
    state: watch::Receiver<GroupState>,
    join: JoinHandle<()>,
}

impl FilterGroupHandle {
    /// Record a user edit; reconciliation runs after the quiet window.
    pub fn set_value(&self, control: impl Into<String>, value: impl Into<FieldValue>) {
        let _ = self.commands.send(Command::Edit {
            control: control.into(),
            value: value.into(),
        });
    }

    /// Forward a multi-select search term to the consumer.
    pub fn search(&self, control: impl Into<String>, term: impl Into<String>) {
        let _ = self.commands.send(Command::Search {
            control: control.into(),
            term: term.into(),
        });
    }

    /// Reset the form, the store entry, and the URL filter params.
    pub fn clear_all(&self) {
        let _ = self.commands.send(Command::ClearAll);
    }

    /// Swap the filter set; the form is rebuilt and re-populated from the
    /// URL.
    pub fn replace_filters(&self, filters: Vec<FilterMetadata>) {
        let _ = self.commands.send(Command::ReplaceFilters(filters));
    }

    /// Toggle visibility of the controls beyond the always-visible set.
    pub fn set_show_all(&self, show_all: bool) {
        let _ = self.commands.send(Command::ShowAll(show_all));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FilterEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> watch::Receiver<GroupState> {
        self.state.clone()
    }

    /// Close the command channel and wait for the group to drain.
    pub async fn shutdown(self) {
        drop(self.commands);
        let _ = self.join.await;
    }
}

/// The orchestrator actor; use [`FilterGroup::spawn`] and talk to it
/// through the returned handle.
pub struct FilterGroup {
    filters: Vec<FilterMetadata>,
    list_type: String,
    store: FilterStore,
    router: Arc<dyn Router>,
    translator: Arc<dyn Translator>,
    config: SyncConfig,
    form: FilterForm,
    epoch: u64,
    show_all: bool,
    events: broadcast::Sender<FilterEvent>,
    state: watch::Sender<GroupState>,
    navigation_done: mpsc::UnboundedSender<NavigationDone>,
}

impl FilterGroup {
    pub fn spawn(
        filters: Vec<FilterMetadata>,
        list_type: impl Into<String>,
        store: FilterStore,
        router: Arc<dyn Router>,
        translator: Arc<dyn Translator>,
        config: SyncConfig,
    ) -> FilterGroupHandle {
        let list_type = list_type.into();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (navigation_tx, navigation_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut form = FilterForm::new(&filters);
        let populated = query::populate_form(&filters, &router.query_params());
        form.load(&filters, &populated);

        let filled = display::filled_filters(&filters, form.values(), translator.as_ref());
        let (visible, hidden) = split_visible(&filters, false, config.visible_filters);
        let (state_tx, state_rx) = watch::channel(GroupState {
            values: form.values().clone(),
            filled,
            visible,
            hidden,
            show_all: false,
        });

        let group = Self {
            filters,
            list_type,
            store,
            router,
            translator,
            config,
            form,
            epoch: 0,
            show_all: false,
            events: events.clone(),
            state: state_tx,
            navigation_done: navigation_tx,
        };
        let join = tokio::spawn(group.run(commands_rx, navigation_rx));

        FilterGroupHandle {
            commands: commands_tx,
            events,
            state: state_rx,
            join,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut navigations: mpsc::UnboundedReceiver<NavigationDone>,
    ) {
        info!(list_type = %self.list_type, filters = self.filters.len(), "filter group started");

        let mut language_changes = self.translator.language_changes();
        let mut language_open = true;
        let debounce = self.config.debounce();
        let quiet = tokio::time::sleep(debounce);
        tokio::pin!(quiet);
        let mut pending = false;

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    match command {
                        Command::Edit { control, value } => {
                            if self.form.set(&control, value) {
                                self.publish(false);
                                pending = true;
                                quiet.as_mut().reset(Instant::now() + debounce);
                            } else {
                                warn!(
                                    list_type = %self.list_type,
                                    control = %control,
                                    "edit for unknown filter control ignored"
                                );
                            }
                        }
                        Command::Search { control, term } => {
                            let _ = self.events.send(FilterEvent::Search { control, term });
                        }
                        Command::ClearAll => {
                            pending = false;
                            self.clear_all();
                        }
                        Command::ReplaceFilters(filters) => {
                            pending = false;
                            self.rebuild(filters);
                        }
                        Command::ShowAll(show_all) => {
                            self.show_all = show_all;
                            self.publish(false);
                        }
                    }
                }
                _ = &mut quiet, if pending => {
                    pending = false;
                    self.reconcile();
                }
                done = navigations.recv() => {
                    if let Some(done) = done {
                        self.finish_cycle(done);
                    }
                }
                changed = language_changes.recv(), if language_open => {
                    match changed {
                        Ok(language) => {
                            debug!(
                                list_type = %self.list_type,
                                language = %language,
                                "language changed, refreshing filter display"
                            );
                            self.publish(true);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "language stream lagged, refreshing once");
                            self.publish(true);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            language_open = false;
                        }
                    }
                }
            }
        }

        debug!(list_type = %self.list_type, "filter group stopped");
    }

    /// One reconciliation cycle over the current form value.
    fn reconcile(&mut self) {
        self.epoch += 1;
        let epoch = self.epoch;

        let current = self.form.values().clone();
        let in_default = form::in_default_state(&self.filters, &current);
        let form_values = form::reduce_to_known(&self.filters, &current);
        let snapshot = self.router.query_params();
        let mut target = query::foreign_params(&self.filters, &snapshot);

        if in_default {
            let keys: Vec<String> = form_values.keys().cloned().collect();
            self.store.clear_partial(&self.list_type, &keys);
            let defaults = form::default_form_values(&self.filters);
            target.extend(query::form_to_query(&self.filters, &defaults));
        } else {
            self.store.save_partial(&self.list_type, &form_values);
            target.extend(query::form_to_query(&self.filters, &form_values));
        }

        debug!(
            list_type = %self.list_type,
            epoch,
            in_default,
            "reconciling filter state"
        );
        self.dispatch_navigation(epoch, target, form_values);
    }

    /// Reset the form, the store entry, and the filter-owned URL params;
    /// foreign params survive.
    fn clear_all(&mut self) {
        self.epoch += 1;
        self.form.reset(&self.filters);
        self.store.clear_filter(&self.list_type);
        self.publish(true);

        let target = query::foreign_params(&self.filters, &self.router.query_params());
        debug!(list_type = %self.list_type, epoch = self.epoch, "clearing all filters");
        self.dispatch_navigation(self.epoch, target, FormState::new());
    }

    /// Swap the filter set: rebuild the form, re-populate it from the URL
    /// and re-derive the display. Any in-flight cycle is abandoned.
    fn rebuild(&mut self, filters: Vec<FilterMetadata>) {
        self.epoch += 1;
        self.filters = filters;
        self.form = FilterForm::new(&self.filters);
        let populated = query::populate_form(&self.filters, &self.router.query_params());
        self.form.load(&self.filters, &populated);
        debug!(
            list_type = %self.list_type,
            filters = self.filters.len(),
            "filter set replaced"
        );
        self.publish(true);
    }

    /// Run the navigation off the actor loop; the completion flows back
    /// through the navigation channel tagged with its cycle's epoch.
    fn dispatch_navigation(&self, epoch: u64, query_params: query::QueryParams, values: FormState) {
        let router = Arc::clone(&self.router);
        let path = self.router.current_path();
        let done = self.navigation_done.clone();
        let list_type = self.list_type.clone();

        tokio::spawn(async move {
            let options = NavigateOptions {
                query_params,
                replace_url: true,
            };
            match router.navigate(&path, options).await {
                Ok(_) => {
                    let _ = done.send(NavigationDone { epoch, values });
                }
                Err(error) => {
                    warn!(
                        list_type = %list_type,
                        epoch,
                        error = %error,
                        "filter navigation rejected, dropping cycle"
                    );
                }
            }
        });
    }

    /// Emit and refresh the display once the cycle's navigation resolved,
    /// unless a newer cycle superseded it.
    fn finish_cycle(&mut self, done: NavigationDone) {
        if done.epoch != self.epoch {
            debug!(
                list_type = %self.list_type,
                stale = done.epoch,
                current = self.epoch,
                "dropping stale navigation completion"
            );
            return;
        }
        let _ = self.events.send(FilterEvent::Changed { values: done.values });
        self.publish(true);
    }

    /// Push a fresh state snapshot; the filled projection is only
    /// recomputed after a completed cycle, a clear, a filter-set swap or a
    /// language change.
    fn publish(&self, refresh_filled: bool) {
        let filled = refresh_filled.then(|| {
            display::filled_filters(&self.filters, self.form.values(), self.translator.as_ref())
        });
        let (visible, hidden) =
            split_visible(&self.filters, self.show_all, self.config.visible_filters);
        self.state.send_modify(|state| {
            state.values = self.form.values().clone();
            state.visible = visible;
            state.hidden = hidden;
            state.show_all = self.show_all;
            if let Some(filled) = filled {
                state.filled = filled;
            }
        });
    }
}

/// Split control names into the always-visible head and the toggled tail.
fn split_visible(
    filters: &[FilterMetadata],
    show_all: bool,
    visible_count: usize,
) -> (Vec<String>, Vec<String>) {
    let names = filters.iter().map(|meta| meta.control_name.clone());
    if show_all {
        (names.collect(), Vec::new())
    } else {
        let mut visible: Vec<String> = names.collect();
        let hidden = visible.split_off(visible_count.min(visible.len()));
        (visible, hidden)
    }
}
