//! Reactive filter synchronization engine for list views.
//!
//! Keeps three stores consistent while the user refines a result set
//! through typed filter controls: the in-memory form model, the address
//! bar's query string (behind a [`router::Router`]), and a global
//! partial-filter cache keyed by list type (so filters survive navigating
//! away and back).

pub mod config;
pub mod display;
pub mod events;
pub mod group;
pub mod query;
pub mod router;
pub mod store;
pub mod translate;

pub use config::SyncConfig;
pub use display::FilledFilter;
pub use events::FilterEvent;
pub use group::{FilterGroup, FilterGroupHandle, GroupState};
pub use query::{QueryParams, QueryValue};
pub use router::{MemoryRouter, NavigateOptions, Router, RouterError};
pub use store::FilterStore;
pub use translate::{StaticTranslator, Translator};
