//! Translation boundary: the engine resolves option labels through
//! `instant` and refreshes its display on language changes; message
//! catalogs live outside the engine.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;

pub trait Translator: Send + Sync {
    /// Synchronous lookup; unknown keys resolve to themselves.
    fn instant(&self, key: &str) -> String;

    /// Stream of language switches, carrying the new language code.
    fn language_changes(&self) -> broadcast::Receiver<String>;
}

/// Catalog-backed translator for tests and embedding hosts without a real
/// i18n layer.
pub struct StaticTranslator {
    catalogs: RwLock<HashMap<String, HashMap<String, String>>>,
    active: RwLock<String>,
    changes: broadcast::Sender<String>,
}

impl StaticTranslator {
    pub fn new(language: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            catalogs: RwLock::new(HashMap::new()),
            active: RwLock::new(language.into()),
            changes,
        }
    }

    pub fn add_catalog<K, V>(
        &self,
        language: impl Into<String>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.catalogs
            .write()
            .expect("catalog lock poisoned")
            .insert(language.into(), catalog);
    }

    /// Switch the active language and notify subscribers.
    pub fn set_language(&self, language: impl Into<String>) {
        let language = language.into();
        *self.active.write().expect("language lock poisoned") = language.clone();
        let _ = self.changes.send(language);
    }

    pub fn language(&self) -> String {
        self.active.read().expect("language lock poisoned").clone()
    }
}

impl Translator for StaticTranslator {
    fn instant(&self, key: &str) -> String {
        let active = self.active.read().expect("language lock poisoned");
        self.catalogs
            .read()
            .expect("catalog lock poisoned")
            .get(active.as_str())
            .and_then(|catalog| catalog.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn language_changes(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}
