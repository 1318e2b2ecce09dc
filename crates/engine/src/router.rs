//! Router boundary: the URL is a shared external resource with
//! last-writer-wins semantics; the engine only talks to it through this
//! trait.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;
use url::Url;

use crate::query::{self, QueryParams};

#[derive(Debug, Clone, Error)]
pub enum RouterError {
    #[error("navigation rejected: {0}")]
    Rejected(String),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Options for one navigation.
#[derive(Debug, Clone, Default)]
pub struct NavigateOptions {
    pub query_params: QueryParams,
    /// Replace the current history entry instead of pushing a new one.
    pub replace_url: bool,
}

/// Minimal router surface the engine depends on.
///
/// `query_params` is a one-shot snapshot; a URL change within the same
/// tick is not observed until the next read. `watch_query_params` is the
/// live stream for consumers that want one.
#[async_trait]
pub trait Router: Send + Sync {
    async fn navigate(&self, path: &str, options: NavigateOptions) -> Result<bool, RouterError>;

    fn current_path(&self) -> String;

    fn query_params(&self) -> QueryParams;

    fn watch_query_params(&self) -> watch::Receiver<QueryParams>;
}

/// In-memory router holding URL state in a watch channel.
///
/// Stands in for the host application's router; latency and one-shot
/// failure injection exist to exercise the reconciliation race and
/// failure paths.
pub struct MemoryRouter {
    base: Url,
    path: RwLock<String>,
    params: watch::Sender<QueryParams>,
    latency: RwLock<Duration>,
    fail_next: AtomicBool,
    navigations: AtomicUsize,
    history_len: AtomicUsize,
}

impl MemoryRouter {
    pub fn new(url: &str) -> Result<Self, RouterError> {
        let base = Url::parse(url)?;
        let (params, _) = watch::channel(query::parse_query(&base));
        Ok(Self {
            path: RwLock::new(base.path().to_string()),
            base,
            params,
            latency: RwLock::new(Duration::ZERO),
            fail_next: AtomicBool::new(false),
            navigations: AtomicUsize::new(0),
            history_len: AtomicUsize::new(1),
        })
    }

    /// Delay every navigation by `latency` before it resolves.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.write().expect("router latency lock poisoned") = latency;
    }

    /// Reject the next navigation.
    pub fn fail_next_navigation(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of navigations that resolved successfully.
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    /// Number of history entries; replacing navigations do not grow it.
    pub fn history_len(&self) -> usize {
        self.history_len.load(Ordering::SeqCst)
    }

    /// The full current URL.
    pub fn current_url(&self) -> Url {
        let mut url = self.base.clone();
        url.set_path(&self.current_path());
        let encoded = query::encode_query(&self.params.borrow());
        url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));
        url
    }
}

#[async_trait]
impl Router for MemoryRouter {
    async fn navigate(&self, path: &str, options: NavigateOptions) -> Result<bool, RouterError> {
        let latency = *self.latency.read().expect("router latency lock poisoned");
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RouterError::Rejected(path.to_string()));
        }

        *self.path.write().expect("router path lock poisoned") = path.to_string();
        self.params.send_replace(options.query_params);
        if !options.replace_url {
            self.history_len.fetch_add(1, Ordering::SeqCst);
        }
        self.navigations.fetch_add(1, Ordering::SeqCst);
        debug!(path = %path, replace = options.replace_url, "navigated");
        Ok(true)
    }

    fn current_path(&self) -> String {
        self.path.read().expect("router path lock poisoned").clone()
    }

    fn query_params(&self) -> QueryParams {
        self.params.borrow().clone()
    }

    fn watch_query_params(&self) -> watch::Receiver<QueryParams> {
        self.params.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use crate::query::QueryValue;

    use super::*;

    #[tokio::test]
    async fn test_navigate_updates_snapshot_and_url() {
        let router = MemoryRouter::new("http://app.local/tasks?page=2").unwrap();
        assert_eq!(router.query_params()["page"], QueryValue::single("2"));

        let mut params = QueryParams::new();
        params.insert("page".to_string(), QueryValue::single("2"));
        params.insert("q".to_string(), QueryValue::single("urgent"));
        router
            .navigate(
                "/tasks",
                NavigateOptions {
                    query_params: params,
                    replace_url: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(router.current_url().query(), Some("page=2&q=urgent"));
        assert_eq!(router.navigations(), 1);
        assert_eq!(router.history_len(), 1);
    }

    #[tokio::test]
    async fn test_failure_injection_is_one_shot() {
        let router = MemoryRouter::new("http://app.local/tasks").unwrap();
        router.fail_next_navigation();

        let rejected = router.navigate("/tasks", NavigateOptions::default()).await;
        assert!(rejected.is_err());

        let retried = router.navigate("/tasks", NavigateOptions::default()).await;
        assert!(retried.unwrap());
    }

    #[tokio::test]
    async fn test_watch_stream_sees_navigation() {
        let router = MemoryRouter::new("http://app.local/tasks").unwrap();
        let mut stream = router.watch_query_params();

        let mut params = QueryParams::new();
        params.insert("q".to_string(), QueryValue::single("urgent"));
        router
            .navigate(
                "/tasks",
                NavigateOptions {
                    query_params: params,
                    replace_url: true,
                },
            )
            .await
            .unwrap();

        stream.changed().await.unwrap();
        assert_eq!(stream.borrow()["q"], QueryValue::single("urgent"));
    }
}
