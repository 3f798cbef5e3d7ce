//! Observable holder for fetched repositories.
//!
//! # Design
//! `RepositoryStore` is the terminal consumer of the executor: it builds a
//! fresh descriptor for its fixed query, runs it through one of the three
//! strategies, and on success replaces its item list wholesale. The list
//! lives in a `watch` channel, which serializes every replacement and
//! notifies observers, keeping single-writer semantics without the store
//! holding a lock across I/O. On failure the store reports to stderr and
//! leaves state untouched; observers are not told about errors and see
//! silence.

use std::sync::Mutex;

use tokio::sync::watch;

use crate::client::{ApiClient, StreamEvent, Subscription};
use crate::error::ApiError;
use crate::types::{search_repositories, Repository, SearchResults};

/// Holds the fetched repository list and republishes it to observers.
pub struct RepositoryStore {
    client: ApiClient,
    base_url: String,
    query: String,
    items: watch::Sender<Vec<Repository>>,
    subscription: Mutex<Option<Subscription>>,
}

impl RepositoryStore {
    /// Create an empty store querying `base_url` with the fixed `query`.
    pub fn new(client: ApiClient, base_url: &str, query: &str) -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            query: query.to_string(),
            items,
            subscription: Mutex::new(None),
        }
    }

    /// Observe item replacements. The receiver sees the current list
    /// immediately and is notified on every successful fetch.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Repository>> {
        self.items.subscribe()
    }

    /// Snapshot of the current item list.
    pub fn items(&self) -> Vec<Repository> {
        self.items.borrow().clone()
    }

    /// Fetch via the callback strategy.
    pub fn fetch_callback(&self) {
        let descriptor = match search_repositories(&self.base_url, &self.query) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                report(&error);
                return;
            }
        };
        let items = self.items.clone();
        self.client.execute(descriptor, move |outcome| match outcome {
            Ok(results) => apply(&items, results),
            Err(error) => report(&error),
        });
    }

    /// Fetch via the stream strategy.
    ///
    /// Any previous in-flight stream fetch is cancelled before its handle is
    /// replaced, so at most one stream subscription is live per store.
    pub fn fetch_stream(&self) {
        let descriptor = match search_repositories(&self.base_url, &self.query) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                report(&error);
                return;
            }
        };
        let items = self.items.clone();
        let subscription = self.client.execute_stream(descriptor, move |event| match event {
            StreamEvent::Value(results) => apply(&items, results),
            StreamEvent::Completed => {}
            StreamEvent::Failed(error) => report(&error),
        });
        if let Ok(mut slot) = self.subscription.lock() {
            if let Some(previous) = slot.take() {
                previous.cancel();
            }
            *slot = Some(subscription);
        }
    }

    /// Fetch via the suspend/resume strategy.
    pub async fn fetch(&self) {
        let descriptor = match search_repositories(&self.base_url, &self.query) {
            Ok(descriptor) => descriptor,
            Err(error) => {
                report(&error);
                return;
            }
        };
        match self.client.execute_async(descriptor).await {
            Ok(results) => apply(&self.items, results),
            Err(error) => report(&error),
        }
    }

    /// Cancel the in-flight stream fetch, if any.
    pub fn cancel(&self) {
        if let Ok(mut slot) = self.subscription.lock() {
            if let Some(subscription) = slot.take() {
                subscription.cancel();
            }
        }
    }
}

/// Replace the observable list with the fetched items, absent items meaning
/// an empty list.
fn apply(items: &watch::Sender<Vec<Repository>>, results: SearchResults) {
    items.send_replace(results.items.unwrap_or_default());
}

fn report(error: &ApiError) {
    eprintln!("repository search failed: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RepositoryStore {
        RepositoryStore::new(ApiClient::new(), "http://localhost:3000", "rust+http")
    }

    #[test]
    fn starts_empty() {
        let store = store();
        assert!(store.items().is_empty());
        assert!(store.subscribe().borrow().is_empty());
    }

    #[test]
    fn cancel_without_a_fetch_is_a_no_op() {
        let store = store();
        store.cancel();
        assert!(store.items().is_empty());
    }

    #[test]
    fn apply_defaults_absent_items_to_empty() {
        let (items, observer) = watch::channel(vec![]);
        apply(
            &items,
            SearchResults {
                total_count: 0,
                incomplete_results: false,
                items: None,
            },
        );
        assert!(observer.borrow().is_empty());
        assert!(observer.has_changed().unwrap());
    }

    #[test]
    fn bad_base_url_reports_without_panicking() {
        let store = RepositoryStore::new(ApiClient::new(), "not a url", "rust+http");
        store.fetch_callback();
        store.fetch_stream();
        assert!(store.items().is_empty());
    }
}
