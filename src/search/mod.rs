//! Search-as-you-type over users.
//!
//! Each query change issues a new request. Requests are numbered; a response
//! is shown only while its number is still the latest, so a slow answer to an
//! old query never overwrites the answer to a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::api::SocialClient;
use crate::errors::ClientError;
use crate::models::UserSummary;

/// What the search panel shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<UserSummary>,
    pub loading: bool,
}

impl SearchState {
    /// The panel is hidden while the query is empty.
    pub fn is_visible(&self) -> bool {
        !self.query.is_empty()
    }
}

/// Result of a query change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results for this query are now shown
    Applied(usize),
    /// A newer query was issued while this one was in flight
    Stale,
    /// The query was emptied and the panel hidden
    Cleared,
}

/// Search box state bound to a client.
#[derive(Debug)]
pub struct UserSearch {
    client: SocialClient,
    latest: AtomicU64,
    state: Mutex<SearchState>,
}

impl UserSearch {
    pub fn new(client: SocialClient) -> Self {
        Self {
            client,
            latest: AtomicU64::new(0),
            state: Mutex::new(SearchState::default()),
        }
    }

    pub fn state(&self) -> SearchState {
        self.lock().clone()
    }

    /// Update the query text and fetch matching users.
    pub async fn set_query(&self, text: &str) -> Result<SearchOutcome, ClientError> {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.query = text.to_string();
            if text.is_empty() {
                state.results.clear();
                state.loading = false;
                return Ok(SearchOutcome::Cleared);
            }
            state.loading = true;
        }

        let result = self.client.search_users(text).await;

        let mut state = self.lock();
        if self.latest.load(Ordering::SeqCst) != seq {
            tracing::debug!(seq, "Discarding results for superseded query {:?}", text);
            return Ok(SearchOutcome::Stale);
        }
        state.loading = false;
        match result {
            Ok(results) => {
                let count = results.len();
                state.results = results;
                Ok(SearchOutcome::Applied(count))
            }
            Err(e) => {
                // results of the previous query no longer match the box
                state.results.clear();
                Err(e)
            }
        }
    }

    /// Empty the query and hide the panel.
    pub fn clear(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        state.query.clear();
        state.results.clear();
        state.loading = false;
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::SessionStore;

    fn search() -> UserSearch {
        let (client, _rx) = SocialClient::new(Config::default(), SessionStore::default()).unwrap();
        client.user_search()
    }

    #[tokio::test]
    async fn test_empty_query_hides_panel_without_request() {
        let search = search();

        let outcome = search.set_query("").await.unwrap();

        assert_eq!(outcome, SearchOutcome::Cleared);
        let state = search.state();
        assert!(!state.is_visible());
        assert!(!state.loading);
        assert!(state.results.is_empty());
    }

    #[test]
    fn test_clear_resets_state() {
        let search = search();
        search.lock().query = "ada".into();
        search.lock().loading = true;

        search.clear();

        assert_eq!(search.state(), SearchState::default());
    }
}
