//! Client-side routes and navigation.
//!
//! Routes are observable state: components subscribe to the current route and
//! react to changes. Protected routes resolve to the landing page when nobody
//! is signed in, and the landing page resolves to the feed when somebody is.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::session::SessionStore;

/// A client-side route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// `/`: login and registration
    #[default]
    Landing,
    /// `/home`: feed
    Home,
    /// `/profile/:userId`
    Profile(String),
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Landing)
    }

    /// Resolve redirects for the given authentication state.
    pub fn guard(self, authenticated: bool) -> Route {
        match self {
            Route::Landing if authenticated => Route::Home,
            route if route.requires_auth() && !authenticated => Route::Landing,
            route => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Landing => write!(f, "/"),
            Route::Home => write!(f, "/home"),
            Route::Profile(user_id) => write!(f, "/profile/{}", user_id),
        }
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('/') {
            "" => Ok(Route::Landing),
            "/home" => Ok(Route::Home),
            path => match path.strip_prefix("/profile/") {
                Some(user_id) if !user_id.is_empty() && !user_id.contains('/') => {
                    Ok(Route::Profile(user_id.to_string()))
                }
                _ => Err(format!("Unknown route: {}", s)),
            },
        }
    }
}

/// Owns the current route and any deferred navigation.
#[derive(Clone)]
pub struct Navigator {
    store: SessionStore,
    current: Arc<watch::Sender<Route>>,
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Navigator {
    pub fn new(store: SessionStore) -> Self {
        let initial = Route::Landing.guard(store.is_authenticated());
        let (tx, _rx) = watch::channel(initial);
        Self {
            store,
            current: Arc::new(tx),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    /// Navigate now, applying the auth guard. Returns the route actually shown.
    pub fn navigate(&self, route: Route) -> Route {
        let resolved = route.clone().guard(self.store.is_authenticated());
        if resolved != route {
            tracing::debug!("Redirecting {} -> {}", route, resolved);
        }
        tracing::info!("Navigating to {}", resolved);
        self.current.send_replace(resolved.clone());
        resolved
    }

    /// Navigate once after `delay`. Replaces any navigation still pending.
    pub fn navigate_after(&self, route: Route, delay: Duration) {
        let navigator = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(route);
        });

        let previous = self.lock_pending().replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the pending deferred navigation, if any, to run.
    pub async fn wait_pending(&self) {
        let handle = self.lock_pending().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("Deferred navigation failed: {}", e);
                }
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}
