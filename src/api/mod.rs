//! SM-Clone API operations.
//!
//! [`SocialClient`] is the entry point for the front end: one method per call
//! the application makes, each routed through the [`Gateway`] so that session
//! updates, notifications and the authorization-failure rule are uniform.

mod media;
mod posts;
mod users;

pub use media::*;

use std::sync::{Arc, Mutex};

use reqwest::Url;

use crate::config::Config;
use crate::errors::ClientError;
use crate::gateway::Gateway;
use crate::notify::{Notifications, Notifier};
use crate::routes::Navigator;
use crate::search::UserSearch;
use crate::session::{Mode, SessionEvent, SessionStore};

/// Which post collection the session currently mirrors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Timeline {
    #[default]
    Feed,
    Profile(String),
}

/// Client for the SM-Clone API bound to one session.
#[derive(Debug, Clone)]
pub struct SocialClient {
    config: Arc<Config>,
    gateway: Gateway,
    timeline: Arc<Mutex<Timeline>>,
}

impl SocialClient {
    /// Wire a client around `store`. The returned receiver yields every
    /// notification the client raises.
    pub fn new(config: Config, store: SessionStore) -> Result<(Self, Notifications), ClientError> {
        let (notifier, notifications) = Notifier::channel();
        let navigator = Navigator::new(store.clone());
        let gateway = Gateway::new(&config, store, navigator, notifier)?;

        let client = Self {
            config: Arc::new(config),
            gateway,
            timeline: Arc::new(Mutex::new(Timeline::default())),
        };
        Ok((client, notifications))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn store(&self) -> &SessionStore {
        self.gateway.store()
    }

    pub fn navigator(&self) -> &Navigator {
        self.gateway.navigator()
    }

    /// A search box bound to this client.
    pub fn user_search(&self) -> UserSearch {
        UserSearch::new(self.clone())
    }

    /// Switch between light and dark mode.
    pub fn toggle_mode(&self) -> Mode {
        self.store().dispatch(SessionEvent::ToggleMode).mode
    }

    pub fn timeline(&self) -> Timeline {
        self.timeline
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set_timeline(&self, timeline: Timeline) {
        *self.timeline.lock().unwrap_or_else(|e| e.into_inner()) = timeline;
    }

    fn user_url(&self, segments: &[&str]) -> Result<String, ClientError> {
        join_url(&self.config.api_user, segments).map_err(|e| self.gateway.reject(e))
    }

    fn post_url(&self, segments: &[&str]) -> Result<String, ClientError> {
        join_url(&self.config.api_post, segments).map_err(|e| self.gateway.reject(e))
    }

    /// Id of the signed-in user, or a rejection when nobody is signed in.
    fn self_id(&self) -> Result<String, ClientError> {
        self.store()
            .user()
            .map(|user| user.id)
            .ok_or_else(|| self.gateway.reject(ClientError::NotAuthenticated))
    }
}

/// Append path segments to `base`, percent-encoding each one.
fn join_url(base: &str, segments: &[&str]) -> Result<String, ClientError> {
    let mut url = Url::parse(base)
        .map_err(|e| ClientError::Config(format!("Invalid API URL {:?}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::Config(format!("API URL cannot take a path: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://api/user/", &[]).unwrap(), "http://api/user");
        assert_eq!(
            join_url("http://api/user", &["friendList", "u1"]).unwrap(),
            "http://api/user/friendList/u1"
        );
    }

    #[test]
    fn test_join_url_encodes_segments() {
        assert_eq!(
            join_url("http://api/post", &["like", "p1/../x?y#z"]).unwrap(),
            "http://api/post/like/p1%2F..%2Fx%3Fy%23z"
        );
    }

    #[test]
    fn test_join_url_rejects_bad_base() {
        let err = join_url("not a url", &["u1"]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(join_url("mailto:ada@example.com", &["u1"]).is_err());
    }

    #[test]
    fn test_toggle_mode_and_timeline_default() {
        let (client, _rx) = SocialClient::new(Config::default(), SessionStore::default()).unwrap();
        assert_eq!(client.toggle_mode(), Mode::Dark);
        assert_eq!(client.toggle_mode(), Mode::Light);
        assert_eq!(client.timeline(), Timeline::Feed);
    }
}
