//! Session state and its lifecycle reducer.
//!
//! The session is the single source of truth for the signed-in user, the
//! bearer token, the theme mode and the currently loaded posts. All changes go
//! through [`reduce`], which is pure: the same session and event always give
//! the same next session.

mod store;

pub use store::*;

use serde::{Deserialize, Serialize};

use crate::models::{FriendRef, Post, User};

/// UI theme mode. Independent of authentication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Light => "light",
            Mode::Dark => "dark",
        }
    }
}

/// Signed-in user together with the token that authenticates them.
///
/// Keeping both in one record means a session can never hold one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticated {
    pub user: User,
    pub token: String,
}

/// Client session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub auth: Option<Authenticated>,
    #[serde(default)]
    pub mode: Mode,
    /// Last fetched feed or profile timeline, most recent first
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|auth| &auth.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

/// Events accepted by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Login { user: User, token: String },
    Logout,
    ToggleMode,
    SetFriends(Vec<FriendRef>),
    SetPosts(Vec<Post>),
    SetPost(Post),
}

impl SessionEvent {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Login { .. } => "login",
            SessionEvent::Logout => "logout",
            SessionEvent::ToggleMode => "set_mode",
            SessionEvent::SetFriends(_) => "set_friends",
            SessionEvent::SetPosts(_) => "set_posts",
            SessionEvent::SetPost(_) => "set_post",
        }
    }
}

/// Compute the session that follows `event`.
pub fn reduce(mut session: Session, event: SessionEvent) -> Session {
    match event {
        SessionEvent::Login { user, token } => {
            session.auth = Some(Authenticated { user, token });
        }
        SessionEvent::Logout => {
            // mode and cached posts survive a logout
            session.auth = None;
        }
        SessionEvent::ToggleMode => {
            session.mode = session.mode.toggled();
        }
        SessionEvent::SetFriends(friends) => {
            if let Some(auth) = session.auth.as_mut() {
                auth.user.friends = friends;
            }
        }
        SessionEvent::SetPosts(posts) => {
            session.posts = posts;
        }
        SessionEvent::SetPost(post) => {
            if let Some(slot) = session.posts.iter_mut().find(|p| p.id == post.id) {
                *slot = post;
            }
        }
    }
    session
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::BTreeMap;

    use crate::models::{FriendRef, Post, User};

    pub fn friend(id: &str) -> FriendRef {
        FriendRef {
            id: id.to_string(),
            first_name: format!("First-{}", id),
            last_name: format!("Last-{}", id),
            occupation: "Engineer".to_string(),
            picture_path: String::new(),
        }
    }

    pub fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{}@example.com", id),
            location: "Berlin".to_string(),
            occupation: "Tester".to_string(),
            picture_path: String::new(),
            friends: vec![],
        }
    }

    pub fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            user: friend("author"),
            description: format!("post {}", id),
            picture_path: None,
            likes: BTreeMap::new(),
            comments: vec![],
        }
    }
}
