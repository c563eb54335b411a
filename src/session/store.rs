//! Shared session container.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tempfile::NamedTempFile;

use super::{reduce, Mode, Session, SessionEvent};
use crate::errors::ClientError;
use crate::models::{Post, User};

/// Handle to the session shared by every component of the client.
///
/// Cloning the handle shares the same state. Reads return owned snapshots so
/// no lock outlives the call.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
    persist_path: Option<Arc<PathBuf>>,
}

impl SessionStore {
    /// Create an in-memory store.
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
            persist_path: None,
        }
    }

    /// Open a store backed by a JSON snapshot file.
    ///
    /// A missing file starts an empty session. A file that cannot be read or
    /// parsed is logged and replaced on the next dispatch.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match load_snapshot(&path) {
            Ok(Some(session)) => {
                tracing::debug!("Restored session from {:?}", path);
                session
            }
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {:?}: {}", path, e);
                Session::default()
            }
        };

        Self {
            inner: Arc::new(RwLock::new(session)),
            persist_path: Some(Arc::new(path)),
        }
    }

    /// Apply an event and return the resulting session.
    ///
    /// The snapshot is written before the write lock is released, so the file
    /// always holds the state of the last applied event.
    pub fn dispatch(&self, event: SessionEvent) -> Session {
        let name = event.name();
        let mut guard = self.write();
        let current = std::mem::take(&mut *guard);
        *guard = reduce(current, event);

        if let Some(path) = &self.persist_path {
            if let Err(e) = save_snapshot(path, &guard) {
                tracing::warn!("Failed to persist session to {:?}: {}", path, e);
            }
        }
        let next = guard.clone();
        drop(guard);

        tracing::debug!(
            event = name,
            authenticated = next.is_authenticated(),
            posts = next.posts.len(),
            "Session updated"
        );
        next
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token().map(str::to_string)
    }

    pub fn mode(&self) -> Mode {
        self.read().mode
    }

    pub fn posts(&self) -> Vec<Post> {
        self.read().posts.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn load_snapshot(path: &Path) -> Result<Option<Session>, ClientError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read(path)?;
    Ok(Some(serde_json::from_slice(&raw)?))
}

fn save_snapshot(path: &Path, session: &Session) -> Result<(), ClientError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&serde_json::to_vec_pretty(session)?)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fixtures::{post, user};
    use tempfile::TempDir;

    #[test]
    fn test_dispatch_updates_shared_state() {
        let store = SessionStore::default();
        let other = store.clone();

        store.dispatch(SessionEvent::Login {
            user: user("u1"),
            token: "tok".into(),
        });

        assert!(other.is_authenticated());
        assert_eq!(other.token().as_deref(), Some("tok"));
        assert_eq!(other.user().unwrap().id, "u1");
    }

    #[test]
    fn test_open_missing_file_starts_anonymous() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));

        assert!(!store.is_authenticated());
        assert_eq!(store.mode(), Mode::Light);
    }

    #[test]
    fn test_mode_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = SessionStore::open(&path);
        store.dispatch(SessionEvent::ToggleMode);
        store.dispatch(SessionEvent::Login {
            user: user("u1"),
            token: "tok".into(),
        });
        store.dispatch(SessionEvent::SetPosts(vec![post("p1")]));

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.mode(), Mode::Dark);
        assert_eq!(reopened.token().as_deref(), Some("tok"));
        assert_eq!(reopened.posts().len(), 1);
    }

    #[test]
    fn test_concurrent_dispatch_keeps_file_in_step() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path);

        let toggler = {
            let store = store.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    store.dispatch(SessionEvent::ToggleMode);
                }
            })
        };
        let auth = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 0..50 {
                    store.dispatch(SessionEvent::Login {
                        user: user("u1"),
                        token: format!("tok-{}", i),
                    });
                    store.dispatch(SessionEvent::Logout);
                }
            })
        };
        toggler.join().unwrap();
        auth.join().unwrap();

        let on_disk = SessionStore::open(&path).snapshot();
        assert!(!on_disk.is_authenticated());
        assert_eq!(on_disk, store.snapshot());
        // no stray temp files left next to the snapshot
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = SessionStore::open(&path);
        assert_eq!(store.snapshot(), Session::default());

        store.dispatch(SessionEvent::ToggleMode);
        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.mode(), Mode::Dark);
    }
}
