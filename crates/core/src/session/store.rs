//! Observable session container

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use todo_http::User;

/// The published "logged in as" record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

/// Holder of the current [`Session`]
///
/// Readers either poll [`SessionStore::get`] or hold a receiver from
/// [`SessionStore::subscribe`] and wait for changes. Only the session
/// controller writes to it.
#[derive(Clone)]
pub struct SessionStore {
    sender: watch::Sender<Option<Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn get(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Publish `session`, replacing any previous one
    pub fn set(&self, session: Session) {
        self.sender.send_replace(Some(session));
    }

    /// Remove the session; subscribers are only woken if one was present
    pub fn clear(&self) {
        self.sender.send_if_modified(|current| current.take().is_some());
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.get().map(|session| session.user.username))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(username: &str, token: &str) -> Session {
        Session {
            access_token: token.to_string(),
            user: User {
                id: 1,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                name: username.to_string(),
                is_active: None,
            },
        }
    }

    #[test]
    fn set_and_clear() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());

        store.set(session("alice", "t1"));
        assert!(store.is_authenticated());
        assert_eq!(store.get().unwrap().access_token, "t1");

        store.clear();
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = SessionStore::new();
        let mut receiver = store.subscribe();

        store.set(session("alice", "t1"));
        receiver.changed().await.unwrap();
        assert_eq!(
            receiver.borrow_and_update().as_ref().unwrap().user.username,
            "alice"
        );

        store.clear();
        receiver.changed().await.unwrap();
        assert!(receiver.borrow_and_update().is_none());
    }

    #[test]
    fn clearing_an_empty_store_does_not_notify() {
        let store = SessionStore::new();
        let receiver = store.subscribe();
        store.clear();
        assert!(!receiver.has_changed().unwrap());
    }
}
