//! Session registry keyed by username.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{BoardError, Result};

/// A logged-in user's session.
///
/// Callers always receive owned copies; removing a session from the
/// registry can never invalidate a copy someone else is holding.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Username this session belongs to.
    pub username: String,
    /// Whether the user counts as logged in. Always true while the
    /// session is in the registry.
    pub login_flag: bool,
    /// When the session was created.
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for a username, stamped now.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            login_flag: true,
            logged_in_at: Utc::now(),
        }
    }
}

/// Registry of all active sessions, keyed by username.
///
/// Cloning the registry clones the handle; all clones see the same
/// sessions. At most one session exists per username, enforced by
/// doing the lookup and the insert under one write lock.
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Find the session for a username.
    pub async fn find(&self, username: &str) -> Result<Option<Session>> {
        let username = valid_username(username)?;
        Ok(self.sessions.read().await.get(username).cloned())
    }

    /// Register a session for a username.
    ///
    /// Idempotent: if the user already has a session, that session is
    /// returned unchanged and nothing is created. Concurrent calls for
    /// the same username all observe the same single session.
    pub async fn register(&self, username: &str) -> Result<Session> {
        let username = valid_username(username)?;
        let mut sessions = self.sessions.write().await;

        if let Some(existing) = sessions.get(username) {
            debug!(username = %username, "register: session already present");
            return Ok(existing.clone());
        }

        let session = Session::new(username);
        sessions.insert(username.to_string(), session.clone());
        debug!(
            username = %username,
            total = sessions.len(),
            "registered session"
        );
        Ok(session)
    }

    /// Remove the session for a username.
    ///
    /// Returns true if a session was removed, false if the user had no
    /// session. Absence is not an error.
    pub async fn unregister(&self, username: &str) -> Result<bool> {
        let username = valid_username(username)?;
        let mut sessions = self.sessions.write().await;

        let removed = sessions.remove(username).is_some();
        if removed {
            debug!(
                username = %username,
                total = sessions.len(),
                "unregistered session"
            );
        } else {
            debug!(username = %username, "unregister: no session");
        }
        Ok(removed)
    }

    /// Whether a user currently has a session.
    pub async fn is_logged_in(&self, username: &str) -> Result<bool> {
        Ok(self.find(username).await?.is_some())
    }

    /// Number of active sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Usernames of all active sessions.
    pub async fn usernames(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionRegistry {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Reject empty and whitespace-only usernames.
fn valid_username(username: &str) -> Result<&str> {
    if username.trim().is_empty() {
        return Err(BoardError::InvalidUsername);
    }
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_find() {
        let registry = SessionRegistry::new();

        let session = registry.register("alice").await.unwrap();
        assert_eq!(session.username, "alice");
        assert!(session.login_flag);

        let found = registry.find("alice").await.unwrap();
        assert_eq!(found, Some(session));
    }

    #[tokio::test]
    async fn test_find_absent() {
        let registry = SessionRegistry::new();
        assert_eq!(registry.find("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_idempotent() {
        let registry = SessionRegistry::new();

        let first = registry.register("alice").await.unwrap();
        let second = registry.register("alice").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.logged_in_at, second.logged_in_at);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_unregister() {
        let registry = SessionRegistry::new();
        registry.register("alice").await.unwrap();

        assert!(registry.unregister("alice").await.unwrap());
        assert_eq!(registry.find("alice").await.unwrap(), None);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_unregister_absent_is_not_an_error() {
        let registry = SessionRegistry::new();
        assert!(!registry.unregister("nobody").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_after_unregister_is_fresh() {
        let registry = SessionRegistry::new();

        let first = registry.register("alice").await.unwrap();
        registry.unregister("alice").await.unwrap();
        let second = registry.register("alice").await.unwrap();

        assert_eq!(second.username, "alice");
        assert!(second.logged_in_at >= first.logged_in_at);
        assert_eq!(registry.count().await, 1);
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let registry = SessionRegistry::new();

        assert!(matches!(
            registry.register("").await,
            Err(BoardError::InvalidUsername)
        ));
        assert!(matches!(
            registry.find("").await,
            Err(BoardError::InvalidUsername)
        ));
        assert!(matches!(
            registry.unregister("").await,
            Err(BoardError::InvalidUsername)
        ));
    }

    #[tokio::test]
    async fn test_whitespace_username_rejected() {
        let registry = SessionRegistry::new();
        assert!(matches!(
            registry.register("   ").await,
            Err(BoardError::InvalidUsername)
        ));
        assert!(matches!(
            registry.register("\t\n").await,
            Err(BoardError::InvalidUsername)
        ));
    }

    #[tokio::test]
    async fn test_is_logged_in() {
        let registry = SessionRegistry::new();

        assert!(!registry.is_logged_in("alice").await.unwrap());
        registry.register("alice").await.unwrap();
        assert!(registry.is_logged_in("alice").await.unwrap());
        registry.unregister("alice").await.unwrap();
        assert!(!registry.is_logged_in("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_usernames() {
        let registry = SessionRegistry::new();
        registry.register("alice").await.unwrap();
        registry.register("bob").await.unwrap();

        let names = registry.usernames().await;
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"alice".to_string()));
        assert!(names.contains(&"bob".to_string()));
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let registry = SessionRegistry::new();
        let other = registry.clone();

        registry.register("alice").await.unwrap();
        assert!(other.is_logged_in("alice").await.unwrap());

        other.unregister("alice").await.unwrap();
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn test_snapshot_survives_removal() {
        let registry = SessionRegistry::new();

        let session = registry.register("alice").await.unwrap();
        registry.unregister("alice").await.unwrap();

        // The copy handed out earlier is still intact.
        assert_eq!(session.username, "alice");
        assert!(session.login_flag);
    }
}
