//! In-memory dashboard sessions issued against the shared password.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::Session;

/// Live session tokens and their expiry.
#[derive(Debug, Default)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a new session token.
    pub async fn create(&self) -> Session {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::hours(8));
        let expires_at = Utc::now() + ttl;

        let mut sessions = self.sessions.write().await;
        // Expired sessions are dropped on every write.
        let now = Utc::now();
        sessions.retain(|_, expiry| *expiry > now);
        sessions.insert(token.clone(), expires_at);

        Session {
            token,
            expires_at: expires_at.to_rfc3339(),
        }
    }

    /// Whether `token` names a live session.
    pub async fn is_valid(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .is_some_and(|expiry| *expiry > Utc::now())
    }

    /// Drop a session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new(Duration::from_secs(60));
        let session = store.create().await;

        assert!(store.is_valid(&session.token).await);
        assert!(!store.is_valid("unknown").await);

        assert!(store.revoke(&session.token).await);
        assert!(!store.is_valid(&session.token).await);
        assert!(!store.revoke(&session.token).await);
    }

    #[tokio::test]
    async fn test_zero_ttl_session_is_never_valid() {
        let store = SessionStore::new(Duration::ZERO);
        let session = store.create().await;
        assert!(!store.is_valid(&session.token).await);
    }
}
