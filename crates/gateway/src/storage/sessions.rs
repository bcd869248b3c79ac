// In-memory session store
// Decision: Tokens are keyed by SHA-256 digest; raw tokens exist only in cookies
// Decision: Expired sessions are dropped on lookup and by a periodic sweep

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use teamspace_core::{Principal, SessionRecord, SessionStore, SessionToken};

use crate::auth::tokens::{generate_session_token, hash_token};

pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    max_age: Duration,
}

impl InMemorySessionStore {
    pub fn new(max_age: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_age,
        }
    }

    /// Remove every expired session, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired_at(now));
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn attach(&self, principal: Principal) -> Result<SessionToken> {
        let token = generate_session_token();
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(self.max_age)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .context("Session expiry is out of range")?;
        let record = SessionRecord {
            principal: Some(principal),
            created_at: now,
            expires_at,
        };
        self.sessions.write().insert(hash_token(token.as_str()), record);
        Ok(token)
    }

    async fn load(&self, token: &SessionToken) -> Result<Option<SessionRecord>> {
        let key = hash_token(token.as_str());
        let now = Utc::now();

        {
            let sessions = self.sessions.read();
            match sessions.get(&key) {
                None => return Ok(None),
                Some(record) if !record.is_expired_at(now) => return Ok(Some(record.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it so the map doesn't grow between sweeps
        self.sessions.write().remove(&key);
        Ok(None)
    }

    async fn detach(&self, token: &SessionToken) -> Result<()> {
        if let Some(record) = self.sessions.write().get_mut(&hash_token(token.as_str())) {
            record.principal = None;
        }
        Ok(())
    }

    async fn invalidate(&self, token: &SessionToken) -> Result<()> {
        self.sessions.write().remove(&hash_token(token.as_str()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal::new("u1", "Ada", "ada@example.com")
    }

    #[tokio::test]
    async fn test_attach_then_load() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let token = store.attach(principal()).await.unwrap();

        let record = store.load(&token).await.unwrap().unwrap();
        assert_eq!(record.principal.unwrap().id, "u1");
        assert!(record.expires_at > record.created_at);
    }

    #[tokio::test]
    async fn test_raw_token_is_not_stored() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let token = store.attach(principal()).await.unwrap();
        assert!(!store.sessions.read().contains_key(token.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let token = SessionToken::new("nope");
        assert!(store.load(&token).await.unwrap().is_none());
        store.detach(&token).await.unwrap();
        store.invalidate(&token).await.unwrap();
    }

    #[tokio::test]
    async fn test_detach_keeps_session_without_principal() {
        let store = InMemorySessionStore::new(Duration::from_secs(60));
        let token = store.attach(principal()).await.unwrap();

        store.detach(&token).await.unwrap();
        let record = store.load(&token).await.unwrap().unwrap();
        assert!(record.principal.is_none());

        store.invalidate(&token).await.unwrap();
        assert!(store.load(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped() {
        let store = InMemorySessionStore::new(Duration::ZERO);
        let token = store.attach(principal()).await.unwrap();
        assert!(store.load(&token).await.unwrap().is_none());
        assert!(store.is_empty());

        store.attach(principal()).await.unwrap();
        store.attach(principal()).await.unwrap();
        assert_eq!(store.purge_expired(), 2);
    }

    #[tokio::test]
    async fn test_attach_rejects_unrepresentable_expiry() {
        let store = InMemorySessionStore::new(Duration::from_secs(10_000_000_000_000));
        assert!(store.attach(principal()).await.is_err());
        assert!(store.is_empty());

        let store = InMemorySessionStore::new(Duration::from_secs(u64::MAX));
        assert!(store.attach(principal()).await.is_err());
    }
}
