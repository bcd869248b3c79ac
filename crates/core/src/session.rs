// Session domain types
//
// A session binds an opaque cookie token to an optional principal.
// Used by the session store implementations and the gateway extractor.

use chrono::{DateTime, Utc};

use crate::principal::Principal;

/// Opaque session token as carried in the session cookie.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are bearer credentials; keep them out of Debug output
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Server-side state for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Logged-in user. `None` once the principal has been detached.
    pub principal: Option<Principal>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("abc123");
        assert_eq!(format!("{:?}", token), "SessionToken(<redacted>)");
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn test_record_expiry() {
        let now = Utc::now();
        let record = SessionRecord {
            principal: None,
            created_at: now,
            expires_at: now + Duration::seconds(60),
        };
        assert!(!record.is_expired_at(now));
        assert!(record.is_expired_at(now + Duration::seconds(60)));
        assert!(record.is_expired_at(now + Duration::seconds(61)));
    }
}
