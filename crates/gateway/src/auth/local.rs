// Local email + password strategy
// Decision: Unknown emails and wrong passwords share one failure message
// Decision: Unknown emails still pay for one Argon2 verification

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use teamspace_core::{CredentialVerifier, LoginOutcome};

use crate::storage::{
    password::{verify_dummy, verify_password},
    InMemoryDatabase,
};

pub const MISSING_CREDENTIALS: &str = "Missing credentials";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct LocalStrategy {
    db: Arc<InMemoryDatabase>,
}

impl LocalStrategy {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialVerifier for LocalStrategy {
    async fn verify(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::failure(MISSING_CREDENTIALS));
        }

        let user = match self.db.get_user_by_email(email) {
            Some(user) => user,
            None => {
                verify_dummy(password);
                return Ok(LoginOutcome::failure(INVALID_CREDENTIALS));
            }
        };

        // OAuth-only accounts have no password to check
        let Some(hash) = user.password_hash.as_deref() else {
            verify_dummy(password);
            return Ok(LoginOutcome::failure(INVALID_CREDENTIALS));
        };

        if !verify_password(password, hash)? {
            return Ok(LoginOutcome::failure(INVALID_CREDENTIALS));
        }

        let user = self.db.touch_last_login(user.id).unwrap_or(user);
        Ok(LoginOutcome::Success(user.to_principal()))
    }
}
