// User service: registration and OAuth account resolution

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use teamspace_core::{Principal, RegisterUserInput, RegistrationError, RegistrationService};

use crate::auth::oauth::OAuthUserInfo;
use crate::storage::{
    models::{AccountProvider, CreateUserRow},
    password::hash_password,
    InMemoryDatabase,
};

pub struct UserService {
    db: Arc<InMemoryDatabase>,
}

impl UserService {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self { db }
    }

    /// Resolve the user behind a Google identity, creating one on first login.
    ///
    /// An existing local account is linked only when Google reports the email
    /// as verified; otherwise no principal is returned.
    pub fn login_or_create_google_user(&self, info: &OAuthUserInfo) -> Option<Principal> {
        let provider = AccountProvider::Google;

        if let Some(user) = self.db.get_user_by_account(provider, &info.provider_id) {
            tracing::debug!(user.id = %user.id, "Google account already linked");
            return self.finish_oauth_login(user.id, info);
        }

        if let Some(existing) = self.db.get_user_by_email(&info.email) {
            if !info.email_verified {
                tracing::warn!(
                    user.id = %existing.id,
                    "Google email is unverified, refusing to link existing account"
                );
                return None;
            }
            self.db.link_account(existing.id, provider, &info.provider_id)?;
            tracing::info!(user.id = %existing.id, "Linked Google account to existing user");
            return self.finish_oauth_login(existing.id, info);
        }

        let name = if info.name.trim().is_empty() {
            info.email.clone()
        } else {
            info.name.clone()
        };

        match self.db.create_user_with_workspace(CreateUserRow {
            name,
            email: info.email.clone(),
            password_hash: None,
            profile_picture: info.avatar_url.clone(),
            provider,
            provider_id: info.provider_id.clone(),
        }) {
            Ok(user) => {
                tracing::info!(user.id = %user.id, "Created user from Google login");
                self.finish_oauth_login(user.id, info)
            }
            Err(e) => {
                // Lost a race with a concurrent signup for the same email
                tracing::warn!(error = %e, "Could not create user from Google login");
                None
            }
        }
    }

    fn finish_oauth_login(&self, user_id: uuid::Uuid, info: &OAuthUserInfo) -> Option<Principal> {
        if let Some(picture) = info.avatar_url.as_deref() {
            self.db.set_profile_picture_if_missing(user_id, picture);
        }
        self.db
            .touch_last_login(user_id)
            .map(|user| user.to_principal())
    }
}

#[async_trait]
impl RegistrationService for UserService {
    async fn register(&self, input: RegisterUserInput) -> Result<Principal, RegistrationError> {
        // Cheap pre-check so duplicates don't pay for a hash
        if self.db.get_user_by_email(&input.email).is_some() {
            return Err(RegistrationError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = self.db.create_user_with_workspace(CreateUserRow {
            name: input.name,
            email: input.email.clone(),
            password_hash: Some(password_hash),
            profile_picture: None,
            provider: AccountProvider::Email,
            provider_id: input.email,
        })?;

        tracing::info!(user.id = %user.id, "Registered user");
        Ok(user.to_principal())
    }
}
