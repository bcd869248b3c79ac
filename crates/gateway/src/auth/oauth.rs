// OAuth service for Google authentication
// Decision: Manual OAuth2 authorization-code flow over reqwest
// Decision: Link to existing accounts by email only when Google reports it verified

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use teamspace_core::{OAuthCallback, OAuthStrategy, Principal};

use super::config::GoogleOAuthConfig;
use crate::services::UserService;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const GOOGLE_SCOPES: &str = "profile email";

/// User info from OAuth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthUserInfo {
    /// Provider user ID (`sub`)
    pub provider_id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub email_verified: bool,
}

/// Google OAuth service
pub struct GoogleOAuthService {
    config: GoogleOAuthConfig,
    client: reqwest::Client,
}

impl GoogleOAuthService {
    pub fn new(config: &GoogleOAuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// Generate authorization URL for OAuth flow
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let url = url::Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", GOOGLE_SCOPES),
                ("state", state),
            ],
        )
        .context("Invalid Google authorization URL")?;

        Ok(url.into())
    }

    /// Exchange authorization code for user info
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthUserInfo> {
        // Exchange code for token
        let token_response: GoogleTokenResponse = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .context("Failed to exchange code")?
            .error_for_status()
            .context("Google rejected the authorization code")?
            .json()
            .await
            .context("Failed to parse token response")?;

        // Fetch user info
        let user_info: GoogleUserInfo = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(&token_response.access_token)
            .send()
            .await
            .context("Failed to fetch user info")?
            .error_for_status()
            .context("Google rejected the access token")?
            .json()
            .await
            .context("Failed to parse user info")?;

        Ok(OAuthUserInfo {
            provider_id: user_info.sub,
            email: user_info.email,
            name: user_info.name.unwrap_or_default(),
            avatar_url: user_info.picture,
            email_verified: user_info.email_verified.unwrap_or(false),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
    email_verified: Option<bool>,
}

/// Google login strategy: code exchange followed by account resolution
pub struct GoogleStrategy {
    service: GoogleOAuthService,
    users: Arc<UserService>,
}

impl GoogleStrategy {
    pub fn new(config: &GoogleOAuthConfig, users: Arc<UserService>) -> Result<Self> {
        Ok(Self {
            service: GoogleOAuthService::new(config)?,
            users,
        })
    }
}

#[async_trait]
impl OAuthStrategy for GoogleStrategy {
    fn authorization_url(&self, state: &str) -> Result<String> {
        self.service.authorization_url(state)
    }

    async fn verify(&self, callback: &OAuthCallback) -> Result<Option<Principal>> {
        let info = self.service.exchange_code(&callback.code).await?;
        Ok(self.users.login_or_create_google_user(&info))
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
