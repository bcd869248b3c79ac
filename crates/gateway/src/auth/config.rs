// Authentication configuration loaded from environment variables.
// Decision: Google OAuth is enabled only when both client id and secret are set
// Decision: Provider endpoints are configurable so tests can point them at a mock server

use std::time::Duration;

use crate::config::ServerConfig;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Where the browser is sent after the OAuth flow
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Frontend origin; success redirects go to `{origin}/workspace/{id}`
    pub origin: String,
    /// Frontend page that renders OAuth failures
    pub google_callback_url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:5173".to_string(),
            google_callback_url: "http://localhost:5173/google/oauth/callback".to_string(),
        }
    }
}

/// Google OAuth configuration
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Our callback URL as registered with Google
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
}

impl GoogleOAuthConfig {
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
        }
    }
}

/// Longest accepted SESSION_MAX_AGE (400 days, the browser cap on cookie lifetime)
pub const MAX_SESSION_MAX_AGE_SECS: u64 = 400 * 24 * 60 * 60;

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Session lifetime, also used as cookie Max-Age
    pub max_age: Duration,
    /// Mark cookies Secure (production)
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            max_age: Duration::from_secs(24 * 60 * 60), // 1 day
            secure: false,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub frontend: FrontendConfig,
    /// Google OAuth configuration
    pub google: Option<GoogleOAuthConfig>,
    pub session: SessionConfig,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env(server: &ServerConfig) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), server)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, server: &ServerConfig) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = FrontendConfig::default();
        let non_empty = |key: &str| lookup(key).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let frontend = FrontendConfig {
            origin: non_empty("FRONTEND_ORIGIN")
                .map(|s| trim_trailing_slash(&s))
                .unwrap_or(defaults.origin),
            google_callback_url: non_empty("FRONTEND_GOOGLE_CALLBACK_URL")
                .map(|s| trim_trailing_slash(&s))
                .unwrap_or(defaults.google_callback_url),
        };

        // Google OAuth configuration
        let google = match (non_empty("GOOGLE_CLIENT_ID"), non_empty("GOOGLE_CLIENT_SECRET")) {
            (Some(client_id), Some(client_secret)) => {
                let redirect_uri = non_empty("GOOGLE_CALLBACK_URL").unwrap_or_else(|| {
                    format!(
                        "http://localhost:{}{}/auth/google/callback",
                        server.port, server.base_path
                    )
                });
                Some(GoogleOAuthConfig::new(&client_id, &client_secret, &redirect_uri))
            }
            _ => None,
        };

        let session_defaults = SessionConfig::default();
        let max_age = match non_empty("SESSION_MAX_AGE") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 && secs <= MAX_SESSION_MAX_AGE_SECS => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        value = %raw,
                        max = MAX_SESSION_MAX_AGE_SECS,
                        "SESSION_MAX_AGE must be between 1 and max seconds, using default"
                    );
                    session_defaults.max_age
                }
            },
            None => session_defaults.max_age,
        };

        let session = SessionConfig {
            cookie_name: non_empty("SESSION_COOKIE_NAME").unwrap_or(session_defaults.cookie_name),
            max_age,
            secure: server.is_production(),
        };

        Self {
            frontend,
            google,
            session,
        }
    }

    /// Check if Google OAuth is available
    pub fn google_enabled(&self) -> bool {
        self.google.is_some()
    }
}

fn trim_trailing_slash(s: &str) -> String {
    s.trim_end_matches('/').to_string()
}
