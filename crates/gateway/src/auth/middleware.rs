// Session extraction and shared auth state
// Decision: Cookie-based sessions only (opaque token -> server-side record)
// Decision: Handlers receive the resolved session explicitly; nothing is stashed on the request

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use teamspace_core::{
    CredentialVerifier, OAuthStrategy, Principal, RegistrationService, SessionRecord, SessionStore,
    SessionToken,
};

use super::config::{AuthConfig, SessionConfig};
use crate::error::AppError;

/// Cookie carrying the CSRF state between `/google` and the callback
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Lifetime of the OAuth state cookie
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 10 * 60;

/// Gateway state shared across routes
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<AuthConfig>,
    pub sessions: Arc<dyn SessionStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub registration: Arc<dyn RegistrationService>,
    /// `None` when Google OAuth is not configured
    pub google: Option<Arc<dyn OAuthStrategy>>,
}

impl GatewayState {
    pub fn session_config(&self) -> &SessionConfig {
        &self.config.session
    }
}

/// Helper trait for extracting GatewayState from application state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<GatewayState> for GatewayState {
    fn from_ref(input: &GatewayState) -> Self {
        input.clone()
    }
}

/// Session resolved for the current request
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Token from the session cookie, if one was sent
    pub token: Option<SessionToken>,
    /// Live session record behind the token
    pub record: Option<SessionRecord>,
    /// Raw `Cookie` header, for diagnostics
    pub cookie_header: Option<String>,
}

impl SessionContext {
    pub fn principal(&self) -> Option<&Principal> {
        self.record.as_ref().and_then(|r| r.principal.as_ref())
    }

    pub fn has_session(&self) -> bool {
        self.record.is_some()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
    GatewayState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gateway = GatewayState::from_ref(state);

        let cookie_header = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, gateway.session_config());

        let record = match &token {
            Some(token) => gateway.sessions.load(token).await.map_err(AppError::Session)?,
            None => None,
        };

        Ok(SessionContext {
            token,
            record,
            cookie_header,
        })
    }
}

/// Read the session token from the request cookies
pub fn session_token(jar: &CookieJar, config: &SessionConfig) -> Option<SessionToken> {
    jar.get(&config.cookie_name)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .map(SessionToken::new)
}

/// Session cookie carrying a freshly attached token
pub fn session_cookie(config: &SessionConfig, token: &SessionToken) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token.as_str().to_string()))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            i64::try_from(config.max_age.as_secs()).unwrap_or(i64::MAX),
        ))
        .build()
}

/// Expire the session cookie
pub fn clear_session_cookie(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    jar.remove(Cookie::build((config.cookie_name.clone(), "")).path("/"))
}

pub fn oauth_state_cookie(state: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, state.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(OAUTH_STATE_MAX_AGE_SECS))
        .build()
}

pub fn clear_oauth_state_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((OAUTH_STATE_COOKIE, "")).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use std::time::Duration;

    fn config() -> SessionConfig {
        SessionConfig {
            cookie_name: "sid".to_string(),
            max_age: Duration::from_secs(3600),
            secure: true,
        }
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(&config(), &SessionToken::new("tok"));
        assert_eq!(cookie.name(), "sid");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn test_session_token_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "other=1; sid=abc".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(session_token(&jar, &config()), Some(SessionToken::new("abc")));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "sid=".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(session_token(&jar, &config()), None);
    }

    #[test]
    fn test_oauth_state_cookie_is_short_lived() {
        let cookie = oauth_state_cookie("state-1", false);
        assert_eq!(cookie.name(), OAUTH_STATE_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(10)));
    }

    #[test]
    fn test_context_without_record() {
        let ctx = SessionContext::default();
        assert!(ctx.principal().is_none());
        assert!(!ctx.has_session());
    }

    #[test]
    fn test_session_cookie_max_age_never_negative() {
        let config = SessionConfig {
            max_age: Duration::from_secs(u64::MAX),
            ..config()
        };
        let cookie = session_cookie(&config, &SessionToken::new("tok"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(i64::MAX)));
    }
}
