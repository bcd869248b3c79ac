// Authentication HTTP routes
// Decision: Routes are relative ("/auth/*"); the app nests them under BASE_PATH
// Decision: Successful logins always start a fresh session (old token invalidated)

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use teamspace_core::{LoginOutcome, OAuthCallback, Principal, SessionToken};
use utoipa::{IntoParams, ToSchema};

use super::{
    local::INVALID_CREDENTIALS,
    middleware::{
        clear_oauth_state_cookie, clear_session_cookie, oauth_state_cookie, session_cookie,
        session_token, GatewayState, SessionContext, OAUTH_STATE_COOKIE,
    },
    redirect::{failure_url, CallbackOutcome},
    tokens::{generate_oauth_state, tokens_match},
};
use crate::api::{
    common::{ErrorResponse, FieldError, MessageResponse},
    validation::{validate_register_request, RegisterRequest},
};
use crate::error::{AppError, OAUTH_NOT_CONFIGURED};

/// Login request. Missing fields deserialize as empty strings.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: Principal,
}

/// Login status diagnostic
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatusResponse {
    pub is_logged_in: bool,
    pub user: Option<Principal>,
    /// Whether the request carried a live session
    pub session: bool,
    /// Raw Cookie header
    pub cookies: Option<String>,
}

/// Query parameters Google appends to the callback URL
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GoogleCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user denied consent
    pub error: Option<String>,
}

/// Create auth routes
pub fn routes(state: GatewayState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/google", get(google_redirect))
        .route("/auth/google/callback", get(google_callback))
        .route("/auth/login-status", get(login_status))
        .with_state(state)
}

/// POST /auth/register - Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Validation failed or email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<GatewayState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Malformed registration body");
            return Err(AppError::Validation(vec![FieldError::new(
                "body",
                "Request body must be a JSON object",
            )]));
        }
    };

    let input = validate_register_request(&req).map_err(AppError::Validation)?;
    let principal = state.registration.register(input).await?;

    tracing::info!(user.id = %principal.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully")),
    ))
}

/// POST /auth/login - Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 500, description = "Verifier or session store failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<GatewayState>,
    jar: CookieJar,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, AppError> {
    let req = payload.map(|Json(req)| req).unwrap_or_default();
    let strategy = state.credentials.name();

    let principal = match state.credentials.verify(&req.email, &req.password).await? {
        LoginOutcome::Success(principal) => principal,
        LoginOutcome::Failure { reason } => {
            tracing::info!(auth.strategy = strategy, auth.outcome = "failure", "Login rejected");
            // Bad credentials render as a plain { message } body
            let message = reason.unwrap_or_else(|| INVALID_CREDENTIALS.to_string());
            return Ok((StatusCode::UNAUTHORIZED, Json(MessageResponse::new(message))).into_response());
        }
    };

    let jar = start_session(&state, jar, &principal).await?;

    tracing::info!(
        auth.strategy = strategy,
        auth.outcome = "success",
        user.id = %principal.id,
        "User logged in"
    );
    Ok((
        jar,
        Json(LoginResponse {
            message: "Logged in successfully".to_string(),
            user: principal,
        }),
    )
        .into_response())
}

/// POST /auth/logout - End the current session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out; session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<GatewayState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(token) = session_token(&jar, state.session_config()) {
        if let Err(e) = state.sessions.detach(&token).await {
            tracing::error!(error = %format!("{:#}", e), "Logout error");
        }
        if let Err(e) = state.sessions.invalidate(&token).await {
            tracing::error!(error = %format!("{:#}", e), "Failed to drop session on logout");
        }
    }

    let jar = clear_session_cookie(jar, state.session_config());
    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// GET /auth/google - Redirect to Google consent
#[utoipa::path(
    get,
    path = "/api/auth/google",
    responses(
        (status = 303, description = "Redirect to Google; oauth_state cookie set"),
        (status = 503, description = "Google login is not configured", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn google_redirect(
    State(state): State<GatewayState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable {
            message: "Google login is not configured".to_string(),
            code: OAUTH_NOT_CONFIGURED,
        })?;

    // Generate a random state for CSRF protection
    let oauth_state = generate_oauth_state();
    let url = google.authorization_url(&oauth_state)?;

    let jar = jar.add(oauth_state_cookie(&oauth_state, state.session_config().secure));
    Ok((jar, Redirect::to(&url)))
}

/// GET /auth/google/callback - OAuth callback
#[utoipa::path(
    get,
    path = "/api/auth/google/callback",
    params(GoogleCallbackQuery),
    responses(
        (status = 303, description = "Redirect to the frontend workspace or failure page"),
        (status = 500, description = "Session store failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn google_callback(
    State(state): State<GatewayState>,
    Query(query): Query<GoogleCallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let frontend = &state.config.frontend;
    let expected_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let jar = clear_oauth_state_cookie(jar);

    let Some(google) = state.google.as_ref() else {
        tracing::warn!("Google callback hit while Google login is not configured");
        return Ok((jar, Redirect::to(&failure_url(frontend))));
    };

    let code = match check_callback(&query, expected_state.as_deref()) {
        Ok(code) => code,
        Err(reason) => {
            tracing::warn!(auth.strategy = google.name(), reason, "OAuth callback rejected");
            return Ok((jar, Redirect::to(&failure_url(frontend))));
        }
    };

    let principal = match google.verify(&OAuthCallback { code }).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::error!(
                auth.strategy = google.name(),
                error = %format!("{:#}", e),
                "OAuth exchange failed"
            );
            return Ok((jar, Redirect::to(&failure_url(frontend))));
        }
    };

    let jar = match &principal {
        Some(principal) => start_session(&state, jar, principal).await?,
        None => jar,
    };

    let outcome = CallbackOutcome::resolve(principal.as_ref());
    match &outcome {
        CallbackOutcome::NoUser => tracing::info!("OAuth login resolved no user"),
        CallbackOutcome::NoWorkspace => tracing::info!("OAuth user has no current workspace"),
        CallbackOutcome::Workspace(id) => {
            tracing::debug!(workspace.id = %id, "OAuth login redirecting to workspace")
        }
    }

    Ok((jar, Redirect::to(&outcome.target_url(frontend))))
}

/// GET /auth/login-status - Report what the server sees for this request
#[utoipa::path(
    get,
    path = "/api/auth/login-status",
    responses(
        (status = 200, description = "Current login state", body = LoginStatusResponse)
    ),
    tag = "auth"
)]
pub async fn login_status(session: SessionContext) -> Json<LoginStatusResponse> {
    let user = session.principal().cloned();
    Json(LoginStatusResponse {
        is_logged_in: user.is_some(),
        user,
        session: session.has_session(),
        cookies: session.cookie_header,
    })
}

/// Validate provider parameters and CSRF state, returning the authorization code
fn check_callback(query: &GoogleCallbackQuery, expected_state: Option<&str>) -> Result<String, &'static str> {
    if query.error.is_some() {
        return Err("provider returned an error");
    }

    let (Some(expected), Some(received)) = (expected_state, query.state.as_deref()) else {
        return Err("missing state");
    };
    if !tokens_match(expected, received) {
        return Err("state mismatch");
    }

    match query.code.as_deref() {
        Some(code) if !code.is_empty() => Ok(code.to_string()),
        _ => Err("missing code"),
    }
}

/// Replace whatever session the request carried with a new one for `principal`
async fn start_session(
    state: &GatewayState,
    jar: CookieJar,
    principal: &Principal,
) -> Result<CookieJar, AppError> {
    if let Some(old) = session_token(&jar, state.session_config()) {
        drop_session(state, &old).await;
    }

    let token = state
        .sessions
        .attach(principal.clone())
        .await
        .map_err(AppError::Session)?;

    Ok(jar.add(session_cookie(state.session_config(), &token)))
}

async fn drop_session(state: &GatewayState, token: &SessionToken) {
    if let Err(e) = state.sessions.invalidate(token).await {
        tracing::warn!(error = %format!("{:#}", e), "Failed to drop previous session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(code: Option<&str>, state: Option<&str>, error: Option<&str>) -> GoogleCallbackQuery {
        GoogleCallbackQuery {
            code: code.map(String::from),
            state: state.map(String::from),
            error: error.map(String::from),
        }
    }

    #[test]
    fn test_check_callback_accepts_matching_state() {
        let q = query(Some("c1"), Some("s1"), None);
        assert_eq!(check_callback(&q, Some("s1")), Ok("c1".to_string()));
    }

    #[test]
    fn test_check_callback_rejections() {
        assert_eq!(
            check_callback(&query(Some("c1"), Some("s1"), None), Some("s2")),
            Err("state mismatch")
        );
        assert_eq!(
            check_callback(&query(Some("c1"), None, None), Some("s1")),
            Err("missing state")
        );
        assert_eq!(
            check_callback(&query(Some("c1"), Some("s1"), None), None),
            Err("missing state")
        );
        assert_eq!(
            check_callback(&query(None, Some("s1"), None), Some("s1")),
            Err("missing code")
        );
        assert_eq!(
            check_callback(&query(Some("c1"), Some("s1"), Some("access_denied")), Some("s1")),
            Err("provider returned an error")
        );
    }

    #[test]
    fn test_login_status_serializes_camel_case() {
        let json = serde_json::to_value(LoginStatusResponse {
            is_logged_in: false,
            user: None,
            session: false,
            cookies: None,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"isLoggedIn": false, "user": null, "session": false, "cookies": null})
        );
    }
}
