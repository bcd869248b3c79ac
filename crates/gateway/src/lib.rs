// Teamspace Auth Gateway Library
// Decision: Router assembly lives here so the binary and integration tests share it
// Decision: Health and docs stay at the root; auth routes are nested under BASE_PATH

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use teamspace_core::OAuthStrategy;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

// Shared API types (envelopes, validation)
pub mod api;

// Authentication module
pub mod auth;

// Environment configuration
pub mod config;

pub mod error;

// Services layer
pub mod services;

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;

pub use auth::{AuthConfig, GatewayState};
pub use config::{GatewayConfig, ServerConfig};

use auth::{GoogleStrategy, LocalStrategy};
use openapi::ApiDoc;
use services::UserService;
use storage::{InMemoryDatabase, InMemorySessionStore};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "googleOAuth")]
    pub google_oauth: bool,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    google_oauth: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        google_oauth: state.google_oauth,
    })
}

/// Wire the default in-memory collaborators.
///
/// The session store is also returned so the caller can run the expiry sweep.
pub fn build_default_state(config: AuthConfig) -> Result<(GatewayState, Arc<InMemorySessionStore>)> {
    let db = Arc::new(InMemoryDatabase::new());
    let users = Arc::new(UserService::new(db.clone()));
    let sessions = Arc::new(InMemorySessionStore::new(config.session.max_age));

    let google: Option<Arc<dyn OAuthStrategy>> = match &config.google {
        Some(google_config) => Some(Arc::new(
            GoogleStrategy::new(google_config, users.clone())
                .context("Failed to initialize Google OAuth")?,
        )),
        None => None,
    };

    let state = GatewayState {
        config: Arc::new(config),
        sessions: sessions.clone(),
        credentials: Arc::new(LocalStrategy::new(db)),
        registration: users,
        google,
    };

    Ok((state, sessions))
}

/// Build the full application router
pub fn build_app(state: GatewayState, base_path: &str) -> Router {
    let health_state = HealthState {
        google_oauth: state.google.is_some(),
    };
    let frontend_origin = state.config.frontend.origin.clone();

    let mut app = Router::new().route("/health", get(health).with_state(health_state));

    // Apply BASE_PATH to the auth routes
    app = app.merge(build_router_with_prefix(auth::routes(state), base_path));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // The frontend calls us cross-origin with cookies
    let app = match frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::exact(origin))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                .allow_credentials(true),
        ),
        Err(_) => {
            tracing::warn!(origin = %frontend_origin, "FRONTEND_ORIGIN is not a valid header value, CORS disabled");
            app
        }
    };

    // Add tracing
    app.layer(TraceLayer::new_for_http())
}

/// Build router with optional route prefix
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    routes: Router<S>,
    prefix: &str,
) -> Router<S> {
    if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/auth/test", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_health_reports_google_status() {
        let (state, _) = build_default_state(AuthConfig::default()).unwrap();
        let app = build_app(state, "/api");

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["googleOAuth"], false);
    }

    #[tokio::test]
    async fn test_cors_allows_frontend_with_credentials() {
        let (state, _) = build_default_state(AuthConfig::default()).unwrap();
        let app = build_app(state, "/api");

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/auth/login")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }
}
