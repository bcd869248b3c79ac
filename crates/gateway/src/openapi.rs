// OpenAPI specification generation
//
// Used by the gateway (Swagger UI) and the export-openapi binary.

use crate::api::{common, validation};
use crate::auth::routes;
use crate::HealthResponse;
use teamspace_core::Principal;
use utoipa::OpenApi;

/// OpenAPI documentation for the auth gateway
#[derive(OpenApi)]
#[openapi(
    paths(
        routes::register,
        routes::login,
        routes::logout,
        routes::google_redirect,
        routes::google_callback,
        routes::login_status,
        crate::health,
    ),
    components(
        schemas(
            Principal,
            validation::RegisterRequest,
            routes::LoginRequest,
            routes::LoginResponse,
            routes::LoginStatusResponse,
            common::MessageResponse,
            common::ErrorResponse,
            common::FieldError,
            HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login, logout and Google OAuth"),
        (name = "health", description = "Liveness")
    ),
    info(
        title = "Teamspace Auth API",
        description = "Session-cookie authentication for Teamspace",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_auth_paths() {
        let json: serde_json::Value = serde_json::from_str(&ApiDoc::to_json().unwrap()).unwrap();
        let paths = json["paths"].as_object().unwrap();
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/auth/google",
            "/api/auth/google/callback",
            "/api/auth/login-status",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert!(json["components"]["schemas"]["Principal"].is_object());
    }
}
