// Gateway error type
// Decision: One error enum for all handlers, rendered as { message, errorCode }
// Decision: 5xx responses never echo the underlying error; it is logged instead

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::common::{ErrorResponse, FieldError};
use teamspace_core::RegistrationError;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const AUTH_EMAIL_ALREADY_EXISTS: &str = "AUTH_EMAIL_ALREADY_EXISTS";
pub const OAUTH_NOT_CONFIGURED: &str = "OAUTH_NOT_CONFIGURED";
pub const SESSION_ERROR: &str = "SESSION_ERROR";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{message}")]
    BadRequest {
        message: String,
        code: &'static str,
    },

    #[error("{message}")]
    ServiceUnavailable {
        message: String,
        code: &'static str,
    },

    /// Session store failed to attach/load/drop a session
    #[error("session error: {0:#}")]
    Session(anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Session(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => VALIDATION_ERROR,
            AppError::BadRequest { code, .. } | AppError::ServiceUnavailable { code, .. } => *code,
            AppError::Session(_) => SESSION_ERROR,
            AppError::Internal(_) => INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::EmailAlreadyExists => AppError::BadRequest {
                message: RegistrationError::EmailAlreadyExists.to_string(),
                code: AUTH_EMAIL_ALREADY_EXISTS,
            },
            RegistrationError::Other(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match self {
            AppError::Validation(errors) => {
                ErrorResponse::new("Validation failed", code).with_errors(errors)
            }
            AppError::Session(ref e) | AppError::Internal(ref e) => {
                tracing::error!(error = %format!("{:#}", e), code, "Request failed");
                ErrorResponse::new("Internal Server Error", code)
            }
            other => ErrorResponse::new(other.to_string(), code),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Session(anyhow::anyhow!("store down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ServiceUnavailable {
                message: "off".into(),
                code: OAUTH_NOT_CONFIGURED
            }
            .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_registration_error_mapping() {
        let err: AppError = RegistrationError::EmailAlreadyExists.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), AUTH_EMAIL_ALREADY_EXISTS);
        assert_eq!(err.to_string(), "Email already exists");

        let err: AppError = RegistrationError::Other(anyhow::anyhow!("db")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), INTERNAL_SERVER_ERROR);
    }
}
