// Common DTOs for public API
//
// These types are shared across the auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Plain `{ message }` body used by success responses and 401s.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One failed field in a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Request field name
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub message: String,
    /// Machine-readable error code (e.g. "VALIDATION_ERROR").
    pub error_code: String,
    /// Per-field details, present for validation errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: error_code.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("Nope", "SESSION_ERROR")).unwrap();
        assert_eq!(body["message"], "Nope");
        assert_eq!(body["errorCode"], "SESSION_ERROR");
        assert!(body.get("errors").is_none());
    }

    #[test]
    fn test_error_response_with_field_errors() {
        let body = serde_json::to_value(
            ErrorResponse::new("Validation failed", "VALIDATION_ERROR")
                .with_errors(vec![FieldError::new("email", "Invalid email address")]),
        )
        .unwrap();
        assert_eq!(body["errors"][0]["field"], "email");
        assert_eq!(body["errors"][0]["message"], "Invalid email address");
    }
}
