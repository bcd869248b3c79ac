// Input validation for auth APIs
//
// Registration payloads are checked here before the registration service is
// touched, so a rejected request has no side effects. All failing fields are
// reported at once.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use teamspace_core::RegisterUserInput;
use utoipa::ToSchema;

use super::common::FieldError;

// =============================================================================
// Limits
// =============================================================================

/// Maximum length (chars) for name and email.
pub const MAX_FIELD_CHARS: usize = 255;

/// Minimum password length (chars).
pub const MIN_PASSWORD_CHARS: usize = 4;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex compiles")
});

// =============================================================================
// Request
// =============================================================================

/// Raw registration payload. Every field is optional at the JSON level so
/// that missing fields surface as validation errors instead of a 422.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// =============================================================================
// Validation Functions
// =============================================================================

fn required<'a>(field: &str, value: Option<&'a str>, errors: &mut Vec<FieldError>) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(FieldError::new(field, format!("{} is required", capitalize(field))));
            None
        }
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn check_max(field: &str, value: &str, errors: &mut Vec<FieldError>) -> bool {
    if value.chars().count() > MAX_FIELD_CHARS {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters", capitalize(field), MAX_FIELD_CHARS),
        ));
        return false;
    }
    true
}

/// Validate an email address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate a registration payload, trimming all fields.
pub fn validate_register_request(req: &RegisterRequest) -> Result<RegisterUserInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = required("name", req.name.as_deref(), &mut errors)
        .filter(|name| check_max("name", name, &mut errors));

    let email = required("email", req.email.as_deref(), &mut errors)
        .filter(|email| check_max("email", email, &mut errors))
        .filter(|email| {
            let ok = is_valid_email(email);
            if !ok {
                errors.push(FieldError::new("email", "Invalid email address"));
            }
            ok
        });

    let password = required("password", req.password.as_deref(), &mut errors).filter(|password| {
        let len = password.chars().count();
        if len < MIN_PASSWORD_CHARS {
            errors.push(FieldError::new(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_CHARS),
            ));
            false
        } else {
            check_max("password", password, &mut errors)
        }
    });

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) if errors.is_empty() => Ok(RegisterUserInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }),
        _ => {
            tracing::warn!(
                fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "Registration payload rejected"
            );
            Err(errors)
        }
    }
}
