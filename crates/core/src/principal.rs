// Principal domain types
//
// These types describe who is logged in and what a verifier hands back.
// Used by the gateway handlers and by every strategy implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Authenticated user entity attached to a session.
///
/// Serialized in camelCase because the frontend reads it verbatim from the
/// login response and the login-status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Unique identifier for the user.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email address.
    pub email: String,
    /// Avatar URL, usually supplied by an OAuth provider.
    pub profile_picture: Option<String>,
    /// Workspace the user last worked in. Drives the post-login redirect.
    pub current_workspace: Option<String>,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Last successful login, if recorded.
    pub last_login: Option<DateTime<Utc>>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Minimal active principal, mostly useful for stores and tests.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            profile_picture: None,
            current_workspace: None,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_workspace(mut self, workspace_id: impl Into<String>) -> Self {
        self.current_workspace = Some(workspace_id.into());
        self
    }
}

/// Result of checking local credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched this principal.
    Success(Principal),
    /// Credentials were rejected. `reason` is shown to the user when present.
    Failure { reason: Option<String> },
}

impl LoginOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: Some(reason.into()),
        }
    }
}

/// Registration payload after validation.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

// Manual Debug so the password never ends up in logs
impl std::fmt::Debug for RegisterUserInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
