// Storage row types

use chrono::{DateTime, Utc};
use teamspace_core::Principal;
use uuid::Uuid;

/// How an account authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountProvider {
    /// Email + password
    Email,
    Google,
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// PHC hash; `None` for accounts created through OAuth
    pub password_hash: Option<String>,
    pub profile_picture: Option<String>,
    pub current_workspace: Option<Uuid>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Public view of the user, without the password hash
    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id.to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            profile_picture: self.profile_picture.clone(),
            current_workspace: self.current_workspace.map(|id| id.to_string()),
            is_active: self.is_active,
            last_login: self.last_login,
            created_at: self.created_at,
        }
    }
}

/// Link between a user and a login provider
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: AccountProvider,
    /// Provider-side identifier (email for local accounts, `sub` for Google)
    pub provider_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct WorkspaceRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user together with its first account and workspace
#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub profile_picture: Option<String>,
    pub provider: AccountProvider,
    pub provider_id: String,
}
