// In-memory user storage
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
// Decision: One lock over all tables so a user, its account and its workspace appear together
//
// Durable storage is owned by the surrounding platform; this backend lets the
// gateway run standalone and backs the default strategies.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use teamspace_core::RegistrationError;
use uuid::Uuid;

use super::models::*;

/// Name given to the workspace every new user starts with
pub const DEFAULT_WORKSPACE_NAME: &str = "My Workspace";

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRow>,
    accounts: HashMap<Uuid, AccountRow>,
    workspaces: HashMap<Uuid, WorkspaceRow>,
}

impl Tables {
    fn user_by_email(&self, email: &str) -> Option<&UserRow> {
        self.users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }
}

/// In-memory database
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    tables: RwLock<Tables>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Users
    // ============================================

    /// Create a user, its first login account and a personal workspace.
    ///
    /// Fails with `EmailAlreadyExists` if the email (case-insensitive) is taken.
    pub fn create_user_with_workspace(&self, input: CreateUserRow) -> Result<UserRow, RegistrationError> {
        let mut tables = self.tables.write();

        if tables.user_by_email(&input.email).is_some() {
            return Err(RegistrationError::EmailAlreadyExists);
        }

        let now = Self::now();
        let user_id = Uuid::now_v7();
        let workspace_id = Uuid::now_v7();

        let workspace = WorkspaceRow {
            id: workspace_id,
            name: DEFAULT_WORKSPACE_NAME.to_string(),
            description: Some(format!("Workspace created for {}", input.name)),
            owner_id: user_id,
            created_at: now,
        };

        let account = AccountRow {
            id: Uuid::now_v7(),
            user_id,
            provider: input.provider,
            provider_id: input.provider_id,
            created_at: now,
        };

        let user = UserRow {
            id: user_id,
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            profile_picture: input.profile_picture,
            current_workspace: Some(workspace_id),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        tables.workspaces.insert(workspace.id, workspace);
        tables.accounts.insert(account.id, account);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<UserRow> {
        self.tables.read().user_by_email(email).cloned()
    }

    /// Find the user linked to a provider identity
    pub fn get_user_by_account(&self, provider: AccountProvider, provider_id: &str) -> Option<UserRow> {
        let tables = self.tables.read();
        tables
            .accounts
            .values()
            .find(|a| a.provider == provider && a.provider_id == provider_id)
            .and_then(|a| tables.users.get(&a.user_id))
            .cloned()
    }

    /// Attach another login provider to an existing user.
    ///
    /// Returns the existing link if this identity is already attached.
    pub fn link_account(&self, user_id: Uuid, provider: AccountProvider, provider_id: &str) -> Option<AccountRow> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user_id) {
            return None;
        }

        if let Some(existing) = tables
            .accounts
            .values()
            .find(|a| a.provider == provider && a.provider_id == provider_id)
        {
            return Some(existing.clone());
        }

        let account = AccountRow {
            id: Uuid::now_v7(),
            user_id,
            provider,
            provider_id: provider_id.to_string(),
            created_at: Self::now(),
        };
        tables.accounts.insert(account.id, account.clone());
        Some(account)
    }

    /// Fill in a missing avatar, e.g. from an OAuth profile
    pub fn set_profile_picture_if_missing(&self, user_id: Uuid, picture: &str) -> Option<UserRow> {
        let mut tables = self.tables.write();
        let user = tables.users.get_mut(&user_id)?;
        if user.profile_picture.is_none() {
            user.profile_picture = Some(picture.to_string());
            user.updated_at = Self::now();
        }
        Some(user.clone())
    }

    /// Stamp a successful login
    pub fn touch_last_login(&self, user_id: Uuid) -> Option<UserRow> {
        let mut tables = self.tables.write();
        let user = tables.users.get_mut(&user_id)?;
        user.last_login = Some(Self::now());
        Some(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> CreateUserRow {
        CreateUserRow {
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: Some("hash".to_string()),
            profile_picture: None,
            provider: AccountProvider::Email,
            provider_id: email.to_string(),
        }
    }

    #[test]
    fn test_create_user_creates_workspace() {
        let db = InMemoryDatabase::new();
        let user = db.create_user_with_workspace(new_user("ada@example.com")).unwrap();

        let workspace_id = user.current_workspace.expect("workspace assigned");
        let tables = db.tables.read();
        let workspace = tables.workspaces.get(&workspace_id).unwrap();
        assert_eq!(workspace.owner_id, user.id);
        assert_eq!(workspace.name, DEFAULT_WORKSPACE_NAME);
        assert_eq!(tables.workspaces.len(), 1);
        drop(tables);

        let by_account = db
            .get_user_by_account(AccountProvider::Email, "ada@example.com")
            .unwrap();
        assert_eq!(by_account.id, user.id);
    }

    #[test]
    fn test_duplicate_email_rejected_case_insensitively() {
        let db = InMemoryDatabase::new();
        db.create_user_with_workspace(new_user("ada@example.com")).unwrap();

        let err = db
            .create_user_with_workspace(new_user("ADA@example.com"))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::EmailAlreadyExists));
        assert!(db.get_user_by_email("Ada@Example.com").is_some());
    }

    #[test]
    fn test_link_account_is_idempotent() {
        let db = InMemoryDatabase::new();
        let user = db.create_user_with_workspace(new_user("ada@example.com")).unwrap();

        let first = db.link_account(user.id, AccountProvider::Google, "sub-1").unwrap();
        let second = db.link_account(user.id, AccountProvider::Google, "sub-1").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            db.get_user_by_account(AccountProvider::Google, "sub-1").unwrap().id,
            user.id
        );

        assert!(db.link_account(Uuid::now_v7(), AccountProvider::Google, "sub-2").is_none());
    }

    #[test]
    fn test_profile_picture_only_filled_once() {
        let db = InMemoryDatabase::new();
        let user = db.create_user_with_workspace(new_user("ada@example.com")).unwrap();

        let updated = db.set_profile_picture_if_missing(user.id, "https://img/1").unwrap();
        assert_eq!(updated.profile_picture.as_deref(), Some("https://img/1"));
        let again = db.set_profile_picture_if_missing(user.id, "https://img/2").unwrap();
        assert_eq!(again.profile_picture.as_deref(), Some("https://img/1"));
    }

    #[test]
    fn test_touch_last_login() {
        let db = InMemoryDatabase::new();
        let user = db.create_user_with_workspace(new_user("ada@example.com")).unwrap();
        assert!(user.last_login.is_none());

        let touched = db.touch_last_login(user.id).unwrap();
        assert!(touched.last_login.is_some());
        assert!(db.touch_last_login(Uuid::now_v7()).is_none());
    }

    #[test]
    fn test_unknown_lookups() {
        let db = InMemoryDatabase::new();
        assert!(db.get_user_by_email("nobody@example.com").is_none());
        assert!(db.get_user_by_account(AccountProvider::Google, "x").is_none());
    }
}
