// Collaborator traits
//
// The gateway holds each collaborator as `Arc<dyn Trait>` so strategies and
// stores can be swapped without touching the HTTP layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::error::RegistrationError;
use crate::principal::{LoginOutcome, Principal, RegisterUserInput};
use crate::session::{SessionRecord, SessionToken};

// ============================================================================
// Verification strategies
// ============================================================================

/// Checks an identifier/secret pair (local email + password login).
///
/// Rejected credentials are a `LoginOutcome::Failure`, not an error. Errors
/// are reserved for the verifier itself failing (storage down, bad hash).
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Result<LoginOutcome>;

    /// Human-readable name for logging/debugging.
    fn name(&self) -> &'static str {
        "local"
    }
}

/// Parameters a provider sends back to the callback URL, already checked
/// for CSRF state by the gateway.
#[derive(Clone)]
pub struct OAuthCallback {
    /// Authorization code to exchange with the provider.
    pub code: String,
}

impl std::fmt::Debug for OAuthCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCallback")
            .field("code", &"<redacted>")
            .finish()
    }
}

/// Third-party login (authorization-code flow).
///
/// `verify` returns `Ok(None)` when the provider flow succeeded but no
/// principal could be resolved from it. An `Err` means the exchange itself
/// failed.
#[async_trait]
pub trait OAuthStrategy: Send + Sync {
    /// Provider consent URL carrying the given CSRF state.
    fn authorization_url(&self, state: &str) -> Result<String>;

    async fn verify(&self, callback: &OAuthCallback) -> Result<Option<Principal>>;

    fn name(&self) -> &'static str;
}

// ============================================================================
// Registration
// ============================================================================

/// Creates new accounts from validated input.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn register(&self, input: RegisterUserInput) -> Result<Principal, RegistrationError>;
}

// ============================================================================
// Sessions
// ============================================================================

/// Server-side session storage keyed by an opaque token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session holding `principal` and return its token.
    async fn attach(&self, principal: Principal) -> Result<SessionToken>;

    /// Look up a live session. Expired or unknown tokens yield `None`.
    async fn load(&self, token: &SessionToken) -> Result<Option<SessionRecord>>;

    /// Remove the principal from a session, keeping the session itself.
    async fn detach(&self, token: &SessionToken) -> Result<()>;

    /// Drop the session entirely. Unknown tokens are not an error.
    async fn invalidate(&self, token: &SessionToken) -> Result<()>;
}
