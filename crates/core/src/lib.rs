// Teamspace Auth Core
//
// This crate defines the collaborators the auth gateway talks to, without
// committing to any storage or provider:
// - Principal: the authenticated user attached to a session
// - CredentialVerifier / OAuthStrategy: pluggable verification strategies
// - RegistrationService: uniqueness checks and persistence for new users
// - SessionStore: binds an opaque cookie token to a principal
//
// Key design decisions:
// - The gateway never builds a Principal itself; only verifiers and the
//   registration service produce one
// - Collaborator failures are plain anyhow errors; expected rejections
//   (bad credentials, duplicate email) are typed values

pub mod error;
pub mod principal;
pub mod session;
pub mod traits;

// Telemetry (tracing subscriber + optional OTLP export)
pub mod telemetry;

pub use error::RegistrationError;
pub use principal::{LoginOutcome, Principal, RegisterUserInput};
pub use session::{SessionRecord, SessionToken};
pub use traits::{CredentialVerifier, OAuthCallback, OAuthStrategy, RegistrationService, SessionStore};
