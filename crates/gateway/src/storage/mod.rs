// Storage layer for the auth gateway
// Decision: In-memory only; durable persistence sits behind the core traits
//
// - InMemoryDatabase: users, login accounts and workspaces
// - InMemorySessionStore: implements SessionStore keyed by token digest
// - password: Argon2id hashing for local accounts

pub mod memory;
pub mod models;
pub mod password;
pub mod sessions;

pub use memory::{InMemoryDatabase, DEFAULT_WORKSPACE_NAME};
pub use models::*;
pub use sessions::InMemorySessionStore;
