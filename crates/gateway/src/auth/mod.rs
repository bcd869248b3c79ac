// Authentication module
//
// Cookie sessions over pluggable verification strategies:
// - local: email + password against the user store
// - oauth: Google authorization-code flow
// - routes: register, login, logout, Google redirect/callback, login-status

pub mod config;
pub mod local;
pub mod middleware;
pub mod oauth;
pub mod redirect;
pub mod routes;
pub mod tokens;

pub use config::AuthConfig;
pub use local::LocalStrategy;
pub use middleware::{GatewayState, SessionContext};
pub use oauth::GoogleStrategy;
pub use routes::routes;
