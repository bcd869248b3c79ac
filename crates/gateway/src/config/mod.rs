// Server configuration loaded from environment variables.
// Decision: Auth routes live under BASE_PATH (default "/api") so the frontend can proxy one prefix
// Decision: APP_ENV=production switches cookies to Secure

use crate::auth::config::AuthConfig;

/// Deployment environment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port (binds 0.0.0.0)
    pub port: u16,
    /// Route prefix for the auth endpoints, normalized (empty or "/x")
    pub base_path: String,
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            base_path: "/api".to_string(),
            environment: Environment::Development,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "PORT is not a valid port, using 8000");
                8000
            }),
            None => 8000,
        };

        let base_path = lookup("BASE_PATH")
            .map(|s| normalize_base_path(&s))
            .unwrap_or_else(|| "/api".to_string());

        let environment = lookup("APP_ENV")
            .map(|s| Environment::from_str(&s))
            .unwrap_or_default();

        Self {
            port,
            base_path,
            environment,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Everything the gateway reads from the environment at startup
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let server = ServerConfig::from_env();
        let auth = AuthConfig::from_env(&server);
        Self { server, auth }
    }
}

/// Normalize a route prefix: leading slash, no trailing slash, "" for root
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, 8000);
        assert_eq!(config.base_path, "/api");
        assert!(!config.is_production());
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "9100"),
            ("BASE_PATH", "v1/"),
            ("APP_ENV", "Production"),
        ]));
        assert_eq!(config.port, 9100);
        assert_eq!(config.base_path, "/v1");
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")]));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/api"), "/api");
        assert_eq!(normalize_base_path("api"), "/api");
        assert_eq!(normalize_base_path("/api/"), "/api");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path(" /api/v2 "), "/api/v2");
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("PROD"), Environment::Production);
        assert_eq!(Environment::from_str("staging"), Environment::Development);
    }
}
