use serde::{Deserialize, Serialize};
use std::env;

/// Process-wide configuration, built once at startup and carried in the
/// application state. Nothing here is mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL. Absence surfaces as 503 at request time, not a crash.
    pub url: Option<String>,
    /// Optional database name override applied to the URL path.
    pub database_name: Option<String>,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 signing secret. Empty means the token codec refuses to issue.
    pub jwt_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub cors_origins: Vec<String>,
}

const HOUR: i64 = 60 * 60;
const DAY: i64 = 24 * HOUR;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, specific env vars override after
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("GAMBIT_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("GAMBIT_DB_NAME") {
            if !v.trim().is_empty() {
                self.database.database_name = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_TTL_SECS") {
            self.security.access_token_ttl_secs =
                v.parse().unwrap_or(self.security.access_token_ttl_secs);
        }
        if let Ok(v) = env::var("JWT_REFRESH_TTL_SECS") {
            self.security.refresh_token_ttl_secs =
                v.parse().unwrap_or(self.security.refresh_token_ttl_secs);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn base(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig { port: 5000 },
            database: DatabaseConfig {
                url: None,
                database_name: None,
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_ttl_secs: HOUR,
                refresh_token_ttl_secs: 30 * DAY,
                cors_origins: vec![],
            },
        }
    }

    fn development() -> Self {
        let mut config = Self::base(Environment::Development);
        config.security.cors_origins = vec![
            "http://localhost:3000".to_string(),
            "http://localhost:5173".to_string(),
        ];
        config
    }

    fn staging() -> Self {
        let mut config = Self::base(Environment::Staging);
        config.database.max_connections = 20;
        config.database.connection_timeout_secs = 10;
        config.security.cors_origins = vec!["https://staging.gambitadmin.com".to_string()];
        config
    }

    fn production() -> Self {
        let mut config = Self::base(Environment::Production);
        config.database.max_connections = 50;
        config.database.connection_timeout_secs = 5;
        config.security.cors_origins = vec!["https://admin.gambitadmin.com".to_string()];
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.security.access_token_ttl_secs, 3600);
        assert_eq!(config.security.refresh_token_ttl_secs, 30 * 24 * 3600);
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_production_pool_sizing() {
        let config = AppConfig::production();
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.database.connection_timeout_secs, 5);
    }
}
