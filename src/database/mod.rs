use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;

pub mod models;

pub mod admins;
pub mod content;
pub mod leagues;
pub mod notifications;
pub mod players;
pub mod reels;
pub mod roles;
pub mod seed;
pub mod subscribers;
pub mod teams;
pub mod users;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connection pool holder. The pool is created lazily on first use so the
/// server can start (and answer /health as degraded) without a reachable
/// database; once created it is cached for the process lifetime.
pub struct Database {
    config: DatabaseConfig,
    pool: OnceCell<PgPool>,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// Get the shared pool, connecting on first call
    pub async fn pool(&self) -> Result<PgPool, DatabaseError> {
        let pool = self
            .pool
            .get_or_try_init(|| self.connect())
            .await?;
        Ok(pool.clone())
    }

    async fn connect(&self) -> Result<PgPool, DatabaseError> {
        let connection_string = self.connection_string()?;

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(Duration::from_secs(self.config.connection_timeout_secs))
            .connect(&connection_string)
            .await?;

        info!("Created database pool");
        Ok(pool)
    }

    /// Build the connection string, applying the optional database name
    /// override to the DATABASE_URL path
    fn connection_string(&self) -> Result<String, DatabaseError> {
        let base = self
            .config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if let Some(name) = &self.config.database_name {
            url.set_path(&format!("/{}", name));
        }
        Ok(url.into())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>, name: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            url: url.map(String::from),
            database_name: name.map(String::from),
            max_connections: 5,
            connection_timeout_secs: 5,
        }
    }

    #[test]
    fn test_connection_string_requires_url() {
        let db = Database::new(config(None, None));
        assert!(matches!(
            db.connection_string(),
            Err(DatabaseError::ConfigMissing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_database_name_override() {
        let db = Database::new(config(
            Some("postgres://gambit:pw@localhost:5432/gambit"),
            Some("gambit_test"),
        ));
        let conn = db.connection_string().unwrap();
        assert!(conn.ends_with("/gambit_test"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let db = Database::new(config(Some("not a url"), None));
        assert!(matches!(
            db.connection_string(),
            Err(DatabaseError::InvalidDatabaseUrl)
        ));
    }
}
