use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::token::TokenCodec;
use crate::config::AppConfig;
use crate::database::Database;
use crate::error::ApiError;

/// Shared application state, constructed once at startup and cloned into
/// every router. Read-only after construction.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<Database>,
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let tokens = TokenCodec::new(&config.security);
        let db = Database::new(config.database.clone());

        Self {
            config: Arc::new(config),
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }

    /// Acquire the shared pool, mapping connectivity problems to a 503
    pub async fn pool(&self) -> Result<PgPool, ApiError> {
        self.db.pool().await.map_err(|e| {
            tracing::error!("Database unavailable: {}", e);
            ApiError::service_unavailable("Database temporarily unavailable")
        })
    }
}
