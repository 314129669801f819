use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

pub async fn establish_connection(database_url: &str) -> Result<PgPool, AppError> {
    establish_connection_with_config(database_url, DatabaseConfig::default()).await
}

pub async fn establish_connection_with_config(
    database_url: &str,
    config: DatabaseConfig,
) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            AppError::DatabaseError(format!("Connection failed: {}", e))
        })?;

    info!(
        "Database connection established with {} max connections",
        config.max_connections
    );
    Ok(pool)
}

pub async fn test_connection(pool: &PgPool) -> Result<(), AppError> {
    let test_timeout = Duration::from_secs(5);

    timeout(test_timeout, async {
        sqlx::query("SELECT 1 as test_value").fetch_one(pool).await
    })
    .await
    .map_err(|_| AppError::DatabaseError("Connection test timed out".to_string()))?
    .map_err(|e| AppError::DatabaseError(format!("Connection test failed: {}", e)))?;

    Ok(())
}
