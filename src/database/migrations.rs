use sqlx::PgPool;
use tracing::{error, info};

use crate::error::AppError;

pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            error!("Migration failed: {}", e);
            AppError::DatabaseError(format!("Migration failed: {}", e))
        })?;

    info!("Database migrations completed");
    Ok(())
}
