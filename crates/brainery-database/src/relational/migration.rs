//! Database migration runner.

use sqlx::SqlitePool;
use tracing::info;

use brainery_core::error::AppError;

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::store("Failed to run migrations", e))?;

    info!("Database migrations completed successfully");
    Ok(())
}
