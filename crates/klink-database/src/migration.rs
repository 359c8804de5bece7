//! Database migration runner.

use sqlx::PgPool;
use tracing::{info, warn};

use klink_core::error::{AppError, ErrorKind};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// Drop every table in the `public` schema and migrate from scratch.
pub async fn reset_database(pool: &PgPool) -> Result<(), AppError> {
    warn!("Dropping the public schema");

    for statement in ["DROP SCHEMA IF EXISTS public CASCADE", "CREATE SCHEMA public"] {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to reset schema", e)
        })?;
    }

    run_migrations(pool).await
}
