//! Permission queries used by seeding.

use sqlx::PgPool;
use uuid::Uuid;

use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_entity::permission::{CreatePermission, Permission};

use crate::error::{WriteOp, map_sqlx_error};

/// Repository for typed permission queries.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every permission.
    pub async fn find_all(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY key, action")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list permissions", e)
            })
    }

    /// Insert a permission, or refresh the name and description of the
    /// existing `(key, action)` pair.
    pub async fn upsert(&self, data: &CreatePermission) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(
            "INSERT INTO permissions (id, name, key, action, description) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (key, action) DO UPDATE \
             SET name = EXCLUDED.name, description = EXCLUDED.description, updated_at = NOW() \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(&data.key)
        .bind(&data.action)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "permissions", WriteOp::Write))
    }

    /// Delete every permission and detach them from roles.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("UPDATE roles SET permission_ids = '{}', updated_at = NOW()")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "roles", WriteOp::Write))?;
        let deleted = sqlx::query("DELETE FROM permissions")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "permissions", WriteOp::Delete))?
            .rows_affected();

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;
        Ok(deleted)
    }
}
