//! Role lookups used by signup, authorization, and seeding.

use sqlx::PgPool;
use uuid::Uuid;

use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_entity::permission::Permission;
use klink_entity::role::{CreateRole, Role};

use crate::error::{WriteOp, map_sqlx_error};

/// Repository for typed role queries.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a role by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role", e))
    }

    /// The oldest role of the given type, used as the signup default.
    pub async fn find_first_by_type(&self, role_type: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(
            "SELECT * FROM roles WHERE type = $1 ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .bind(role_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role by type", e))
    }

    /// Load the permissions granted by a role.
    pub async fn find_permissions(&self, role: &Role) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE id = ANY($1) ORDER BY key, action",
        )
        .bind(&role.permission_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load role permissions", e)
        })
    }

    /// List every role.
    pub async fn find_all(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list roles", e))
    }

    /// Insert a role.
    pub async fn create(&self, data: &CreateRole) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name, type, description, permission_ids) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&data.name)
        .bind(&data.role_type)
        .bind(&data.description)
        .bind(&data.permission_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "roles", WriteOp::Write))
    }

    /// Delete every role. Fails with a conflict while users still hold one.
    pub async fn delete_all(&self) -> AppResult<u64> {
        sqlx::query("DELETE FROM roles")
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| map_sqlx_error(e, "roles", WriteOp::Delete))
    }
}
