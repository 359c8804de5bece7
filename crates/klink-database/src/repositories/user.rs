//! Queries on `users` that the generic repository does not cover.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_entity::user::User;

/// Repository for credential and password-reset queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Find the user holding an unexpired reset token with this digest.
    pub async fn find_by_reset_token(&self, token_digest: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users \
             WHERE password_reset_token = $1 AND password_reset_expires > NOW()",
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by reset token", e)
        })
    }

    /// Store (or clear, with `None`) a password reset token digest.
    pub async fn set_reset_token(
        &self,
        user_id: Uuid,
        token: Option<(&str, DateTime<Utc>)>,
    ) -> AppResult<()> {
        let (digest, expires) = token.unzip();
        sqlx::query(
            "UPDATE users SET password_reset_token = $2, password_reset_expires = $3, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(user_id)
        .bind(digest)
        .bind(expires)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store reset token", e))?;
        Ok(())
    }

    /// Replace the password hash, stamp the change, and drop any reset token.
    pub async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, password_changed_at = $3, \
             password_reset_token = NULL, password_reset_expires = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(password_hash)
        .bind(changed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }
}
