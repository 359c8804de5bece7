//! File metadata lookups scoped to their uploader.

use sqlx::PgPool;
use uuid::Uuid;

use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_entity::file::File;

use crate::error::{WriteOp, map_sqlx_error};

/// Repository for typed file queries.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file uploaded by `owner`.
    pub async fn find_owned(&self, id: Uuid, owner: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Delete a file row.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| map_sqlx_error(e, "files", WriteOp::Delete))
    }
}
