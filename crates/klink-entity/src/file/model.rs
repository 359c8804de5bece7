//! File metadata row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Metadata of an object stored under `<folder>/<name>`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique identifier.
    pub id: Uuid,
    /// Random stored name, including the extension.
    pub name: String,
    /// Client-supplied file name.
    pub original_name: Option<String>,
    /// MIME type.
    pub mime_type: String,
    /// Storage folder.
    pub folder: String,
    /// Size after processing, in bytes.
    pub size_bytes: i64,
    /// Uploader.
    pub created_by: Option<Uuid>,
    /// Upload time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl File {
    /// Object key within the storage provider.
    pub fn storage_key(&self) -> String {
        format!("{}/{}", self.folder, self.name)
    }
}

/// Metadata written after an object has been stored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFile {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    pub mime_type: String,
    pub folder: String,
    pub size_bytes: i64,
}
