//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lowercased, unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the password last changed.
    pub password_changed_at: Option<DateTime<Utc>>,
    /// SHA-256 hex digest of the outstanding reset token.
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    /// Expiry of the outstanding reset token.
    #[serde(skip_serializing)]
    pub password_reset_expires: Option<DateTime<Utc>>,
    /// Assigned role.
    pub role_id: Option<Uuid>,
    /// Profile image.
    pub image_id: Option<Uuid>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the password changed after a token issued at `issued_at`
    /// (seconds since the epoch) was signed.
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        self.password_changed_at
            .is_some_and(|changed| issued_at < changed.timestamp())
    }
}
