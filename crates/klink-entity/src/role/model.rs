//! Role row and write DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Role type given to accounts created through `signup/admin`.
pub const ADMIN_ROLE_TYPE: &str = "admin";
/// Role type given to accounts created through `signup/user`.
pub const USER_ROLE_TYPE: &str = "user";

/// A named set of permissions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Role type: `admin`, `user`, or a custom label.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub role_type: String,
    /// Description.
    pub description: String,
    /// Granted permissions.
    pub permission_ids: Vec<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /roles` and one entry of the role seed file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Please add a type"))]
    pub role_type: String,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: String,
    #[serde(default, alias = "permissions")]
    pub permission_ids: Vec<Uuid>,
}

/// Body of `PATCH /roles/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Please add a type"))]
    pub role_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: Option<String>,
    #[serde(default, alias = "permissions", skip_serializing_if = "Option::is_none")]
    pub permission_ids: Option<Vec<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_accepts_permissions_alias() {
        let id = Uuid::new_v4();
        let dto: CreateRole = serde_json::from_value(serde_json::json!({
            "name": "Editor",
            "type": "editor",
            "description": "Edits products",
            "permissions": [id],
        }))
        .unwrap();
        assert_eq!(dto.permission_ids, vec![id]);
        assert_eq!(dto.role_type, "editor");
    }

    #[test]
    fn test_create_serializes_type_column() {
        let dto = CreateRole {
            name: "Admin".into(),
            role_type: ADMIN_ROLE_TYPE.into(),
            description: "All access".into(),
            permission_ids: vec![],
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["type"], "admin");
        assert!(json.get("role_type").is_none());
    }
}
