//! Permission row and write DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::action::PermissionAction;

/// A grant of one action on one resource key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique identifier.
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// Resource key, e.g. `product`.
    pub key: String,
    /// Action, one of `list|create|details|update|delete`.
    pub action: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    /// Whether this permission grants `action` on `key`.
    pub fn grants(&self, key: &str, action: PermissionAction) -> bool {
        self.key == key && self.action == action.as_str()
    }
}

/// Body of `POST /permissions` and one entry of the permission seed file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePermission {
    /// Human-readable name.
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: String,
    /// Resource key.
    #[validate(length(min = 1, message = "Please add a key"))]
    pub key: String,
    /// Granted action.
    #[validate(custom(function = "validate_action"))]
    pub action: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PATCH /permissions/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePermission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Please add a name"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Please add a key"))]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_action"))]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn validate_action(action: &str) -> Result<(), ValidationError> {
    action
        .parse::<PermissionAction>()
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("action")
                .with_message("Action must be one of list, create, details, update, delete".into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grants() {
        let now = Utc::now();
        let p = Permission {
            id: Uuid::new_v4(),
            name: "List products".into(),
            key: "product".into(),
            action: "list".into(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        assert!(p.grants("product", PermissionAction::List));
        assert!(!p.grants("product", PermissionAction::Delete));
        assert!(!p.grants("category", PermissionAction::List));
    }

    #[test]
    fn test_create_rejects_unknown_action() {
        let dto = CreatePermission {
            name: "x".into(),
            key: "product".into(),
            action: "read".into(),
            description: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let dto = UpdatePermission {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Renamed" }));
    }
}
