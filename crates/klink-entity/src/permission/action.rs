//! The five actions a permission can grant on a resource.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action on a resource, paired with a resource key in a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// List documents.
    List,
    /// Create a document.
    Create,
    /// Read one document.
    Details,
    /// Update a document.
    Update,
    /// Delete a document.
    Delete,
}

impl PermissionAction {
    /// Every action, in route order.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Create,
        Self::Details,
        Self::Update,
        Self::Delete,
    ];

    /// Return the action as stored in `permissions.action`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Details => "details",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = klink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                klink_core::AppError::validation(format!(
                    "Invalid action: '{s}'. Expected one of: list, create, details, update, delete"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("details".parse::<PermissionAction>().unwrap(), PermissionAction::Details);
        assert!("read".parse::<PermissionAction>().is_err());
    }

    #[test]
    fn test_round_trip_names() {
        for action in PermissionAction::ALL {
            assert_eq!(action.as_str().parse::<PermissionAction>().unwrap(), action);
        }
    }
}
