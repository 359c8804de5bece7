//! Permission enforcement: does a role grant an action on a resource?

use klink_core::error::AppError;
use klink_entity::permission::{Permission, PermissionAction};

/// Message returned to any caller whose role lacks a permission.
pub const FORBIDDEN: &str = "You do not have permission to perform this action";

/// Checks a caller's role permissions against a `(resource, action)` pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authorizer;

impl Authorizer {
    /// Creates a new authorizer.
    pub fn new() -> Self {
        Self
    }

    /// Returns `Ok(())` if any permission grants `action` on `resource`.
    ///
    /// `permissions` is `None` for a user without a role.
    pub fn require(
        &self,
        permissions: Option<&[Permission]>,
        resource: &str,
        action: PermissionAction,
    ) -> Result<(), AppError> {
        let granted = permissions
            .unwrap_or_default()
            .iter()
            .any(|p| p.grants(resource, action));

        if granted {
            Ok(())
        } else {
            tracing::debug!(resource, action = %action, "Permission denied");
            Err(AppError::forbidden(FORBIDDEN))
        }
    }
}
