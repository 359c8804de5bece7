//! Permission guard used by resource handlers.

use klink_core::error::AppError;
use klink_entity::permission::PermissionAction;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Checks that the caller's role grants `action` on `resource`.
pub fn authorize(
    state: &AppState,
    auth: &AuthUser,
    resource: &str,
    action: PermissionAction,
) -> Result<(), AppError> {
    state
        .authorizer
        .require(auth.role_permissions(), resource, action)
}
