//! Request context carrying the authenticated user and their permissions.

use uuid::Uuid;

use klink_entity::permission::Permission;
use klink_entity::role::Role;
use klink_entity::user::User;

/// Context for the current authenticated request.
///
/// Built by [`AuthService::authenticate`](crate::AuthService::authenticate)
/// and passed into service methods so that every operation knows who is
/// acting and what their role allows.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user.
    pub user: User,
    /// The user's role, if one is assigned and still exists.
    pub role: Option<Role>,
    /// Permissions granted by `role`.
    pub permissions: Vec<Permission>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user: User, role: Option<Role>, permissions: Vec<Permission>) -> Self {
        Self {
            user,
            role,
            permissions,
        }
    }

    /// The authenticated user's ID.
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Role permissions, or `None` for a user without a role.
    pub fn role_permissions(&self) -> Option<&[Permission]> {
        self.role.as_ref().map(|_| self.permissions.as_slice())
    }
}
