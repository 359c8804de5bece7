//! Permission entities.

pub mod action;
pub mod model;

use crate::resource::{Column, ColumnKind, DeleteGuard, Resource, Schema};

pub use action::PermissionAction;
pub use model::{CreatePermission, Permission, UpdatePermission};

/// Marker for the `permissions` table.
#[derive(Debug, Clone, Copy)]
pub struct Permissions;

/// Descriptor of the `permissions` table.
pub static PERMISSION_SCHEMA: Schema = Schema {
    table: "permissions",
    columns: &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("name", ColumnKind::Text),
        Column::new("key", ColumnKind::Text),
        Column::new("action", ColumnKind::Text),
        Column::new("description", ColumnKind::Text),
        Column::new("created_at", ColumnKind::Timestamp),
        Column::new("updated_at", ColumnKind::Timestamp),
    ],
    relations: &[],
    owned: false,
    delete_guards: &[DeleteGuard {
        table: "roles",
        column: "permission_ids",
        array: true,
    }],
};

impl Resource for Permissions {
    const NAME: &'static str = "permission";
    const SCHEMA: &'static Schema = &PERMISSION_SCHEMA;
    type Create = CreatePermission;
    type Update = UpdatePermission;
}
