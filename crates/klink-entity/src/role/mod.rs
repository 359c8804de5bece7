//! Role entities.

pub mod model;

use crate::permission::PERMISSION_SCHEMA;
use crate::resource::{Column, ColumnKind, DeleteGuard, Relation, Resource, Schema};

pub use model::{CreateRole, Role, UpdateRole};

/// Marker for the `roles` table.
#[derive(Debug, Clone, Copy)]
pub struct Roles;

/// Descriptor of the `roles` table. Permissions are always embedded.
pub static ROLE_SCHEMA: Schema = Schema {
    table: "roles",
    columns: &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("name", ColumnKind::Text),
        Column::new("type", ColumnKind::Text),
        Column::new("description", ColumnKind::Text),
        Column::new("permission_ids", ColumnKind::UuidArray),
        Column::new("created_at", ColumnKind::Timestamp),
        Column::new("updated_at", ColumnKind::Timestamp),
    ],
    relations: &[Relation {
        name: "permissions",
        local_column: "permission_ids",
        target: &PERMISSION_SCHEMA,
        many: true,
        auto: true,
    }],
    owned: false,
    delete_guards: &[DeleteGuard {
        table: "users",
        column: "role_id",
        array: false,
    }],
};

impl Resource for Roles {
    const NAME: &'static str = "role";
    const SCHEMA: &'static Schema = &ROLE_SCHEMA;
    type Create = CreateRole;
    type Update = UpdateRole;
}
