//! User entities.

pub mod dto;
pub mod model;

use crate::file::FILE_SCHEMA;
use crate::resource::{Column, ColumnKind, Relation, Resource, Schema};
use crate::role::ROLE_SCHEMA;

pub use dto::{CreateUser, UpdateUser};
pub use model::User;

/// Marker for the `users` table.
#[derive(Debug, Clone, Copy)]
pub struct Users;

/// Descriptor of the `users` table.
///
/// The role (with its permissions) is always embedded; the profile image only
/// on `populate=image`.
pub static USER_SCHEMA: Schema = Schema {
    table: "users",
    columns: &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("name", ColumnKind::Text),
        Column::new("email", ColumnKind::Text),
        Column::secret("password_hash", ColumnKind::Text),
        Column::new("password_changed_at", ColumnKind::Timestamp),
        Column::secret("password_reset_token", ColumnKind::Text),
        Column::secret("password_reset_expires", ColumnKind::Timestamp),
        Column::new("role_id", ColumnKind::Uuid),
        Column::new("image_id", ColumnKind::Uuid),
        Column::new("created_at", ColumnKind::Timestamp),
        Column::new("updated_at", ColumnKind::Timestamp),
    ],
    relations: &[
        Relation {
            name: "role",
            local_column: "role_id",
            target: &ROLE_SCHEMA,
            many: false,
            auto: true,
        },
        Relation {
            name: "image",
            local_column: "image_id",
            target: &FILE_SCHEMA,
            many: false,
            auto: false,
        },
    ],
    owned: false,
    delete_guards: &[],
};

impl Resource for Users {
    const NAME: &'static str = "user";
    const SCHEMA: &'static Schema = &USER_SCHEMA;
    type Create = CreateUser;
    type Update = UpdateUser;
}
