//! Uploaded file entities.

pub mod folder;
pub mod model;

use crate::resource::{Column, ColumnKind, Resource, Schema};

pub use folder::UploadField;
pub use model::{CreateFile, File};

/// Marker for the `files` table.
#[derive(Debug, Clone, Copy)]
pub struct Files;

/// Descriptor of the `files` table.
pub static FILE_SCHEMA: Schema = Schema {
    table: "files",
    columns: &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("name", ColumnKind::Text),
        Column::new("original_name", ColumnKind::Text),
        Column::new("mime_type", ColumnKind::Text),
        Column::new("folder", ColumnKind::Text),
        Column::new("size_bytes", ColumnKind::Integer),
        Column::new("created_by", ColumnKind::Uuid),
        Column::new("created_at", ColumnKind::Timestamp),
        Column::new("updated_at", ColumnKind::Timestamp),
    ],
    relations: &[],
    owned: true,
    delete_guards: &[],
};

impl Resource for Files {
    const NAME: &'static str = "file";
    const SCHEMA: &'static Schema = &FILE_SCHEMA;
    type Create = CreateFile;
    // Files are replaced by uploading again, never patched.
    type Update = CreateFile;
}
