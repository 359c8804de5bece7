//! Static table descriptors.
//!
//! A [`Schema`] lists the columns a table exposes, the relations that can be
//! embedded into its documents, and the references that block deletion.
//! [`Resource`] ties a schema to its permission key and write DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use klink_core::types::FilterValue;
use klink_core::{AppError, AppResult};

/// SQL type family of a column, used to type filter values and bind writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `UUID`.
    Uuid,
    /// `UUID[]`.
    UuidArray,
    /// `TEXT`.
    Text,
    /// `DOUBLE PRECISION`.
    Float,
    /// `BIGINT`.
    Integer,
    /// `BOOLEAN`.
    Bool,
    /// `TIMESTAMPTZ`.
    Timestamp,
}

impl ColumnKind {
    /// Whether values of this kind can appear in filters and sort keys.
    pub fn is_comparable(&self) -> bool {
        !matches!(self, Self::UuidArray)
    }

    /// Parse a raw query-string value into a typed filter value.
    pub fn parse_value(&self, field: &str, raw: &str) -> AppResult<FilterValue> {
        let invalid = || AppError::validation(format!("Invalid value for {field}: {raw}"));
        match self {
            Self::Uuid => Uuid::parse_str(raw)
                .map(FilterValue::Uuid)
                .map_err(|_| invalid()),
            Self::Text => Ok(FilterValue::Text(raw.to_string())),
            Self::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(FilterValue::Number)
                .ok_or_else(invalid),
            Self::Integer => raw.parse().map(FilterValue::Integer).map_err(|_| invalid()),
            Self::Bool => raw.parse().map(FilterValue::Boolean).map_err(|_| invalid()),
            Self::Timestamp => parse_timestamp(raw)
                .map(FilterValue::Timestamp)
                .ok_or_else(invalid),
            Self::UuidArray => Err(AppError::validation(format!(
                "Invalid filter field: {field}"
            ))),
        }
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// A column exposed by a table.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Column name, also the JSON key.
    pub name: &'static str,
    /// SQL type family.
    pub kind: ColumnKind,
    /// Secret columns are writable but never selected, filtered, or sorted.
    pub secret: bool,
}

impl Column {
    /// A regular column.
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            secret: false,
        }
    }

    /// A column that never leaves the database.
    pub const fn secret(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            secret: true,
        }
    }
}

/// An embeddable reference from one table to another.
#[derive(Debug)]
pub struct Relation {
    /// JSON key the embedded document is written under.
    pub name: &'static str,
    /// Local column holding the reference (`UUID`, or `UUID[]` when `many`).
    pub local_column: &'static str,
    /// Referenced table.
    pub target: &'static Schema,
    /// Whether the local column is an array of references.
    pub many: bool,
    /// Embedded on every read, not only when requested via `populate`.
    pub auto: bool,
}

/// A reference from another table that blocks deleting a row.
#[derive(Debug, Clone, Copy)]
pub struct DeleteGuard {
    /// Referencing table.
    pub table: &'static str,
    /// Referencing column.
    pub column: &'static str,
    /// Whether the referencing column is a `UUID[]`.
    pub array: bool,
}

/// Static description of a table.
#[derive(Debug)]
pub struct Schema {
    /// Table name.
    pub table: &'static str,
    /// Exposed columns, including `id`, `created_at` and `updated_at`.
    pub columns: &'static [Column],
    /// Embeddable relations.
    pub relations: &'static [Relation],
    /// Whether rows carry a `created_by` owner column.
    pub owned: bool,
    /// References that block deletion.
    pub delete_guards: &'static [DeleteGuard],
}

impl Schema {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a non-secret column, rejecting unknown names with `message`.
    pub fn public_column(&self, name: &str, message: &str) -> AppResult<&Column> {
        self.column(name)
            .filter(|c| !c.secret)
            .ok_or_else(|| AppError::validation(format!("{message}: {name}")))
    }

    /// Look up a relation by name.
    pub fn relation(&self, name: &str) -> AppResult<&Relation> {
        self.relations
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| AppError::validation(format!("Invalid populate field: {name}")))
    }

    /// Columns that may appear in responses.
    pub fn public_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.secret)
    }
}

/// A table that the generic CRUD layer can serve.
pub trait Resource: Send + Sync + 'static {
    /// Permission key (`product`, `role`, ...).
    const NAME: &'static str;
    /// Table descriptor.
    const SCHEMA: &'static Schema;
    /// Validated body of a create request.
    type Create: DeserializeOwned + Serialize + Validate + Send + Sync + 'static;
    /// Validated body of an update request. Absent fields are left untouched.
    type Update: DeserializeOwned + Serialize + Validate + Send + Sync + 'static;
}
