//! SQL fragments for reading rows as JSON documents.
//!
//! Every read selects a single `jsonb_build_object(...)` per row, so the
//! projection and embedded relations of a [`Schema`] can vary per request
//! without a Rust struct per shape. Identifiers come from the static
//! schemas; only values are bound.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use klink_core::types::{FilterField, FilterOp, FilterValue, Projection, SortField};
use klink_core::{AppError, AppResult};
use klink_entity::{Column, ColumnKind, Relation, Schema};

/// Alias of the top-level row in every generated statement.
pub const ROOT_ALIAS: &str = "t0";

/// Columns maintained by the repository, never accepted from request bodies.
const MANAGED_COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

/// A filter resolved against a column, with its value typed.
#[derive(Debug, Clone)]
pub struct Condition {
    /// Filtered column.
    pub column: &'static Column,
    /// Comparison.
    pub op: FilterOp,
    /// Typed value; a [`FilterValue::List`] for `in`.
    pub value: FilterValue,
}

fn column_ref(alias: &str, name: &str) -> String {
    format!("{alias}.\"{name}\"")
}

/// Reject projection names that are neither public columns nor relations.
pub fn validate_projection(schema: &Schema, projection: &Projection) -> AppResult<()> {
    for name in projection.names() {
        let is_column = schema.column(name).is_some_and(|c| !c.secret);
        let is_relation = schema.relations.iter().any(|r| r.name == name);
        if !is_column && !is_relation {
            return Err(AppError::validation(format!("Invalid field: {name}")));
        }
    }
    Ok(())
}

/// Relations to embed: every requested one, plus automatic ones whose
/// reference column survives the projection.
pub fn relations_for(
    schema: &'static Schema,
    projection: &Projection,
    populate: &[String],
) -> AppResult<Vec<&'static Relation>> {
    let mut relations: Vec<&'static Relation> = Vec::new();
    for name in populate {
        let relation = schema.relation(name)?;
        if !relations.iter().any(|r| r.name == relation.name) {
            relations.push(relation);
        }
    }
    for relation in schema.relations.iter().filter(|r| r.auto) {
        let kept = projection.keeps(relation.local_column) || projection.keeps(relation.name);
        if kept && !relations.iter().any(|r| r.name == relation.name) {
            relations.push(relation);
        }
    }
    Ok(relations)
}

/// Build the JSON document expression for a row aliased `alias`.
///
/// Embedded documents carry all their public columns plus their own
/// automatic relations.
pub fn document_expr(
    schema: &Schema,
    alias: &str,
    projection: &Projection,
    relations: &[&'static Relation],
) -> String {
    let mut parts: Vec<String> = schema
        .public_columns()
        .filter(|c| projection.keeps(c.name))
        .map(|c| format!("'{}', {}", c.name, column_ref(alias, c.name)))
        .collect();

    for relation in relations {
        let target = relation.target;
        let sub = format!("{alias}_{}", relation.name);
        let nested: Vec<&'static Relation> = target.relations.iter().filter(|r| r.auto).collect();
        let inner = document_expr(target, &sub, &Projection::All, &nested);
        let local = column_ref(alias, relation.local_column);
        let sql = if relation.many {
            format!(
                "(SELECT COALESCE(jsonb_agg({inner} ORDER BY {}), '[]'::jsonb) FROM {} {sub} WHERE {} = ANY({local}))",
                column_ref(&sub, "created_at"),
                target.table,
                column_ref(&sub, "id"),
            )
        } else {
            format!(
                "(SELECT {inner} FROM {} {sub} WHERE {} = {local})",
                target.table,
                column_ref(&sub, "id"),
            )
        };
        parts.push(format!("'{}', {sql}", relation.name));
    }

    format!("jsonb_build_object({})", parts.join(", "))
}

/// Type every filter against the schema. Unknown or secret fields are 400s.
pub fn resolve_filters(schema: &'static Schema, filters: &[FilterField]) -> AppResult<Vec<Condition>> {
    filters
        .iter()
        .map(|filter| {
            let column = schema
                .columns
                .iter()
                .find(|c| c.name == filter.field && !c.secret && c.kind.is_comparable())
                .ok_or_else(|| {
                    AppError::validation(format!("Invalid filter field: {}", filter.field))
                })?;

            let value = match filter.op {
                FilterOp::In => {
                    let raw = filter.raw_values();
                    if raw.is_empty() {
                        return Err(AppError::validation(format!(
                            "Invalid value for {}: empty list",
                            filter.field
                        )));
                    }
                    FilterValue::List(
                        raw.into_iter()
                            .map(|v| column.kind.parse_value(column.name, v))
                            .collect::<AppResult<_>>()?,
                    )
                }
                _ => column.kind.parse_value(column.name, &filter.value)?,
            };

            Ok(Condition {
                column,
                op: filter.op,
                value,
            })
        })
        .collect()
}

/// Append `WHERE ... AND ...` for the given conditions.
pub fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, alias: &str, conditions: &[Condition]) {
    for (i, condition) in conditions.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(column_ref(alias, condition.column.name));
        match (&condition.op, &condition.value) {
            (FilterOp::In, FilterValue::List(items)) => {
                qb.push(" = ANY(");
                push_list(qb, items);
                qb.push(")");
            }
            (op, value) => {
                qb.push(format!(" {} ", op.as_sql()));
                push_value(qb, value);
            }
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FilterValue) {
    match value {
        FilterValue::Uuid(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Text(v) => {
            qb.push_bind(v.clone());
        }
        FilterValue::Integer(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Number(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Boolean(v) => {
            qb.push_bind(*v);
        }
        FilterValue::Timestamp(v) => {
            qb.push_bind(*v);
        }
        FilterValue::List(items) => push_list(qb, items),
    }
}

/// Bind a homogeneous list as one array parameter.
fn push_list(qb: &mut QueryBuilder<'_, Postgres>, items: &[FilterValue]) {
    macro_rules! bind_vec {
        ($variant:ident) => {
            qb.push_bind(
                items
                    .iter()
                    .filter_map(|v| match v {
                        FilterValue::$variant(x) => Some(x.clone()),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            )
        };
    }
    match items.first() {
        Some(FilterValue::Uuid(_)) => bind_vec!(Uuid),
        Some(FilterValue::Integer(_)) => bind_vec!(Integer),
        Some(FilterValue::Number(_)) => bind_vec!(Number),
        Some(FilterValue::Boolean(_)) => bind_vec!(Boolean),
        Some(FilterValue::Timestamp(_)) => bind_vec!(Timestamp),
        _ => bind_vec!(Text),
    };
}

/// Append `ORDER BY`, always ending with `id` so pages are stable.
pub fn push_order(
    qb: &mut QueryBuilder<'_, Postgres>,
    schema: &Schema,
    alias: &str,
    sort: &[SortField],
) -> AppResult<()> {
    let mut keys = Vec::with_capacity(sort.len() + 1);
    for field in sort {
        let column = schema.public_column(&field.field, "Invalid sort field")?;
        if !column.kind.is_comparable() {
            return Err(AppError::validation(format!("Invalid sort field: {}", field.field)));
        }
        keys.push(format!(
            "{} {}",
            column_ref(alias, column.name),
            field.direction.as_sql()
        ));
    }
    if !sort.iter().any(|s| s.field == "id") {
        keys.push(format!("{} ASC", column_ref(alias, "id")));
    }
    qb.push(" ORDER BY ");
    qb.push(keys.join(", "));
    Ok(())
}

/// Resolve the columns of a write map, rejecting unknown or managed names.
pub fn write_columns<'v>(
    schema: &'static Schema,
    values: &'v Map<String, Value>,
) -> AppResult<Vec<(&'static Column, &'v Value)>> {
    values
        .iter()
        .map(|(name, value)| {
            let column = schema
                .columns
                .iter()
                .find(|c| c.name == name && !MANAGED_COLUMNS.contains(&c.name))
                .ok_or_else(|| {
                    AppError::internal(format!("Column {name} is not writable on {}", schema.table))
                })?;
            Ok((column, value))
        })
        .collect()
}

/// Bind one JSON value according to its column kind.
pub fn push_write_value(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &Column,
    value: &Value,
) -> AppResult<()> {
    let invalid = || AppError::validation(format!("Invalid value for {}", column.name));
    match column.kind {
        ColumnKind::Uuid => {
            let v = match value {
                Value::Null => None,
                Value::String(s) => Some(Uuid::parse_str(s).map_err(|_| invalid())?),
                _ => return Err(invalid()),
            };
            qb.push_bind(v);
        }
        ColumnKind::UuidArray => {
            let v: Vec<Uuid> = match value {
                Value::Null => Vec::new(),
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .and_then(|s| Uuid::parse_str(s).ok())
                            .ok_or_else(invalid)
                    })
                    .collect::<AppResult<_>>()?,
                _ => return Err(invalid()),
            };
            qb.push_bind(v);
        }
        ColumnKind::Text => {
            let v = match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                _ => return Err(invalid()),
            };
            qb.push_bind(v);
        }
        ColumnKind::Float => {
            let v = match value {
                Value::Null => None,
                other => Some(other.as_f64().ok_or_else(invalid)?),
            };
            qb.push_bind(v);
        }
        ColumnKind::Integer => {
            let v = match value {
                Value::Null => None,
                other => Some(other.as_i64().ok_or_else(invalid)?),
            };
            qb.push_bind(v);
        }
        ColumnKind::Bool => {
            let v = match value {
                Value::Null => None,
                other => Some(other.as_bool().ok_or_else(invalid)?),
            };
            qb.push_bind(v);
        }
        ColumnKind::Timestamp => {
            let v = match value {
                Value::Null => None,
                Value::String(s) => Some(
                    DateTime::parse_from_rfc3339(s)
                        .map_err(|_| invalid())?
                        .with_timezone(&Utc),
                ),
                _ => return Err(invalid()),
            };
            qb.push_bind(v);
        }
    }
    Ok(())
}
