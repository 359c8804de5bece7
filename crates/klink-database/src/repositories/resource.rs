//! Generic repository over any [`Resource`].

use std::marker::PhantomData;

use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_core::types::ListQuery;
use klink_entity::Resource;

use crate::document::{
    ROOT_ALIAS, document_expr, push_conditions, push_order, push_write_value,
    relations_for, resolve_filters, validate_projection, write_columns,
};
use crate::error::{WriteOp, map_sqlx_error};

/// Reads and writes rows of `M` as JSON documents.
pub struct ResourceRepository<M: Resource> {
    pool: PgPool,
    _resource: PhantomData<fn() -> M>,
}

impl<M: Resource> Clone for ResourceRepository<M> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<M: Resource> std::fmt::Debug for ResourceRepository<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRepository")
            .field("table", &M::SCHEMA.table)
            .finish()
    }
}

impl<M: Resource> ResourceRepository<M> {
    /// Create a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    fn select_expr(query: &ListQuery) -> AppResult<String> {
        validate_projection(M::SCHEMA, &query.projection)?;
        let relations = relations_for(M::SCHEMA, &query.projection, &query.populate)?;
        Ok(document_expr(
            M::SCHEMA,
            ROOT_ALIAS,
            &query.projection,
            &relations,
        ))
    }

    fn read_error(&self, e: sqlx::Error) -> AppError {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to read {}", M::SCHEMA.table),
            e,
        )
    }

    /// Count rows matching the filters, then fetch one page of documents.
    pub async fn find_many(&self, query: &ListQuery) -> AppResult<(Vec<Value>, u64)> {
        let conditions = resolve_filters(M::SCHEMA, &query.filters)?;
        let select = Self::select_expr(query)?;

        let mut count = QueryBuilder::<Postgres>::new(format!(
            "SELECT COUNT(*) FROM {} {ROOT_ALIAS}",
            M::SCHEMA.table
        ));
        push_conditions(&mut count, ROOT_ALIAS, &conditions);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.read_error(e))?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {select} FROM {} {ROOT_ALIAS}",
            M::SCHEMA.table
        ));
        push_conditions(&mut qb, ROOT_ALIAS, &conditions);
        push_order(&mut qb, M::SCHEMA, ROOT_ALIAS, &query.sort)?;
        qb.push(" LIMIT ")
            .push_bind(i64::try_from(query.page.limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        debug!(table = M::SCHEMA.table, sql = qb.sql(), "find_many");

        let docs = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.read_error(e))?;

        Ok((docs.into_iter().map(|d| d.0).collect(), total.max(0) as u64))
    }

    /// Fetch one document by id. Filters in `query` further scope the lookup.
    pub async fn find_by_id(&self, id: Uuid, query: &ListQuery) -> AppResult<Option<Value>> {
        let conditions = resolve_filters(M::SCHEMA, &query.filters)?;
        let select = Self::select_expr(query)?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {select} FROM {} {ROOT_ALIAS}",
            M::SCHEMA.table
        ));
        push_conditions(&mut qb, ROOT_ALIAS, &conditions);
        qb.push(if conditions.is_empty() { " WHERE " } else { " AND " });
        qb.push(format!("{ROOT_ALIAS}.\"id\" = ")).push_bind(id);

        let doc = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.read_error(e))?;
        Ok(doc.map(|d| d.0))
    }

    /// Insert a row and return it as a document with automatic relations.
    pub async fn insert(&self, values: &Map<String, Value>) -> AppResult<Value> {
        let columns = write_columns(M::SCHEMA, values)?;
        self.check_array_references(values).await?;
        let select = Self::select_expr(&ListQuery::default())?;
        let id = Uuid::now_v7();

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "WITH {ROOT_ALIAS} AS (INSERT INTO {} (\"id\"",
            M::SCHEMA.table
        ));
        for (column, _) in &columns {
            qb.push(format!(", \"{}\"", column.name));
        }
        qb.push(") VALUES (").push_bind(id);
        for (column, value) in &columns {
            qb.push(", ");
            push_write_value(&mut qb, column, value)?;
        }
        qb.push(format!(") RETURNING *) SELECT {select} FROM {ROOT_ALIAS}"));

        let doc = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, M::SCHEMA.table, WriteOp::Write))?;

        debug!(table = M::SCHEMA.table, %id, "Inserted row");
        Ok(doc.0)
    }

    /// Update the given columns of a row and refresh `updated_at`.
    pub async fn update(&self, id: Uuid, values: &Map<String, Value>) -> AppResult<Option<Value>> {
        let columns = write_columns(M::SCHEMA, values)?;
        self.check_array_references(values).await?;
        let select = Self::select_expr(&ListQuery::default())?;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "WITH {ROOT_ALIAS} AS (UPDATE {} SET \"updated_at\" = NOW()",
            M::SCHEMA.table
        ));
        for (column, value) in &columns {
            qb.push(format!(", \"{}\" = ", column.name));
            push_write_value(&mut qb, column, value)?;
        }
        qb.push(" WHERE \"id\" = ").push_bind(id);
        qb.push(format!(" RETURNING *) SELECT {select} FROM {ROOT_ALIAS}"));

        let doc = qb
            .build_query_scalar::<Json<Value>>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, M::SCHEMA.table, WriteOp::Write))?;
        Ok(doc.map(|d| d.0))
    }

    /// Delete a row. Returns `false` when nothing matched.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE \"id\" = $1", M::SCHEMA.table))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, M::SCHEMA.table, WriteOp::Delete))?;
        Ok(result.rows_affected() > 0)
    }

    /// Reject `UUID[]` references to rows that do not exist. Array columns
    /// carry no foreign key, so Postgres cannot check them.
    async fn check_array_references(&self, values: &Map<String, Value>) -> AppResult<()> {
        for relation in M::SCHEMA.relations.iter().filter(|r| r.many) {
            let Some(Value::Array(items)) = values.get(relation.local_column) else {
                continue;
            };
            let mut ids: Vec<Uuid> = items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(|s| s.parse().ok())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            if ids.is_empty() {
                continue;
            }

            let sql = format!(
                "SELECT COUNT(*) FROM {} WHERE \"id\" = ANY($1)",
                relation.target.table
            );
            let found: i64 = sqlx::query_scalar(&sql)
                .bind(ids.as_slice())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| self.read_error(e))?;
            if usize::try_from(found).unwrap_or(0) < ids.len() {
                debug!(
                    table = M::SCHEMA.table,
                    column = relation.local_column,
                    "Unknown array reference"
                );
                return Err(AppError::validation(format!(
                    "Invalid reference: {}",
                    relation.local_column
                )));
            }
        }
        Ok(())
    }

    /// Whether any row listed in the schema's delete guards references `id`.
    pub async fn is_referenced(&self, id: Uuid) -> AppResult<bool> {
        for guard in M::SCHEMA.delete_guards {
            let predicate = if guard.array {
                format!("$1 = ANY(\"{}\")", guard.column)
            } else {
                format!("\"{}\" = $1", guard.column)
            };
            let sql = format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {predicate})",
                guard.table
            );
            let referenced: bool = sqlx::query_scalar(&sql)
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| self.read_error(e))?;
            if referenced {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
