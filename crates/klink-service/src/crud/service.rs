//! The generic CRUD service behind every resource route.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use klink_core::error::AppError;
use klink_core::result::AppResult;
use klink_core::types::{ListQuery, Pagination};
use klink_database::ResourceRepository;
use klink_entity::Resource;
use klink_entity::validation::validate;

use super::hooks::{NoHook, WriteHook};

/// Message for an id that matches no row.
pub const NOT_FOUND: &str = "No document found with that ID";
/// Message for a delete blocked by a referencing row.
pub const ALREADY_APPLIED: &str = "Already applied. Could not be deleted.";

/// One page of documents with its pagination metadata.
#[derive(Debug, Clone)]
pub struct Page {
    /// Documents on this page.
    pub data: Vec<Value>,
    /// Page metadata.
    pub pagination: Pagination,
}

/// List, read, create, update and delete documents of `M`.
pub struct CrudService<M: Resource> {
    repo: ResourceRepository<M>,
    hook: Arc<dyn WriteHook>,
}

impl<M: Resource> Clone for CrudService<M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            hook: Arc::clone(&self.hook),
        }
    }
}

impl<M: Resource> std::fmt::Debug for CrudService<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudService")
            .field("resource", &M::NAME)
            .field("hook", &self.hook)
            .finish()
    }
}

impl<M: Resource> CrudService<M> {
    /// Creates a service without write hooks.
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: ResourceRepository::new(pool),
            hook: Arc::new(NoHook),
        }
    }

    /// Replaces the write hook.
    pub fn with_hook(mut self, hook: Arc<dyn WriteHook>) -> Self {
        self.hook = hook;
        self
    }

    /// The underlying repository.
    pub fn repository(&self) -> &ResourceRepository<M> {
        &self.repo
    }

    /// Count the matches, then return the requested page.
    pub async fn list(&self, query: &ListQuery) -> AppResult<Page> {
        let (data, total) = self.repo.find_many(query).await?;
        Ok(Page {
            data,
            pagination: Pagination::new(query.page, total),
        })
    }

    /// Fetch one document.
    pub async fn get(&self, id: Uuid, query: &ListQuery) -> AppResult<Value> {
        self.repo
            .find_by_id(id, query)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))
    }

    /// Validate and insert a document. `owner` becomes `created_by` on owned
    /// resources.
    pub async fn create(&self, body: Value, owner: Option<Uuid>) -> AppResult<Value> {
        let dto: M::Create = parse_body(body)?;
        validate(&dto)?;

        let mut values = to_columns(&dto)?;
        self.hook.before_create(&mut values)?;
        if M::SCHEMA.owned {
            if let Some(owner) = owner {
                values.insert("created_by".into(), Value::String(owner.to_string()));
            }
        }

        let doc = self.repo.insert(&values).await?;
        info!(resource = M::NAME, id = %doc_id(&doc), "Created document");
        Ok(doc)
    }

    /// Validate and apply a partial update.
    pub async fn update(&self, id: Uuid, body: Value) -> AppResult<Value> {
        let dto: M::Update = parse_body(body)?;
        validate(&dto)?;

        let mut values = to_columns(&dto)?;
        self.hook.before_update(&mut values)?;

        let doc = self
            .repo
            .update(id, &values)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
        info!(resource = M::NAME, %id, fields = values.len(), "Updated document");
        Ok(doc)
    }

    /// Delete a document unless another row still references it.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if self.repo.is_referenced(id).await? {
            return Err(AppError::conflict(ALREADY_APPLIED));
        }
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found(NOT_FOUND));
        }
        info!(resource = M::NAME, %id, "Deleted document");
        Ok(())
    }
}

/// Deserialize a request body into a typed DTO.
pub(crate) fn parse_body<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::validation(format!("Invalid input data. {e}")))
}

/// Serialize a DTO into the column map handed to the repository.
pub(crate) fn to_columns<T: Serialize>(dto: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(dto)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::internal("Write DTO did not serialize to an object")),
    }
}

fn doc_id(doc: &Value) -> &str {
    doc.get("id").and_then(Value::as_str).unwrap_or_default()
}
