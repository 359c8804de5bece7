//! Upload, list, read and delete files owned by the caller.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use klink_core::config::FilesConfig;
use klink_core::error::AppError;
use klink_core::result::AppResult;
use klink_core::traits::StorageProvider;
use klink_core::types::{FilterField, ListQuery};
use klink_database::repositories::FileRepository;
use klink_entity::file::{CreateFile, Files, UploadField};
use klink_storage::imaging;

use super::rules::{check_extension, mime_for, random_name};
use crate::crud::service::to_columns;
use crate::crud::{CrudService, NOT_FOUND, Page};

/// One file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadPart {
    /// Multipart field name: `image`, `resume` or `cover-letter`.
    pub field: String,
    /// Client file name.
    pub file_name: String,
    /// Declared content type.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// A part that passed validation and processing and is ready to store.
struct PreparedPart {
    key: String,
    meta: CreateFile,
    data: Bytes,
}

/// Handles uploads to object storage and their metadata rows.
#[derive(Clone)]
pub struct FileService {
    docs: CrudService<Files>,
    files: FileRepository,
    storage: Arc<dyn StorageProvider>,
    config: FilesConfig,
    url_ttl: Duration,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService")
            .field("storage", &self.storage.provider_type())
            .field("url_ttl", &self.url_ttl)
            .finish()
    }
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        pool: PgPool,
        storage: Arc<dyn StorageProvider>,
        config: FilesConfig,
        url_ttl: Duration,
    ) -> Self {
        Self {
            docs: CrudService::new(pool.clone()),
            files: FileRepository::new(pool),
            storage,
            config,
            url_ttl,
        }
    }

    /// Validate and process every part, then store each one and record its
    /// metadata. Nothing is written unless every part is acceptable, and a
    /// failed write removes whatever this upload already stored.
    pub async fn upload(&self, owner: Uuid, parts: Vec<UploadPart>) -> AppResult<Vec<Value>> {
        if parts.is_empty() {
            return Err(AppError::validation("Please upload files"));
        }

        let accepted = parts
            .into_iter()
            .map(|part| -> AppResult<(UploadField, String, UploadPart)> {
                let field: UploadField = part.field.parse()?;
                let extension = check_extension(field, &part.file_name, &self.config)?;
                Ok((field, extension, part))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let mut prepared = Vec::with_capacity(accepted.len());
        for (field, extension, part) in accepted {
            prepared.push(self.prepare(field, &extension, part).await?);
        }

        let mut stored: Vec<(String, Option<Uuid>)> = Vec::with_capacity(prepared.len());
        let mut docs = Vec::with_capacity(prepared.len());
        for item in prepared {
            match self.store(owner, item, &mut stored).await {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    self.rollback(&stored).await;
                    return Err(e);
                }
            }
        }

        let mut out = Vec::with_capacity(docs.len());
        for doc in docs {
            out.push(self.with_url(doc).await?);
        }

        info!(user_id = %owner, count = out.len(), "Uploaded files");
        Ok(out)
    }

    /// Resize images and work out the storage key and metadata of a part.
    async fn prepare(
        &self,
        field: UploadField,
        extension: &str,
        part: UploadPart,
    ) -> AppResult<PreparedPart> {
        let data = if field.is_image() {
            imaging::fit_within(
                part.data,
                self.config.image_max_width,
                self.config.image_max_height,
            )
            .await?
        } else {
            part.data
        };

        let name = random_name(extension);
        let key = format!("{}/{}", field.folder(), name);
        let mime_type = part
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| mime_for(extension).to_string());

        Ok(PreparedPart {
            key,
            meta: CreateFile {
                name,
                original_name: Some(part.file_name),
                mime_type,
                folder: field.folder().to_string(),
                size_bytes: i64::try_from(data.len()).unwrap_or(i64::MAX),
            },
            data,
        })
    }

    /// Put the object and insert its row, recording each write in `stored`.
    async fn store(
        &self,
        owner: Uuid,
        item: PreparedPart,
        stored: &mut Vec<(String, Option<Uuid>)>,
    ) -> AppResult<Value> {
        let PreparedPart { key, meta, data } = item;

        self.storage.put(&key, data, &meta.mime_type).await?;
        stored.push((key, None));

        let doc = self
            .docs
            .create(Value::Object(to_columns(&meta)?), Some(owner))
            .await?;
        if let Some(last) = stored.last_mut() {
            last.1 = doc
                .get("id")
                .and_then(Value::as_str)
                .and_then(|id| id.parse().ok());
        }
        Ok(doc)
    }

    /// Best-effort removal of objects and rows written by a failed upload.
    async fn rollback(&self, stored: &[(String, Option<Uuid>)]) {
        for (key, id) in stored {
            if let Some(id) = id {
                if let Err(e) = self.files.delete(*id).await {
                    warn!(file_id = %id, error = %e, "Failed to remove file row");
                }
            }
            if let Err(e) = self.storage.delete(key).await {
                warn!(key = %key, error = %e, "Failed to remove orphaned object");
            }
        }
    }

    /// List the caller's files with fresh read URLs.
    pub async fn list(&self, owner: Uuid, query: &ListQuery) -> AppResult<Page> {
        let mut page = self.docs.list(&owned(owner, query)).await?;
        let mut data = Vec::with_capacity(page.data.len());
        for doc in page.data {
            data.push(self.with_url(doc).await?);
        }
        page.data = data;
        Ok(page)
    }

    /// One of the caller's files with a fresh read URL.
    pub async fn get(&self, owner: Uuid, id: Uuid, query: &ListQuery) -> AppResult<Value> {
        let doc = self.docs.get(id, &owned(owner, query)).await?;
        self.with_url(doc).await
    }

    /// Remove the stored object, then its row.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<()> {
        let file = self
            .files
            .find_owned(id, owner)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

        self.storage.delete(&file.storage_key()).await?;
        self.files.delete(file.id).await?;

        info!(user_id = %owner, file_id = %id, "Deleted file");
        Ok(())
    }

    /// Add a presigned `url`. Documents projected without `folder` or `name`
    /// are returned unchanged.
    async fn with_url(&self, mut doc: Value) -> AppResult<Value> {
        let key = match (
            doc.get("folder").and_then(Value::as_str),
            doc.get("name").and_then(Value::as_str),
        ) {
            (Some(folder), Some(name)) => format!("{folder}/{name}"),
            _ => return Ok(doc),
        };

        let url = self.storage.presigned_url(&key, self.url_ttl).await?;
        if let Value::Object(map) = &mut doc {
            map.insert("url".into(), Value::String(url));
        }
        Ok(doc)
    }
}

fn owned(owner: Uuid, query: &ListQuery) -> ListQuery {
    query
        .clone()
        .with_filter(FilterField::eq("created_by", owner.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_scope_overrides_client_filter() {
        let owner = Uuid::new_v4();
        let query = ListQuery::from_pairs([("created_by", Uuid::new_v4().to_string())]).unwrap();
        let scoped = owned(owner, &query);
        assert_eq!(scoped.filters.len(), 1);
        assert_eq!(scoped.filters[0].value, owner.to_string());
    }
}
