//! Upload, list, read, and delete the caller's files.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde_json::Value;

use klink_core::error::{AppError, ErrorKind};
use klink_service::UploadPart;

use crate::dto::response::{ApiResponse, BatchResponse, ListResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, ListParams};
use crate::state::AppState;

fn multipart_error(err: MultipartError) -> AppError {
    let kind = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorKind::PayloadTooLarge
    } else {
        ErrorKind::Validation
    };
    AppError::new(kind, err.body_text())
}

/// Collect every file part. Plain form fields are ignored.
async fn read_parts(mut multipart: Multipart) -> Result<Vec<UploadPart>, AppError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        parts.push(UploadPart {
            field: name,
            file_name,
            content_type,
            data,
        });
    }

    Ok(parts)
}

/// POST /api/v1/files
pub async fn upload_files(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    let parts = read_parts(multipart).await?;
    let docs = state.files.upload(auth.user_id(), parts).await?;
    Ok((StatusCode::CREATED, Json(BatchResponse::new(docs))))
}

/// GET /api/v1/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse>, ApiError> {
    let page = state.files.list(auth.user_id(), &query).await?;
    Ok(Json(ListResponse::from(page)))
}

/// GET /api/v1/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ListParams(query): ListParams,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let doc = state.files.get(auth.user_id(), id, &query).await?;
    Ok(Json(ApiResponse::ok(doc)))
}

/// DELETE /api/v1/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.files.delete(auth.user_id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
