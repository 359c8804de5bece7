//! Serves objects from the local provider through signed links.

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::Response;
use serde::Deserialize;

use klink_core::error::AppError;
use klink_service::file::rules::{extension_of, mime_for};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of a signed `/storage` link.
#[derive(Debug, Deserialize)]
pub struct SignedLink {
    /// Unix timestamp after which the link is dead.
    pub expires: i64,
    /// Hex signature over the key and expiry.
    pub signature: String,
}

/// GET /storage/{*key}
pub async fn read_object(
    State(state): State<AppState>,
    Path(key): Path<String>,
    link: Result<Query<SignedLink>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(link) = link.map_err(|_| AppError::forbidden("Invalid link signature"))?;
    let signer = state
        .url_signer
        .as_ref()
        .ok_or_else(|| AppError::not_found(format!("Cannot find /storage/{key} on this server")))?;
    signer.verify(&key, link.expires, &link.signature)?;

    let stream = state.storage.read(&key).await?;
    let content_type = extension_of(&key)
        .map(|ext| mime_for(&ext))
        .unwrap_or("application/octet-stream");

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "private, max-age=300")
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")).into())
}
