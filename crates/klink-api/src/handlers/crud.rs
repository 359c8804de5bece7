//! Generic resource handlers, instantiated once per resource in the router.
//!
//! Every handler authenticates the caller, checks the role permission for
//! `(M::NAME, action)`, and delegates to the resource's `CrudService`.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Value;

use klink_entity::permission::PermissionAction;

use crate::dto::response::{ApiResponse, ListResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, JsonBody, ListParams};
use crate::middleware::rbac::authorize;
use crate::state::{AppState, CrudResource};

/// GET /api/v1/{resource}
pub async fn list<M: CrudResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse>, ApiError> {
    authorize(&state, &auth, M::NAME, PermissionAction::List)?;
    let page = M::service(&state).list(&query).await?;
    Ok(Json(ListResponse::from(page)))
}

/// POST /api/v1/{resource}
pub async fn create<M: CrudResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    authorize(&state, &auth, M::NAME, PermissionAction::Create)?;
    let doc = M::service(&state)
        .create(body, Some(auth.user_id()))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(doc))))
}

/// GET /api/v1/{resource}/{id}
pub async fn details<M: CrudResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ListParams(query): ListParams,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    authorize(&state, &auth, M::NAME, PermissionAction::Details)?;
    let doc = M::service(&state).get(id, &query).await?;
    Ok(Json(ApiResponse::ok(doc)))
}

/// PATCH /api/v1/{resource}/{id}
pub async fn update<M: CrudResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    authorize(&state, &auth, M::NAME, PermissionAction::Update)?;
    let doc = M::service(&state).update(id, body).await?;
    Ok(Json(ApiResponse::ok(doc)))
}

/// DELETE /api/v1/{resource}/{id}
pub async fn delete<M: CrudResource>(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    authorize(&state, &auth, M::NAME, PermissionAction::Delete)?;
    M::service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
