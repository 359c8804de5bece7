//! Health check, root, and fallback handlers.

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, Uri};

use klink_core::error::AppError;

use crate::dto::response::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /
pub async fn root() -> &'static str {
    "WELCOME TO THE SERVER"
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let connected = sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .is_ok();

    let (status, label, database) = if connected {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            database: database.to_string(),
        }),
    )
}

/// Any route that matched nothing.
pub async fn not_found(uri: Uri) -> ApiError {
    AppError::not_found(format!("Cannot find {} on this server", uri.path())).into()
}
