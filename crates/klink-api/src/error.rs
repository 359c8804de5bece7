//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use klink_core::error::{AppError, ErrorKind};

/// Message shown instead of internal details in production.
pub const GENERIC_MESSAGE: &str = "Something went very wrong!";

/// Production body of a non-operational error, attached to its response so
/// [`mask_internal_errors`] can swap it in.
#[derive(Debug, Clone)]
struct MaskedBody(ApiErrorResponse);

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// `fail` for client errors, `error` for server errors.
    pub status: String,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// HTTP-facing wrapper around [`AppError`].
///
/// Handlers return `Result<_, ApiError>`; `?` converts any `AppError`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ErrorKind::PayloadTooLarge
        } else {
            ErrorKind::Validation
        };
        Self(AppError::new(kind, rejection.body_text()))
    }
}

/// Status code for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Storage
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::ExternalService => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    fn body(&self, hide_internal: bool) -> (StatusCode, ApiErrorResponse) {
        let err = &self.0;
        let status = status_for(err.kind);

        let message = if err.is_operational() || !hide_internal {
            err.message.clone()
        } else {
            GENERIC_MESSAGE.to_string()
        };

        let body = ApiErrorResponse {
            status: if status.is_client_error() { "fail" } else { "error" }.to_string(),
            error: err.kind.to_string(),
            message,
        };
        (status, body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if !self.0.is_operational() {
            tracing::error!(
                kind = %self.0.kind,
                error = %self.0.message,
                source = ?self.0.source,
                "Internal server error"
            );
        }

        let (status, body) = self.body(false);
        let mut response = (status, Json(body)).into_response();
        if !self.0.is_operational() {
            let (_, masked) = self.body(true);
            response.extensions_mut().insert(MaskedBody(masked));
        }
        response
    }
}

/// Response mapper that replaces the message of non-operational errors with
/// [`GENERIC_MESSAGE`]. Layered onto the router in production only.
pub async fn mask_internal_errors(mut response: Response) -> Response {
    match response.extensions_mut().remove::<MaskedBody>() {
        Some(MaskedBody(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorKind::RateLimited), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            status_for(ErrorKind::ExternalService),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_operational_error_keeps_message() {
        let err = ApiError(AppError::not_found("No document found with that ID"));
        let (status, body) = err.body(true);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.status, "fail");
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "No document found with that ID");
    }

    #[test]
    fn test_internal_error_masked_in_production() {
        let err = ApiError(AppError::database("relation \"users\" does not exist"));

        let (status, body) = err.body(true);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.status, "error");
        assert_eq!(body.message, GENERIC_MESSAGE);

        let (_, body) = err.body(false);
        assert_eq!(body.message, "relation \"users\" does not exist");
    }

    async fn message_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        body.message
    }

    #[tokio::test]
    async fn test_mask_only_touches_internal_errors() {
        let internal = ApiError(AppError::database("connection refused")).into_response();
        assert_eq!(message_of(internal).await, "connection refused");

        let internal = ApiError(AppError::database("connection refused")).into_response();
        let masked = mask_internal_errors(internal).await;
        assert_eq!(masked.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message_of(masked).await, GENERIC_MESSAGE);

        let conflict = ApiError(AppError::conflict("Duplicate field value: email")).into_response();
        let kept = mask_internal_errors(conflict).await;
        assert_eq!(kept.status(), StatusCode::CONFLICT);
        assert_eq!(message_of(kept).await, "Duplicate field value: email");
    }
}
