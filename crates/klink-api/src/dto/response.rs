//! Response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use klink_core::types::Pagination;
use klink_service::crud::Page;

/// Value of `status` in every success envelope.
pub const SUCCESS: &str = "success";

/// `{status, data}` for a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `success`.
    pub status: String,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            status: SUCCESS.to_string(),
            data,
        }
    }
}

/// `{status, result, pagination, data}` for a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    /// Always `success`.
    pub status: String,
    /// Number of documents on this page.
    pub result: usize,
    /// Page metadata.
    pub pagination: Pagination,
    /// Documents on this page.
    pub data: Vec<Value>,
}

impl From<Page> for ListResponse {
    fn from(page: Page) -> Self {
        Self {
            status: SUCCESS.to_string(),
            result: page.data.len(),
            pagination: page.pagination,
            data: page.data,
        }
    }
}

/// `{status, result, data}` for a batch of created documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Always `success`.
    pub status: String,
    /// Number of documents.
    pub result: usize,
    /// The documents.
    pub data: Vec<Value>,
}

impl BatchResponse {
    /// Wrap created documents.
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            result: data.len(),
            data,
        }
    }
}

/// `{status, token, data}` returned by every flow that issues a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Always `success`.
    pub status: String,
    /// Signed JWT.
    pub token: String,
    /// The user document.
    pub data: Value,
}

/// `{status, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always `success`.
    pub status: String,
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a success message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// `connected` or `unavailable`.
    pub database: String,
}
