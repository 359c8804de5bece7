//! Convenience result type alias for K-Link.

use crate::error::AppError;

/// A specialized `Result` type for K-Link operations.
pub type AppResult<T> = Result<T, AppError>;
