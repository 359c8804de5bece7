//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;
pub mod query;

pub use auth::{AuthUser, TOKEN_COOKIE};
pub use json::JsonBody;
pub use path::IdPath;
pub use query::ListParams;
