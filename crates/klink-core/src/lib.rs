//! # klink-core
//!
//! Core crate for the K-Link commerce API. Contains configuration schemas,
//! the list-query language (filters, sorting, projection, pagination),
//! storage and mail traits, and the unified error system.
//!
//! This crate has **no** internal dependencies on other K-Link crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
