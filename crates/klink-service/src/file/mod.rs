//! File uploads.

pub mod rules;
pub mod service;

pub use service::{FileService, UploadPart};
