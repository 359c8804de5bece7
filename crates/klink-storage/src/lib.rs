//! # klink-storage
//!
//! Object storage for K-Link uploads. Supports S3-compatible buckets with
//! presigned read URLs and the local filesystem with signed `/storage` URLs.
//! Also hosts the image scaling applied to uploaded pictures.

pub mod builder;
pub mod imaging;
pub mod providers;

pub use builder::build_provider;
pub use providers::{LocalStorageProvider, UrlSigner};
