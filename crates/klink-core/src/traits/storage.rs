//! Storage provider trait for pluggable object storage backends.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for object storage backends.
///
/// Keys are slash-separated (`images/<name>.png`). Implementations live in
/// `klink-storage`: S3-compatible buckets and the local filesystem.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store an object under `key`, replacing any existing one.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Read an object as a byte stream.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Delete an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Produce a time-limited URL granting read access to `key`.
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> AppResult<String>;
}
