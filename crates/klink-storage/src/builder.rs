//! Construct the configured storage provider.

use std::sync::Arc;

use klink_core::config::{StorageConfig, StorageProviderKind};
use klink_core::result::AppResult;
use klink_core::traits::storage::StorageProvider;

use crate::providers::LocalStorageProvider;

/// Build the provider selected by `storage.provider`.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    match config.provider {
        StorageProviderKind::Local => Ok(Arc::new(LocalStorageProvider::new(&config.local).await?)),
        #[cfg(feature = "s3")]
        StorageProviderKind::S3 => Ok(Arc::new(
            crate::providers::S3StorageProvider::new(&config.s3).await?,
        )),
        #[cfg(not(feature = "s3"))]
        StorageProviderKind::S3 => Err(klink_core::AppError::configuration(
            "S3 storage requires the `s3` feature",
        )),
    }
}
