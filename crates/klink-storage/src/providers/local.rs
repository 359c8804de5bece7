//! Local filesystem storage provider.
//!
//! Objects are plain files under `root_path`. Read URLs point back at the
//! API's `/storage/<key>` route and carry an expiry plus a signature that
//! [`UrlSigner::verify`] checks before the file is served.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::fs;
use tokio_util::io::ReaderStream;

use klink_core::config::LocalStorageConfig;
use klink_core::error::{AppError, ErrorKind};
use klink_core::result::AppResult;
use klink_core::traits::storage::{ByteStream, StorageProvider};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies `/storage/<key>?expires=..&signature=..` URLs.
#[derive(Clone)]
pub struct UrlSigner {
    secret: String,
    base_url: String,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl UrlSigner {
    /// Create a signer for URLs rooted at `base_url`.
    pub fn new(secret: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// HMAC over `key` and `expires`, keyed with the signing secret.
    fn mac(&self, key: &str, expires: i64) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|_| AppError::internal("Invalid signing key"))?;
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    /// Hex signature for `key` valid until the unix timestamp `expires`.
    pub fn signature(&self, key: &str, expires: i64) -> AppResult<String> {
        Ok(hex::encode(self.mac(key, expires)?.finalize().into_bytes()))
    }

    /// Build a URL granting read access to `key` for `expires_in`.
    pub fn sign(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        let expires = Utc::now()
            .timestamp()
            .saturating_add(i64::try_from(expires_in.as_secs()).unwrap_or(i64::MAX));
        Ok(format!(
            "{}/storage/{}?expires={}&signature={}",
            self.base_url,
            key,
            expires,
            self.signature(key, expires)?
        ))
    }

    /// Check a signature and expiry taken from a `/storage` request.
    ///
    /// The comparison runs in constant time.
    pub fn verify(&self, key: &str, expires: i64, signature: &str) -> AppResult<()> {
        if expires < Utc::now().timestamp() {
            return Err(AppError::forbidden("This link has expired"));
        }
        let provided =
            hex::decode(signature).map_err(|_| AppError::forbidden("Invalid link signature"))?;
        self.mac(key, expires)?
            .verify_slice(&provided)
            .map_err(|_| AppError::forbidden("Invalid link signature"))
    }
}

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored objects.
    root: PathBuf,
    signer: UrlSigner,
}

impl LocalStorageProvider {
    /// Create a provider rooted at `config.root_path`, creating the directory
    /// if it does not exist.
    pub async fn new(config: &LocalStorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;

        tracing::info!(root = %root.display(), "Local storage provider ready");

        Ok(Self {
            root,
            signer: UrlSigner::new(&config.signing_secret, &config.public_base_url),
        })
    }

    /// The signer used for read URLs.
    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    /// Resolve a key to a path under the root. Keys may not escape the root.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !clean || key.is_empty() {
            return Err(AppError::validation(format!("Invalid storage key: {key}")));
        }
        Ok(self.root.join(relative))
    }

    async fn ensure_parent(path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        Self::ensure_parent(&path).await?;
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write: {key}"), e)
        })?;
        tracing::debug!(key, bytes = data.len(), "Stored object");
        Ok(())
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        let path = self.resolve(key)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {key}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open: {key}"), e)
            }
        })?;
        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key, "Deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> AppResult<String> {
        self.signer.sign(key, expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    async fn provider(dir: &tempfile::TempDir) -> LocalStorageProvider {
        let config = LocalStorageConfig {
            root_path: dir.path().to_string_lossy().to_string(),
            public_base_url: "http://localhost:4000/".into(),
            signing_secret: "secret".into(),
        };
        LocalStorageProvider::new(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_put_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;

        let data = Bytes::from("hello world");
        provider
            .put("images/a.txt", data.clone(), "text/plain")
            .await
            .unwrap();
        assert!(provider.exists("images/a.txt").await.unwrap());

        let chunks: Vec<Bytes> = provider
            .read("images/a.txt")
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks.concat(), data.to_vec());

        provider.delete("images/a.txt").await.unwrap();
        assert!(!provider.exists("images/a.txt").await.unwrap());
        // Deleting again is fine.
        provider.delete("images/a.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        let err = provider.read("images/missing.png").await.err().unwrap();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        let err = provider
            .put("../escape.txt", Bytes::from("x"), "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_presigned_url_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        let url = provider
            .presigned_url("images/a.png", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:4000/storage/images/a.png?expires="));

        let query = url.split_once('?').unwrap().1;
        let mut expires = 0;
        let mut signature = "";
        for pair in query.split('&') {
            match pair.split_once('=').unwrap() {
                ("expires", v) => expires = v.parse().unwrap(),
                ("signature", v) => signature = v,
                _ => {}
            }
        }
        assert!(provider.signer().verify("images/a.png", expires, signature).is_ok());
        assert!(provider.signer().verify("images/b.png", expires, signature).is_err());
    }

    #[test]
    fn test_expired_signature_rejected() {
        let signer = UrlSigner::new("secret", "http://localhost");
        let expires = Utc::now().timestamp() - 10;
        let signature = signer.signature("k", expires).unwrap();
        let err = signer.verify("k", expires, &signature).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let signer = UrlSigner::new("secret", "http://localhost");
        let expires = Utc::now().timestamp() + 60;
        let signature = signer.signature("k", expires).unwrap();
        assert!(signer.verify("k", expires, &signature).is_ok());

        let mut tampered = signature.clone();
        let last = if tampered.ends_with('0') { "1" } else { "0" };
        tampered.replace_range(tampered.len() - 1.., last);
        for bad in [tampered.as_str(), "not-hex", "", &signature[..10]] {
            let err = signer.verify("k", expires, bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Forbidden);
            assert_eq!(err.message, "Invalid link signature");
        }

        // A different secret must not validate the same link.
        let other = UrlSigner::new("other", "http://localhost");
        assert!(other.verify("k", expires, &signature).is_err());
    }
}
