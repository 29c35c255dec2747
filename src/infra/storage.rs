//! Object storage for uploaded media.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String>;

    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Writes objects below a local directory that the HTTP server exposes
/// under `base_url`.
pub struct LocalObjectStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(AppError::internal(format!("Invalid object key: {}", key)));
        }
        Ok(self.root.join(relative))
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::internal(format!("Failed to create media dir: {}", e)))?;
        }

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write object: {}", e)))?;

        tracing::debug!(key, content_type, size = bytes.len(), "Stored object");
        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("Failed to delete object: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_storage() -> LocalObjectStorage {
        let root = std::env::temp_dir().join(format!("wayfarer-media-{}", uuid::Uuid::new_v4()));
        LocalObjectStorage::new(root, "http://localhost:3000/media/")
    }

    #[tokio::test]
    async fn test_put_writes_file_and_returns_public_url() {
        let storage = scratch_storage();
        let url = storage
            .put("listings/abc.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/media/listings/abc.jpg");
        let written = tokio::fs::read(storage.root().join("listings/abc.jpg"))
            .await
            .unwrap();
        assert_eq!(written, vec![1, 2, 3]);

        storage.delete("listings/abc.jpg").await.unwrap();
        storage.delete("listings/abc.jpg").await.unwrap();
        let _ = tokio::fs::remove_dir_all(storage.root()).await;
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_root() {
        let storage = scratch_storage();
        assert!(storage.put("../etc/passwd", vec![], "text/plain").await.is_err());
        assert!(storage.put("/abs.jpg", vec![], "image/jpeg").await.is_err());
        assert!(storage.put("", vec![], "image/jpeg").await.is_err());
    }
}
