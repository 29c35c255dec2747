//! Listing image uploads: size check, re-encode, store.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::container::parallel;
use crate::config::{LISTING_IMAGE_PREFIX, MAX_IMAGE_BYTES};
use crate::errors::{AppError, AppResult};
use crate::infra::{ImageEncoder, ObjectStorage};

/// Concurrent encode/store operations per upload batch.
const UPLOAD_CONCURRENCY: usize = 4;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Store every image and return their public URLs in input order.
    ///
    /// All sizes are checked before anything is stored.
    async fn upload_listing_images(&self, images: Vec<Vec<u8>>) -> AppResult<Vec<String>>;
}

pub struct MediaUploader {
    storage: Arc<dyn ObjectStorage>,
    encoder: Arc<dyn ImageEncoder>,
}

impl MediaUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, encoder: Arc<dyn ImageEncoder>) -> Self {
        Self { storage, encoder }
    }

    async fn upload_one(&self, bytes: Vec<u8>) -> AppResult<String> {
        let encoder = self.encoder.clone();
        let encoded = tokio::task::spawn_blocking(move || encoder.encode(&bytes))
            .await
            .map_err(|e| AppError::internal(format!("Image encoding task failed: {}", e)))??;

        let key = format!("{}{}.{}", LISTING_IMAGE_PREFIX, Uuid::new_v4(), encoded.extension);
        self.storage
            .put(&key, encoded.bytes, encoded.content_type)
            .await
    }
}

#[async_trait]
impl ImageUploader for MediaUploader {
    async fn upload_listing_images(&self, images: Vec<Vec<u8>>) -> AppResult<Vec<String>> {
        if let Some(oversized) = images.iter().find(|bytes| bytes.len() > MAX_IMAGE_BYTES) {
            return Err(AppError::validation(format!(
                "Image exceeds the {} MB limit ({} bytes)",
                MAX_IMAGE_BYTES / (1024 * 1024),
                oversized.len()
            )));
        }

        let count = images.len();
        let urls = parallel::join_all_limited(
            images.into_iter().map(|bytes| self.upload_one(bytes)),
            UPLOAD_CONCURRENCY,
        )
        .await?;

        tracing::debug!(count, "Listing images stored");
        Ok(urls)
    }
}
