//! Image store abstraction

use async_trait::async_trait;
use landmark_core::{AppError, StorageBackend, StoredImageReference, UploadCandidate};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Upload timed out: {0}")]
    Timeout(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Image transform failed: {0}")]
    Transform(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Timeout(msg) => AppError::Timeout(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::UploadFailed(other.to_string()),
        }
    }
}

/// Transform-and-store stage of the upload pipeline.
///
/// Implementations place the image under the configured folder, fill-crop it
/// to the configured size and return its durable reference. Failures are
/// never retried here; the caller surfaces them and the administrator
/// resubmits.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, candidate: UploadCandidate) -> StorageResult<StoredImageReference>;

    fn backend_type(&self) -> StorageBackend;
}
