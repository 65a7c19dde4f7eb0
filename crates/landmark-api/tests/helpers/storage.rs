//! Fake image stores.

use std::sync::Mutex;

use async_trait::async_trait;
use landmark_core::models::{StoredImageReference, UploadCandidate};
use landmark_core::StorageBackend;
use landmark_storage::{ImageStore, StorageError, StorageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBehavior {
    Succeed,
    Fail,
    Timeout,
}

/// Records each candidate it receives and answers according to `behavior`.
pub struct RecordingStore {
    behavior: StoreBehavior,
    received: Mutex<Vec<UploadCandidate>>,
}

impl RecordingStore {
    pub fn new(behavior: StoreBehavior) -> Self {
        Self {
            behavior,
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received(&self) -> Vec<UploadCandidate> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingStore {
    async fn store(&self, candidate: UploadCandidate) -> StorageResult<StoredImageReference> {
        let n = {
            let mut received = self.received.lock().unwrap();
            received.push(candidate);
            received.len()
        };
        match self.behavior {
            StoreBehavior::Succeed => Ok(StoredImageReference {
                url: format!(
                    "https://res.cloudinary.com/demo/image/upload/v1/landmark-real-estate/img{}.jpg",
                    n
                ),
                public_id: format!("landmark-real-estate/img{}", n),
            }),
            StoreBehavior::Fail => Err(StorageError::UploadFailed(
                "Image service returned 500 Internal Server Error".to_string(),
            )),
            StoreBehavior::Timeout => Err(StorageError::Timeout(
                "image service did not answer within 30s".to_string(),
            )),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}
