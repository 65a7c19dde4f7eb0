use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use landmark_core::{StorageBackend, StoredImageReference, UploadCandidate, UploadSettings};
use landmark_processing::{decode_image, encode_jpeg, fill_crop};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::keys::{generate_key, validate_key};
use crate::traits::{ImageStore, StorageError, StorageResult};
use crate::transform::TransformSpec;

/// URL prefix the API serves the storage directory under.
pub const UPLOADS_PREFIX: &str = "/uploads";

const JPEG_QUALITY: u8 = 90;

/// Local filesystem image store (legacy `/uploads` mode)
///
/// Performs the fill-crop in-process and writes JPEGs under
/// `{base_path}/{folder}/`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    base_path: PathBuf,
    folder: String,
    transform: TransformSpec,
}

impl LocalImageStore {
    /// # Arguments
    /// * `base_path` - Root directory for stored images (e.g. "uploads")
    pub async fn new(
        base_path: impl Into<PathBuf>,
        settings: &UploadSettings,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalImageStore {
            base_path,
            folder: settings.folder.clone(),
            transform: TransformSpec::from_settings(settings),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a key to a filesystem path that cannot leave the base directory.
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;

        let path = self.base_path.join(format!("{}.jpg", key));
        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        // The file does not exist yet; check the nearest existing ancestor.
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            if let Ok(canonical) = dir.canonicalize() {
                if canonical.strip_prefix(&base_canonical).is_err() {
                    return Err(StorageError::InvalidKey(
                        "Storage key resolves outside storage directory".to_string(),
                    ));
                }
                break;
            }
            ancestor = dir.parent();
        }

        Ok(path)
    }

    fn generate_url(key: &str) -> String {
        format!("{}/{}.jpg", UPLOADS_PREFIX, key)
    }

    async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;
        Ok(())
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    #[tracing::instrument(skip(self, candidate), fields(
        storage.backend = "local",
        size_bytes = candidate.len(),
    ))]
    async fn store(&self, candidate: UploadCandidate) -> StorageResult<StoredImageReference> {
        let start = Instant::now();
        let key = generate_key(&self.folder, Uuid::new_v4());
        let path = self.key_to_path(&key)?;

        let TransformSpec { width, height } = self.transform;
        let data = candidate.data;
        let encoded = tokio::task::spawn_blocking(move || {
            decode_image(&data)
                .and_then(|img| encode_jpeg(&fill_crop(&img, width, height), JPEG_QUALITY))
        })
        .await
        .map_err(|e| StorageError::Transform(format!("Transform task failed: {}", e)))?
        .map_err(|e| StorageError::Transform(e.to_string()))?;

        Self::write_file(&path, &encoded).await?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = encoded.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local image store write successful"
        );

        Ok(StoredImageReference {
            url: Self::generate_url(&key),
            public_id: key,
        })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 30, 30])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    async fn store(dir: &TempDir) -> LocalImageStore {
        LocalImageStore::new(dir.path(), &UploadSettings::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn stores_fill_cropped_jpeg_under_folder() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir).await;

        for (w, h) in [(1200, 400), (300, 900)] {
            let stored = store
                .store(UploadCandidate::new(png(w, h), "image/png"))
                .await
                .unwrap();

            assert!(stored.public_id.starts_with("landmark-real-estate/"));
            assert_eq!(stored.url, format!("/uploads/{}.jpg", stored.public_id));

            let path = dir.path().join(format!("{}.jpg", stored.public_id));
            let bytes = std::fs::read(&path).unwrap();
            let written = image::load_from_memory(&bytes).unwrap();
            assert_eq!(written.dimensions(), (450, 350));
        }
    }

    #[tokio::test]
    async fn undecodable_bytes_fail_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir).await;
        let err = store
            .store(UploadCandidate::new(b"not an image".to_vec(), "image/png"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Transform(_)));
        assert!(!dir.path().join("landmark-real-estate").exists());
    }

    #[tokio::test]
    async fn key_to_path_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir).await;
        assert!(store.key_to_path("../escape").is_err());
        assert!(store.key_to_path("/etc/passwd").is_err());
        let ok = store.key_to_path("landmark-real-estate/abc").unwrap();
        assert!(ok.starts_with(dir.path()));
    }
}
