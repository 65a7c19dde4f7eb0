use std::sync::Arc;
use std::time::Duration;

use landmark_core::Config;

use crate::{
    CloudinaryCredentials, CloudinaryImageStore, ImageStore, LocalImageStore, StorageBackend,
    StorageError, StorageResult,
};

/// Create the image store selected by configuration
pub async fn create_image_store(config: &Config) -> StorageResult<Arc<dyn ImageStore>> {
    let settings = config.upload_settings();

    match config.storage_backend() {
        StorageBackend::Cloudinary => {
            let required = |value: Option<&str>, name: &str| {
                value.map(String::from).ok_or_else(|| {
                    StorageError::ConfigError(format!("{} not configured", name))
                })
            };
            let credentials = CloudinaryCredentials {
                cloud_name: required(config.cloudinary_cloud_name(), "CLOUDINARY_CLOUD_NAME")?,
                api_key: required(config.cloudinary_api_key(), "CLOUDINARY_API_KEY")?,
                api_secret: required(config.cloudinary_api_secret(), "CLOUDINARY_API_SECRET")?,
            };
            let store = CloudinaryImageStore::new(
                credentials,
                config.cloudinary_api_base(),
                &settings,
                Duration::from_secs(config.upload_timeout_secs()),
            )?;
            tracing::info!(folder = %settings.folder, "Using Cloudinary image store");
            Ok(Arc::new(store))
        }

        StorageBackend::Local => {
            let store = LocalImageStore::new(config.local_storage_path(), &settings).await?;
            tracing::info!(
                path = %store.base_path().display(),
                "Using local image store"
            );
            Ok(Arc::new(store))
        }
    }
}
