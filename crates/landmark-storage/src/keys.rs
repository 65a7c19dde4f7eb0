//! Key generation shared by the storage backends.

use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Public id for a new asset: `{folder}/{id}`.
pub(crate) fn generate_key(folder: &str, id: Uuid) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        id.to_string()
    } else {
        format!("{}/{}", folder, id)
    }
}

/// Reject keys that could escape the storage root.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
