use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Durable result of the transform-and-store stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImageReference {
    /// Content address of the stored asset
    pub url: String,
    /// Opaque identifier assigned by the image service
    pub public_id: String,
}

/// Accepted file part, buffered in memory for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadCandidate {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Turn a stored image value into something a browser can load.
///
/// Values beginning with `http` are already absolute (remote store); anything
/// else is a legacy `/uploads/...` path and gets the local base URL prefixed.
pub fn resolve_image_url(value: &str, local_base_url: &str) -> String {
    if value.starts_with("http") {
        return value.to_string();
    }
    let base = local_base_url.trim_end_matches('/');
    if value.starts_with('/') {
        format!("{}{}", base, value)
    } else {
        format!("{}/{}", base, value)
    }
}
