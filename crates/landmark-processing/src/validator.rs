//! Ingress validation for uploaded file parts.
//!
//! The validator is consulted twice per file part: once with the declared
//! content type before any bytes are read, and then chunk by chunk through a
//! [`CappedBuffer`] so an oversized part is cut off as soon as it crosses the
//! limit instead of being buffered in full.

use bytes::{Bytes, BytesMut};
use landmark_core::{AppError, UploadCandidate, UploadSettings};

const IMAGE_FAMILY: &str = "image/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngressError {
    #[error("Only image files are allowed (received {content_type})")]
    UnsupportedContentType { content_type: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Only one image file may be uploaded")]
    MultipleFiles,
}

impl From<IngressError> for AppError {
    fn from(err: IngressError) -> Self {
        AppError::PayloadRejected(err.to_string())
    }
}

/// Server-side gate for image uploads
#[derive(Debug, Clone)]
pub struct IngressValidator {
    max_file_size: usize,
}

impl IngressValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::new(settings.max_file_size_bytes)
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Accept only the image family. Returns the normalized content type.
    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<String, IngressError> {
        let declared = content_type.unwrap_or("").trim();
        let normalized = declared.to_lowercase();
        if !normalized.starts_with(IMAGE_FAMILY) {
            return Err(IngressError::UnsupportedContentType {
                content_type: if declared.is_empty() {
                    "no content type".to_string()
                } else {
                    declared.to_string()
                },
            });
        }
        Ok(normalized)
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), IngressError> {
        if size == 0 {
            return Err(IngressError::EmptyFile);
        }
        if size > self.max_file_size {
            return Err(IngressError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Buffer sized for this validator's limit.
    pub fn buffer(&self) -> CappedBuffer {
        CappedBuffer::new(self.max_file_size)
    }

    /// Validate a fully buffered part and hand it over as a candidate.
    pub fn accept(
        &self,
        content_type: Option<&str>,
        data: Bytes,
        file_name: Option<String>,
    ) -> Result<UploadCandidate, IngressError> {
        let content_type = self.validate_content_type(content_type)?;
        self.validate_file_size(data.len())?;
        let mut candidate = UploadCandidate::new(data, content_type);
        candidate.file_name = file_name;
        Ok(candidate)
    }
}

/// Accumulates chunks, failing once the running total passes the cap.
#[derive(Debug)]
pub struct CappedBuffer {
    buf: BytesMut,
    max: usize,
}

impl CappedBuffer {
    pub fn new(max: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            max,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<(), IngressError> {
        let size = self.buf.len() + chunk.len();
        if size > self.max {
            return Err(IngressError::FileTooLarge {
                size,
                max: self.max,
            });
        }
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}
