//! Fixed-aspect image cropper.
//!
//! [`ImageCropper::load`] validates and decodes a source file and opens a
//! [`CropSession`] with a centered initial selection. The session keeps the
//! selection inside the image at the configured aspect ratio through every
//! move and resize, and [`CropSession::finalize`] renders the selected region
//! to a JPEG of exactly the configured output size.

mod config;
mod selection;
mod surface;

pub use config::{AspectRatio, CropConfig, JPEG_QUALITY};
pub use selection::{PixelRegion, Rect};
pub use surface::{DrawingSurface, RasterSurface};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::{DynamicImage, GenericImageView};
use landmark_core::{AppError, UploadCandidate};

use crate::imaging::{decode_image, encode_jpeg, ImageResize};
use crate::preview::{PreviewRegistry, PreviewUrl};
use selection::Bounds;

pub const CROPPED_FILE_NAME: &str = "cropped-image.jpg";
pub const CROPPED_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CropError {
    #[error("{0}")]
    Validation(String),

    #[error("No 2D drawing context available")]
    Environment,

    #[error("Failed to encode cropped image: {0}")]
    Encoding(String),
}

impl From<CropError> for AppError {
    fn from(err: CropError) -> Self {
        match err {
            CropError::Validation(msg) => AppError::InvalidInput(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// A file picked by the administrator.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Rendered crop, ready for upload.
#[derive(Debug, Clone)]
pub struct CroppedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
    pub last_modified: DateTime<Utc>,
}

impl CroppedImage {
    pub fn into_upload_candidate(self) -> UploadCandidate {
        UploadCandidate::new(self.data, self.content_type).with_file_name(self.file_name)
    }
}

pub struct ImageCropper {
    config: CropConfig,
    previews: PreviewRegistry,
}

impl ImageCropper {
    pub fn new(config: CropConfig) -> Self {
        Self::with_previews(config, PreviewRegistry::new())
    }

    pub fn with_previews(config: CropConfig, previews: PreviewRegistry) -> Self {
        Self { config, previews }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn validate_source(&self, file: &SourceFile) -> Result<(), CropError> {
        self.config.validate()?;
        if !file.content_type.to_lowercase().starts_with("image/") {
            return Err(CropError::Validation(
                "Please select an image file".to_string(),
            ));
        }
        if file.size() == 0 {
            return Err(CropError::Validation("Selected file is empty".to_string()));
        }
        if file.size() > self.config.max_source_bytes() {
            return Err(CropError::Validation(format!(
                "File size must be less than {}MB",
                self.config.max_source_file_size_mb
            )));
        }
        Ok(())
    }

    /// Validate and decode `file` and open a session on it.
    ///
    /// `displayed` is the on-screen size of the preview; `None` (or a
    /// degenerate size) means the image is shown at native resolution.
    pub fn load(
        &self,
        file: SourceFile,
        displayed: Option<(f64, f64)>,
    ) -> Result<CropSession, CropError> {
        self.validate_source(&file)?;
        let preview = self.previews.create(file.data.clone());

        let source = decode_image(&file.data).map_err(|e| {
            tracing::debug!(file = %file.name, error = %e, "Source image failed to decode");
            CropError::Validation(format!("Could not read image: {}", e))
        })?;
        let native = source.dimensions();
        let displayed = match displayed {
            Some((w, h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => (w, h),
            _ => (native.0 as f64, native.1 as f64),
        };
        let selection = selection::initial_selection(
            displayed,
            self.config.aspect.value(),
            self.config.min_selection_size,
        );

        tracing::debug!(
            file = %file.name,
            width = native.0,
            height = native.1,
            "Crop session opened"
        );

        Ok(CropSession {
            config: self.config.clone(),
            source,
            native,
            displayed,
            selection,
            preview,
        })
    }
}

/// An open crop on one decoded source. Dropping it revokes the preview URL.
pub struct CropSession {
    config: CropConfig,
    source: DynamicImage,
    native: (u32, u32),
    displayed: Bounds,
    selection: Rect,
    preview: PreviewUrl,
}

impl CropSession {
    pub fn selection(&self) -> Rect {
        self.selection
    }

    pub fn preview_url(&self) -> &str {
        self.preview.as_str()
    }

    pub fn native_size(&self) -> (u32, u32) {
        self.native
    }

    pub fn displayed_size(&self) -> (f64, f64) {
        self.displayed
    }

    /// Drag the selection; movement past an edge is clipped.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> Rect {
        self.selection = selection::translate(
            self.selection,
            dx,
            dy,
            self.displayed,
            self.config.aspect.value(),
            self.config.min_selection_size,
        );
        self.selection
    }

    /// Resize around the selection's center, keeping the aspect ratio.
    pub fn resize_to(&mut self, width: f64) -> Rect {
        self.selection = selection::resize(
            self.selection,
            width,
            self.displayed,
            self.config.aspect.value(),
            self.config.min_selection_size,
        );
        self.selection
    }

    pub fn set_selection(&mut self, rect: Rect) -> Rect {
        self.selection = selection::fit(
            rect,
            self.displayed,
            self.config.aspect.value(),
            self.config.min_selection_size,
        );
        self.selection
    }

    pub fn native_region(&self) -> PixelRegion {
        selection::to_native(self.selection, self.displayed, self.native)
    }

    /// Render the selection onto `surface` and encode it.
    pub fn finalize(&self, surface: &mut dyn DrawingSurface) -> Result<CroppedImage, CropError> {
        let (width, height) = (self.config.output_width, self.config.output_height);
        let canvas = surface
            .context_2d(width, height)
            .ok_or(CropError::Environment)?;
        if canvas.dimensions() != (width, height) {
            return Err(CropError::Environment);
        }

        let region = self.native_region();
        let cropped = self
            .source
            .crop_imm(region.x, region.y, region.width, region.height);
        let scaled = ImageResize::resize_exact(&cropped, width, height).to_rgba8();
        image::imageops::replace(canvas, &scaled, 0, 0);

        let rendered = DynamicImage::ImageRgba8(canvas.clone());
        let data = encode_jpeg(&rendered, self.config.jpeg_quality())
            .map_err(|e| CropError::Encoding(e.to_string()))?;
        if data.is_empty() {
            return Err(CropError::Encoding("encoder produced no data".to_string()));
        }

        tracing::debug!(
            region.x = region.x,
            region.y = region.y,
            region.width = region.width,
            region.height = region.height,
            bytes = data.len(),
            "Crop rendered"
        );

        Ok(CroppedImage {
            file_name: CROPPED_FILE_NAME.to_string(),
            content_type: CROPPED_CONTENT_TYPE.to_string(),
            data: Bytes::from(data),
            last_modified: Utc::now(),
        })
    }
}
