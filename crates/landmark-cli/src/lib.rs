use std::path::Path;

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use landmark_core::UploadCandidate;
use landmark_processing::{
    CropConfig, CroppedImage, ImageCropper, RasterSurface, Rect, SourceFile,
};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse `x,y,width,height` in source pixels.
pub fn parse_selection(value: &str) -> Result<Rect, String> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in selection: {}", e))?;
    match parts.as_slice() {
        [x, y, w, h] if *w > 0.0 && *h > 0.0 => Ok(Rect::new(*x, *y, *w, *h)),
        [_, _, _, _] => Err("selection width and height must be positive".to_string()),
        _ => Err("selection must be x,y,width,height".to_string()),
    }
}

/// MIME type guessed from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

pub fn read_source(path: &Path) -> Result<SourceFile> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(SourceFile::new(name, content_type_for(path), data))
}

/// Crop `source` to the 450×350 output, at `selection` or the centered default.
pub fn crop_source(source: SourceFile, selection: Option<Rect>) -> Result<CroppedImage> {
    let cropper = ImageCropper::new(CropConfig::default());
    let mut session = cropper.load(source, None)?;
    if let Some(rect) = selection {
        let applied = session.set_selection(rect);
        tracing::debug!(
            x = applied.x,
            y = applied.y,
            width = applied.width,
            height = applied.height,
            "Selection normalized"
        );
    }
    let cropped = session.finalize(&mut RasterSurface::new())?;
    Ok(cropped)
}

/// Load the image at `path` for upload, cropping it unless `crop` is false.
pub fn prepare_image(path: &Path, crop: bool, selection: Option<Rect>) -> Result<UploadCandidate> {
    let source = read_source(path)?;
    if !crop {
        if selection.is_some() {
            bail!("--selection cannot be combined with --no-crop");
        }
        let candidate = UploadCandidate::new(source.data, source.content_type);
        return Ok(candidate.with_file_name(source.name));
    }
    let cropped = crop_source(source, selection)
        .with_context(|| format!("Failed to crop {}", path.display()))?;
    Ok(cropped.into_upload_candidate())
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
