use image::RgbaImage;

/// Provider of a 2-D raster to paint the crop onto.
pub trait DrawingSurface {
    /// A canvas of exactly `width`×`height`, or `None` when no drawing
    /// context is available.
    fn context_2d(&mut self, width: u32, height: u32) -> Option<&mut RgbaImage>;
}

/// In-memory surface backed by an RGBA buffer.
#[derive(Debug, Default)]
pub struct RasterSurface {
    canvas: Option<RgbaImage>,
}

impl RasterSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last canvas handed out, if any.
    pub fn canvas(&self) -> Option<&RgbaImage> {
        self.canvas.as_ref()
    }
}

impl DrawingSurface for RasterSurface {
    fn context_2d(&mut self, width: u32, height: u32) -> Option<&mut RgbaImage> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(self.canvas.insert(RgbaImage::new(width, height)))
    }
}
