use super::CropError;

/// JPEG quality factor of the rendered crop, on a 0 to 1 scale.
pub const JPEG_QUALITY: f32 = 0.9;

/// Fixed width:height ratio of the crop selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub num: u32,
    pub den: u32,
}

impl AspectRatio {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    pub fn value(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropConfig {
    pub aspect: AspectRatio,
    pub output_width: u32,
    pub output_height: u32,
    pub max_source_file_size_mb: f64,
    /// Smallest edge of the selection in displayed pixels, where the image allows it
    pub min_selection_size: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            aspect: AspectRatio::new(450, 350),
            output_width: 450,
            output_height: 350,
            max_source_file_size_mb: 5.0,
            min_selection_size: 100.0,
        }
    }
}

impl CropConfig {
    /// Config whose aspect matches the output size.
    pub fn for_output(width: u32, height: u32) -> Self {
        Self {
            aspect: AspectRatio::new(width, height),
            output_width: width,
            output_height: height,
            ..Self::default()
        }
    }

    pub fn max_source_bytes(&self) -> usize {
        (self.max_source_file_size_mb * 1024.0 * 1024.0) as usize
    }

    pub fn jpeg_quality(&self) -> u8 {
        (JPEG_QUALITY * 100.0).round() as u8
    }

    pub fn validate(&self) -> Result<(), CropError> {
        if self.aspect.num == 0 || self.aspect.den == 0 {
            return Err(CropError::Validation(
                "Aspect ratio terms must be positive".to_string(),
            ));
        }
        if self.output_width == 0 || self.output_height == 0 {
            return Err(CropError::Validation(
                "Output dimensions must be positive".to_string(),
            ));
        }
        if self.max_source_file_size_mb.is_nan() || self.max_source_file_size_mb <= 0.0 {
            return Err(CropError::Validation(
                "Maximum source file size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
