use std::fmt;

use landmark_core::UploadSettings;

/// Transformation requested from the image service.
///
/// Always a fill-crop to a fixed size with quality and format left to the
/// service: `c_fill,w_450,h_350/q_auto/f_auto` for the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformSpec {
    pub width: u32,
    pub height: u32,
}

impl TransformSpec {
    pub fn fill(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::fill(settings.width, settings.height)
    }
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self::from_settings(&UploadSettings::default())
    }
}

impl fmt::Display for TransformSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c_fill,w_{},h_{}/q_auto/f_auto", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_string() {
        assert_eq!(
            TransformSpec::default().to_string(),
            "c_fill,w_450,h_350/q_auto/f_auto"
        );
        assert_eq!(
            TransformSpec::fill(800, 600).to_string(),
            "c_fill,w_800,h_600/q_auto/f_auto"
        );
    }
}
