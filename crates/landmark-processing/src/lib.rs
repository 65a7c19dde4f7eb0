//! Image handling for the upload pipeline
//!
//! - [`cropper`]: interactive fixed-aspect crop that renders a 450×350 JPEG
//! - [`validator`]: server-side ingress gate for uploaded file parts
//! - [`imaging`]: decode, fill-crop and encode helpers shared by both
//! - [`preview`]: scoped preview URLs that are released on drop

pub mod cropper;
pub mod imaging;
pub mod preview;
pub mod validator;

pub use cropper::{
    AspectRatio, CropConfig, CropError, CropSession, CroppedImage, DrawingSurface, ImageCropper,
    PixelRegion, RasterSurface, Rect, SourceFile,
};
pub use imaging::{decode_image, encode_jpeg, fill_crop, ImageResize};
pub use preview::{PreviewRegistry, PreviewUrl};
pub use validator::{CappedBuffer, IngressError, IngressValidator};
