//! Decode, resize and encode helpers.

mod codec;
mod resize;

pub use codec::{decode_image, encode_jpeg};
pub use resize::{fill_crop, ImageResize};
