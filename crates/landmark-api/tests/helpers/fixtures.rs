//! Test fixtures: generated images and multipart forms.

use std::io::Cursor;

use axum_test::multipart::{MultipartForm, Part};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MIB: usize = 1024 * 1024;

/// Encoded PNG with a horizontal gradient.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        Rgb([(x * 255 / width.max(1)) as u8, 120, 200])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// Noise-filled JPEG. Random pixels defeat compression, so a 1200x900 frame
/// encodes to roughly 2 MB.
pub fn noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(7);
    let img = RgbImage::from_fn(width, height, |_, _| Rgb(rng.random::<[u8; 3]>()));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, 90))
        .expect("encode jpeg");
    out
}

pub fn image_part(data: Vec<u8>, file_name: &str, mime: &str) -> Part {
    Part::bytes(data).file_name(file_name).mime_type(mime)
}

pub fn project_form(name: &str, description: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("description", description)
}

pub fn client_form(name: &str, description: &str, designation: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("description", description)
        .add_text("designation", designation)
}

/// Lakeview Tower with a ~2 MB JPEG attached as `projectImage`.
pub fn lakeview_tower() -> MultipartForm {
    project_form("Lakeview Tower", "A 12-story residential tower").add_part(
        "projectImage",
        image_part(noisy_jpeg(1200, 900), "tower.jpg", "image/jpeg"),
    )
}
