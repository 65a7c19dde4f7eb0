use std::io::Cursor;

use image::{DynamicImage, ImageResult};

/// Decode bytes of any supported format, sniffing the format from content.
pub fn decode_image(data: &[u8]) -> ImageResult<DynamicImage> {
    let cursor = Cursor::new(data);
    image::ImageReader::new(cursor)
        .with_guessed_format()?
        .decode()
}

/// Encode as baseline JPEG at `quality` (1-100). Alpha is dropped.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> ImageResult<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    let mut buffer = Vec::with_capacity((width * height) as usize / 4);
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.clamp(1, 100));
        rgb_img.write_with_encoder(encoder)?;
    }
    Ok(buffer)
}
