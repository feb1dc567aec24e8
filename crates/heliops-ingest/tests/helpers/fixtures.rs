//! Test fixtures: image blobs of controlled size and content.

use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Deterministic noise image encoded as PNG.
///
/// Noise defeats PNG's lossless compression, which keeps the fixture large
/// and makes a lossy JPEG re-encode reliably smaller.
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let mixed = x
            .wrapping_mul(2654435761)
            .wrapping_add(y.wrapping_mul(40503))
            .wrapping_mul(2246822519);
        image::Rgb([(mixed >> 16) as u8, (mixed >> 8) as u8, mixed as u8])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Small valid PNG, well under any ceiling.
pub fn small_png() -> Vec<u8> {
    noise_png(32, 32)
}

/// Flat-color PNG. Compresses better losslessly than as JPEG, so the
/// transcoder keeps the original bytes and content type.
pub fn flat_png() -> Vec<u8> {
    let img = RgbImage::from_pixel(16, 16, image::Rgb([40, 90, 200]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

/// Minimal PDF header bytes, for wrong-type fixtures.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF".to_vec()
}
