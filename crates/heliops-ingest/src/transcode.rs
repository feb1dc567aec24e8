//! Best-effort image recompression.
//!
//! Bounds images to a maximum pixel envelope and re-encodes them to
//! canonical JPEG. Transcoding is an optimization, never a correctness
//! gate: any failure (decode error, empty output, re-encode not smaller)
//! results in the original bytes passing through unchanged.

use crate::types::{TranscodedFile, ValidatedFile};
use heliops_core::Config;
use image::codecs::jpeg::JpegEncoder;
use image::GenericImageView;
use std::io::Cursor;

/// Image transcoder
///
/// Declared total: [`ImageTranscoder::transcode`] always produces a
/// `TranscodedFile` and cannot abort the batch.
#[derive(Clone, Copy)]
pub struct ImageTranscoder {
    max_width: u32,
    max_height: u32,
    jpeg_quality: u8,
}

impl ImageTranscoder {
    pub fn new(max_width: u32, max_height: u32, jpeg_quality: u8) -> Self {
        Self {
            max_width,
            max_height,
            jpeg_quality,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_image_width,
            config.max_image_height,
            config.jpeg_quality,
        )
    }

    /// Target dimensions fitting the envelope, aspect ratio preserved.
    ///
    /// The longer dimension is clamped to its envelope bound, the shorter
    /// one scaled proportionally. None when the image already fits (never
    /// upscale).
    fn clamp_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width <= self.max_width && height <= self.max_height {
            return None;
        }
        let scale = (self.max_width as f32 / width as f32)
            .min(self.max_height as f32 / height as f32);
        let target_width = ((width as f32 * scale).round() as u32).max(1);
        let target_height = ((height as f32 * scale).round() as u32).max(1);
        Some((target_width, target_height))
    }

    /// Select filter type based on downscale ratio.
    fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    fn reencode(&self, data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()?;

        let (width, height) = img.dimensions();
        let img = match self.clamp_dimensions(width, height) {
            Some((target_width, target_height)) => {
                let filter = Self::select_filter(width, height, target_width, target_height);
                img.resize_exact(target_width, target_height, filter)
            }
            None => img,
        };

        // JPEG carries no alpha channel.
        let rgb = img.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(Cursor::new(&mut buffer), self.jpeg_quality)
            .encode_image(&rgb)?;

        Ok(buffer)
    }

    /// Recompress a validated file.
    ///
    /// Image decode/encode is CPU-bound; it runs off the async pool. The
    /// original bytes are returned whenever re-encoding fails or does not
    /// shrink the file, so output size never exceeds input size.
    pub async fn transcode(&self, file: ValidatedFile) -> TranscodedFile {
        let ValidatedFile {
            name,
            content_type,
            data,
        } = file;
        let original_len = data.len();

        let transcoder = *self;
        let input = data.clone();
        let result =
            tokio::task::spawn_blocking(move || transcoder.reencode(&input)).await;

        match result {
            Ok(Ok(encoded)) if !encoded.is_empty() && encoded.len() < original_len => {
                tracing::debug!(
                    file = %name,
                    original_bytes = original_len,
                    transcoded_bytes = encoded.len(),
                    "Image transcoded"
                );
                TranscodedFile {
                    name,
                    content_type: "image/jpeg".to_string(),
                    data: encoded,
                    transcoded: true,
                }
            }
            Ok(Ok(_)) => {
                tracing::debug!(file = %name, "Re-encoded image not smaller, keeping original bytes");
                TranscodedFile {
                    name,
                    content_type,
                    data,
                    transcoded: false,
                }
            }
            Ok(Err(e)) => {
                tracing::debug!(file = %name, error = %e, "Transcoding failed, keeping original bytes");
                TranscodedFile {
                    name,
                    content_type,
                    data,
                    transcoded: false,
                }
            }
            Err(e) => {
                tracing::debug!(file = %name, error = %e, "Transcoding task failed, keeping original bytes");
                TranscodedFile {
                    name,
                    content_type,
                    data,
                    transcoded: false,
                }
            }
        }
    }
}
