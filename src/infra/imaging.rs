//! Image re-encoding for listing uploads.

use image::{codecs::jpeg::JpegEncoder as JpegWriter, imageops::FilterType};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{IMAGE_MAX_HEIGHT, IMAGE_MAX_WIDTH, IMAGE_QUALITY};
use crate::errors::{AppError, AppResult};

/// Re-encoded image ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
    pub content_type: &'static str,
}

/// CPU-bound; callers run it on the blocking pool.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ImageEncoder: Send + Sync {
    fn encode(&self, bytes: &[u8]) -> AppResult<EncodedImage>;
}

/// Downscales into a bounding box (never enlarges) and writes lossy JPEG.
#[derive(Debug, Clone)]
pub struct JpegImageEncoder {
    max_width: u32,
    max_height: u32,
    quality: u8,
}

impl Default for JpegImageEncoder {
    fn default() -> Self {
        Self {
            max_width: IMAGE_MAX_WIDTH,
            max_height: IMAGE_MAX_HEIGHT,
            quality: IMAGE_QUALITY,
        }
    }
}

impl ImageEncoder for JpegImageEncoder {
    fn encode(&self, bytes: &[u8]) -> AppResult<EncodedImage> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| AppError::validation(format!("Unsupported image: {}", e)))?;

        let fitted = if decoded.width() > self.max_width || decoded.height() > self.max_height {
            decoded.resize(self.max_width, self.max_height, FilterType::Triangle)
        } else {
            decoded
        };

        let mut out = Vec::new();
        fitted
            .to_rgb8()
            .write_with_encoder(JpegWriter::new_with_quality(&mut out, self.quality))
            .map_err(|e| AppError::internal(format!("Image encoding failed: {}", e)))?;

        Ok(EncodedImage {
            bytes: out,
            extension: "jpg",
            content_type: "image/jpeg",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_large_image_is_downscaled_preserving_aspect() {
        let encoded = JpegImageEncoder::default().encode(&png(3840, 1920)).unwrap();
        assert_eq!(encoded.content_type, "image/jpeg");

        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1920, 960));
    }

    #[test]
    fn test_small_image_is_not_enlarged() {
        let encoded = JpegImageEncoder::default().encode(&png(640, 480)).unwrap();
        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (640, 480));
    }

    #[test]
    fn test_garbage_is_a_validation_error() {
        let result = JpegImageEncoder::default().encode(b"definitely not an image");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
