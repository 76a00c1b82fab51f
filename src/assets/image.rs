//! Image normalization for materialized assets.
//!
//! Oversized images are scaled down to a maximum display width and re-encoded
//! in place. Normalization always re-encodes, even when no resize happens, so
//! every materialized image passes through the same encoder settings exactly
//! once per target directory.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;
use log::debug;

use crate::error::Result;

/// Maximum width of a normalized image, in pixels.
pub const MAX_IMAGE_WIDTH: u32 = 700;

/// JPEG re-encode quality (0.8 on the usual 0–1 scale).
pub const JPEG_QUALITY: u8 = 80;

// ============================================================================
// Collaborator Trait
// ============================================================================

/// Decides what counts as an image and rewrites images in place.
pub trait ImageNormalizer {
    fn is_image(&self, path: &Path) -> bool;

    /// Normalize the image at `path`, overwriting it.
    fn normalize(&self, path: &Path) -> Result<()>;
}

// ============================================================================
// Standard Implementation
// ============================================================================

/// The default normalizer backed by the `image` crate.
///
/// Resizes anything wider than `max_width` to fit within it, preserving
/// aspect ratio with a triangle filter (linear; a middle ground between
/// nearest-neighbor speed and Lanczos fidelity), then re-encodes in the
/// original format. JPEG output uses `jpeg_quality`; lossless formats carry
/// no quality scalar and re-encode with their default settings.
#[derive(Debug, Clone)]
pub struct StandardNormalizer {
    pub max_width: u32,
    pub jpeg_quality: u8,
}

impl Default for StandardNormalizer {
    fn default() -> Self {
        StandardNormalizer {
            max_width: MAX_IMAGE_WIDTH,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl ImageNormalizer for StandardNormalizer {
    fn is_image(&self, path: &Path) -> bool {
        matches!(
            ImageFormat::from_path(path),
            Ok(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP)
        )
    }

    fn normalize(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path)?;
        let img = image::open(path)?;

        let img = if img.width() > self.max_width {
            debug!(
                "resizing {} from {}px wide to {}px",
                path.display(),
                img.width(),
                self.max_width
            );
            img.resize(self.max_width, u32::MAX, FilterType::Triangle)
        } else {
            img
        };

        let mut encoded = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let mut encoder =
                    JpegEncoder::new_with_quality(Cursor::new(&mut encoded), self.jpeg_quality);
                // JPEG has no alpha channel.
                encoder.encode_image(&img.to_rgb8())?;
            }
            _ => img.write_to(&mut Cursor::new(&mut encoded), format)?,
        }
        fs::write(path, encoded)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
