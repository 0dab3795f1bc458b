//! Decoded cover bitmaps.

use std::sync::Arc;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use crate::error::ArtworkError;

/// Edge length of every cover bitmap, in pixels.
pub const COVER_SIZE: u32 = 192;

/// Channel value of the neutral placeholder.
pub const PLACEHOLDER_GRAY: u8 = 96;

/// A decoded, square RGBA cover. Cloning shares the pixel buffer.
#[derive(Debug, Clone)]
pub struct CoverImage {
    pixels: Arc<RgbaImage>,
    placeholder: bool,
}

impl CoverImage {
    /// Solid gray square shown when no artwork is available.
    pub fn placeholder() -> Self {
        let gray = Rgba([PLACEHOLDER_GRAY, PLACEHOLDER_GRAY, PLACEHOLDER_GRAY, 255]);
        Self {
            pixels: Arc::new(RgbaImage::from_pixel(COVER_SIZE, COVER_SIZE, gray)),
            placeholder: true,
        }
    }

    /// Decodes an encoded image (PNG, JPEG, WebP, ...) and resizes it to
    /// [`COVER_SIZE`] on both axes.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, ArtworkError> {
        if bytes.is_empty() {
            return Err(ArtworkError::Empty);
        }
        let decoded = image::load_from_memory(bytes)?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(ArtworkError::Empty);
        }
        let resized = decoded.resize_exact(COVER_SIZE, COVER_SIZE, FilterType::Triangle);
        Ok(Self {
            pixels: Arc::new(resized.to_rgba8()),
            placeholder: false,
        })
    }

    /// Returns `true` for the gray fallback image.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Shared handle to the RGBA pixels.
    pub fn pixels(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.pixels)
    }
}

impl Default for CoverImage {
    fn default() -> Self {
        Self::placeholder()
    }
}
