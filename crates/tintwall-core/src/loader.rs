//! Source image loading and one-shot pixel capture.
//!
//! The host (browser or CLI) performs the actual asynchronous load and
//! reports completion through [`SourceImageLoader::on_load`]. The loader
//! scales the image to canonical size, draws it on the page's primary
//! surface, and captures a [`RawPixelBuffer`] back from that surface.
//!
//! Capture happens at most once: later load signals are ignored.

use image::imageops::{self, FilterType};

use crate::page::Page;
use crate::types::{Dimensions, GalleryError, RawPixelBuffer, RgbaImage};

/// Decode raw image bytes (PNG, JPEG, BMP, WebP) into RGBA.
///
/// Native hosts use this to turn a file into the image passed to
/// [`SourceImageLoader::on_load`].
///
/// # Errors
///
/// Returns [`GalleryError::EmptyInput`] if `bytes` is empty.
/// Returns [`GalleryError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, GalleryError> {
    if bytes.is_empty() {
        return Err(GalleryError::EmptyInput);
    }
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Loads the base image and captures its pixels exactly once.
#[derive(Debug, Clone)]
pub struct SourceImageLoader {
    source: String,
    size: Dimensions,
    captured: bool,
}

impl SourceImageLoader {
    /// A loader for `source` that captures at `size`.
    #[must_use]
    pub fn new(source: impl Into<String>, size: Dimensions) -> Self {
        Self {
            source: source.into(),
            size,
            captured: false,
        }
    }

    /// Path or URL the host should load.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the buffer has already been captured.
    #[must_use]
    pub const fn is_captured(&self) -> bool {
        self.captured
    }

    /// Handle the image-load completion signal.
    ///
    /// On the first call: scale `image` to canonical size, draw it on the
    /// primary surface, read the surface back, and return the captured
    /// buffer. Every later call returns `Ok(None)` without touching the
    /// page.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Page`] if drawing or reading the primary
    /// surface fails. A failed capture can be retried by the next signal.
    pub fn on_load<P: Page>(
        &mut self,
        page: &mut P,
        image: &RgbaImage,
    ) -> Result<Option<RawPixelBuffer>, GalleryError> {
        if self.captured {
            log::debug!("ignoring repeated load signal for {}", self.source);
            return Ok(None);
        }

        let scaled = if Dimensions::of(image) == self.size {
            image.clone()
        } else {
            let Dimensions { width, height } = self.size;
            imageops::resize(image, width, height, FilterType::Triangle)
        };
        page.draw_primary(&scaled)?;
        let pixels = page.read_primary(self.size)?;
        self.captured = true;

        log::info!(
            "captured {} from {} ({} source)",
            self.size,
            self.source,
            Dimensions::of(image)
        );
        Ok(Some(RawPixelBuffer::new(pixels)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::memory::MemoryPage;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn decode_empty_input() {
        assert!(matches!(decode(&[]), Err(GalleryError::EmptyInput)));
    }

    #[test]
    fn decode_corrupt_input() {
        assert!(matches!(
            decode(&[0xFF, 0x00, 0x12]),
            Err(GalleryError::ImageDecode(_))
        ));
    }

    #[test]
    fn decode_png_keeps_pixels() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let decoded = decode(&encode_png(&image)).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn capture_scales_to_canonical_size() {
        let size = Dimensions::new(22, 27);
        let mut page = MemoryPage::new(size, 0);
        let mut loader = SourceImageLoader::new("city.png", size);
        let image = RgbaImage::from_pixel(100, 50, Rgba([200, 100, 50, 255]));

        let buffer = loader.on_load(&mut page, &image).unwrap().unwrap();
        assert_eq!(buffer.dimensions(), size);
        assert!(buffer.pixels().pixels().all(|p| p.0 == [200, 100, 50, 255]));
        assert_eq!(buffer.pixels(), page.primary());
    }

    #[test]
    fn capture_happens_at_most_once() {
        let size = Dimensions::new(4, 4);
        let mut page = MemoryPage::new(size, 0);
        let mut loader = SourceImageLoader::new("city.png", size);
        let first = RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255]));
        let second = RgbaImage::from_pixel(4, 4, Rgba([2, 2, 2, 255]));

        assert!(loader.on_load(&mut page, &first).unwrap().is_some());
        for _ in 0..3 {
            assert!(loader.on_load(&mut page, &second).unwrap().is_none());
        }
        assert!(loader.is_captured());
        assert_eq!(page.primary_draws(), 1);
        assert_eq!(page.primary(), &first);
    }
}
