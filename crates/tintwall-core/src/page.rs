//! The page seam: everything the gallery needs from the surrounding page.
//!
//! A [`Page`] hands out opaque handles for tiles, surfaces, and
//! thumbnails, and performs the few element operations the gallery
//! relies on. The browser implementation lives in `tintwall-io`;
//! [`MemoryPage`](crate::memory::MemoryPage) is the in-memory one.
//!
//! The page only ever grows: the gallery inserts surfaces and labels,
//! and replaces pixels, but never removes or reorders existing children.

use crate::assignment::GroupId;
use crate::types::{Dimensions, RgbaImage};

/// A page operation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("page error: {0}")]
pub struct PageError(pub String);

impl PageError {
    /// Create a page error from any message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The document the gallery renders into.
pub trait Page {
    /// Handle to a tile container.
    type Tile: Clone;
    /// Handle to a rendering surface created by the gallery.
    type Surface: Clone;
    /// Handle to a demo-group thumbnail image.
    type Thumbnail: Clone;

    /// Tile containers in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the tiles cannot be enumerated.
    fn tiles(&self) -> Result<Vec<Self::Tile>, PageError>;

    /// Create a detached surface of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the surface cannot be created.
    fn create_surface(&mut self, size: Dimensions) -> Result<Self::Surface, PageError>;

    /// Append `surface` as the last child of `tile`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the insertion fails.
    fn attach_surface(
        &mut self,
        tile: &Self::Tile,
        surface: &Self::Surface,
    ) -> Result<(), PageError>;

    /// Replace the pixels shown by `surface`, anchored at its top-left.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the pixels cannot be written.
    fn put_pixels(&mut self, surface: &Self::Surface, pixels: &RgbaImage) -> Result<(), PageError>;

    /// Append a text label as the last child of `tile`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the label cannot be created or inserted.
    fn append_label(
        &mut self,
        tile: &Self::Tile,
        text: &str,
        class: &str,
    ) -> Result<(), PageError>;

    /// Draw `pixels` onto the primary drawing surface.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the primary surface is missing or the
    /// draw fails.
    fn draw_primary(&mut self, pixels: &RgbaImage) -> Result<(), PageError>;

    /// Read back the primary surface's pixels in a region of `size`
    /// anchored at its top-left.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the primary surface is missing or the
    /// read fails.
    fn read_primary(&self, size: Dimensions) -> Result<RgbaImage, PageError>;

    /// Thumbnails belonging to `group`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the group cannot be queried.
    fn thumbnails(&self, group: GroupId) -> Result<Vec<Self::Thumbnail>, PageError>;

    /// Whether `thumbnail` has finished decoding and can be read.
    fn thumbnail_ready(&self, thumbnail: &Self::Thumbnail) -> bool;

    /// The pixels currently displayed by `thumbnail`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the pixels cannot be read.
    fn read_thumbnail(&self, thumbnail: &Self::Thumbnail) -> Result<RgbaImage, PageError>;

    /// Replace the pixels displayed by `thumbnail`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError`] if the pixels cannot be written.
    fn write_thumbnail(
        &mut self,
        thumbnail: &Self::Thumbnail,
        pixels: &RgbaImage,
    ) -> Result<(), PageError>;
}
