//! In-memory [`Page`] implementation.
//!
//! Models just enough of a document for the gallery to run without a
//! browser: a primary surface, an ordered list of tiles whose children
//! are surfaces and labels, and per-group thumbnail rows. Used by the
//! contact-sheet CLI and throughout the tests.

use std::collections::BTreeMap;

use image::imageops;

use crate::assignment::GroupId;
use crate::page::{Page, PageError};
use crate::types::{Dimensions, RgbaImage};

/// Handle to a tile in a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(usize);

/// Handle to a surface in a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(usize);

/// Handle to a thumbnail in a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailId {
    group: GroupId,
    index: usize,
}

/// A child element of a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryNode {
    /// A surface created by the gallery.
    Surface(SurfaceId),
    /// A text label.
    Label {
        /// Label text.
        text: String,
        /// Label class name.
        class: String,
    },
}

#[derive(Debug, Clone)]
struct Thumbnail {
    pixels: RgbaImage,
    decoded: bool,
}

/// A document held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    primary: RgbaImage,
    primary_draws: usize,
    tiles: Vec<Vec<MemoryNode>>,
    surfaces: Vec<RgbaImage>,
    groups: BTreeMap<GroupId, Vec<Thumbnail>>,
}

impl MemoryPage {
    /// A page with a blank primary surface of `primary` size and
    /// `tile_count` empty tiles.
    #[must_use]
    pub fn new(primary: Dimensions, tile_count: usize) -> Self {
        Self {
            primary: RgbaImage::new(primary.width, primary.height),
            primary_draws: 0,
            tiles: vec![Vec::new(); tile_count],
            surfaces: Vec::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Append a decoded thumbnail to `group`.
    pub fn add_thumbnail(&mut self, group: GroupId, pixels: RgbaImage) -> ThumbnailId {
        self.push_thumbnail(group, pixels, true)
    }

    /// Append a thumbnail that has not finished decoding yet.
    pub fn add_pending_thumbnail(&mut self, group: GroupId, pixels: RgbaImage) -> ThumbnailId {
        self.push_thumbnail(group, pixels, false)
    }

    fn push_thumbnail(&mut self, group: GroupId, pixels: RgbaImage, decoded: bool) -> ThumbnailId {
        let row = self.groups.entry(group).or_default();
        row.push(Thumbnail { pixels, decoded });
        ThumbnailId {
            group,
            index: row.len() - 1,
        }
    }

    /// Mark a pending thumbnail as decoded.
    pub fn mark_decoded(&mut self, id: ThumbnailId) {
        if let Some(thumbnail) = self.thumbnail_mut(id) {
            thumbnail.decoded = true;
        }
    }

    /// Number of tiles.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Children of the tile at `index`, in insertion order.
    #[must_use]
    pub fn children(&self, index: usize) -> &[MemoryNode] {
        self.tiles.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Label texts of the tile at `index`, in insertion order.
    #[must_use]
    pub fn labels(&self, index: usize) -> Vec<&str> {
        self.children(index)
            .iter()
            .filter_map(|node| match node {
                MemoryNode::Label { text, .. } => Some(text.as_str()),
                MemoryNode::Surface(_) => None,
            })
            .collect()
    }

    /// Pixels of a surface.
    #[must_use]
    pub fn surface_pixels(&self, id: SurfaceId) -> Option<&RgbaImage> {
        self.surfaces.get(id.0)
    }

    /// Size of a surface.
    #[must_use]
    pub fn surface_size(&self, id: SurfaceId) -> Option<Dimensions> {
        self.surface_pixels(id).map(Dimensions::of)
    }

    /// Pixels currently shown by a thumbnail.
    #[must_use]
    pub fn thumbnail_pixels(&self, id: ThumbnailId) -> Option<&RgbaImage> {
        self.groups
            .get(&id.group)
            .and_then(|row| row.get(id.index))
            .map(|t| &t.pixels)
    }

    /// Current primary surface pixels.
    #[must_use]
    pub const fn primary(&self) -> &RgbaImage {
        &self.primary
    }

    /// How many times the primary surface has been drawn on.
    #[must_use]
    pub const fn primary_draws(&self) -> usize {
        self.primary_draws
    }

    fn thumbnail_mut(&mut self, id: ThumbnailId) -> Option<&mut Thumbnail> {
        self.groups
            .get_mut(&id.group)
            .and_then(|row| row.get_mut(id.index))
    }

    fn tile_mut(&mut self, tile: TileId) -> Result<&mut Vec<MemoryNode>, PageError> {
        self.tiles
            .get_mut(tile.0)
            .ok_or_else(|| PageError::new(format!("no tile at index {}", tile.0)))
    }
}

impl Page for MemoryPage {
    type Tile = TileId;
    type Surface = SurfaceId;
    type Thumbnail = ThumbnailId;

    fn tiles(&self) -> Result<Vec<TileId>, PageError> {
        Ok((0..self.tiles.len()).map(TileId).collect())
    }

    fn create_surface(&mut self, size: Dimensions) -> Result<SurfaceId, PageError> {
        self.surfaces.push(RgbaImage::new(size.width, size.height));
        Ok(SurfaceId(self.surfaces.len() - 1))
    }

    fn attach_surface(&mut self, tile: &TileId, surface: &SurfaceId) -> Result<(), PageError> {
        if surface.0 >= self.surfaces.len() {
            return Err(PageError::new(format!("no surface with id {}", surface.0)));
        }
        self.tile_mut(*tile)?.push(MemoryNode::Surface(*surface));
        Ok(())
    }

    fn put_pixels(&mut self, surface: &SurfaceId, pixels: &RgbaImage) -> Result<(), PageError> {
        let target = self
            .surfaces
            .get_mut(surface.0)
            .ok_or_else(|| PageError::new(format!("no surface with id {}", surface.0)))?;
        imageops::replace(target, pixels, 0, 0);
        Ok(())
    }

    fn append_label(&mut self, tile: &TileId, text: &str, class: &str) -> Result<(), PageError> {
        self.tile_mut(*tile)?.push(MemoryNode::Label {
            text: text.to_owned(),
            class: class.to_owned(),
        });
        Ok(())
    }

    fn draw_primary(&mut self, pixels: &RgbaImage) -> Result<(), PageError> {
        imageops::replace(&mut self.primary, pixels, 0, 0);
        self.primary_draws += 1;
        Ok(())
    }

    fn read_primary(&self, size: Dimensions) -> Result<RgbaImage, PageError> {
        // Regions outside the primary surface read as transparent black.
        let mut region = RgbaImage::new(size.width, size.height);
        imageops::replace(&mut region, &self.primary, 0, 0);
        Ok(region)
    }

    fn thumbnails(&self, group: GroupId) -> Result<Vec<ThumbnailId>, PageError> {
        let count = self.groups.get(&group).map_or(0, Vec::len);
        Ok((0..count)
            .map(|index| ThumbnailId { group, index })
            .collect())
    }

    fn thumbnail_ready(&self, thumbnail: &ThumbnailId) -> bool {
        self.groups
            .get(&thumbnail.group)
            .and_then(|row| row.get(thumbnail.index))
            .is_some_and(|t| t.decoded)
    }

    fn read_thumbnail(&self, thumbnail: &ThumbnailId) -> Result<RgbaImage, PageError> {
        self.thumbnail_pixels(*thumbnail)
            .cloned()
            .ok_or_else(|| PageError::new(format!("no thumbnail {thumbnail:?}")))
    }

    fn write_thumbnail(
        &mut self,
        thumbnail: &ThumbnailId,
        pixels: &RgbaImage,
    ) -> Result<(), PageError> {
        let target = self
            .thumbnail_mut(*thumbnail)
            .ok_or_else(|| PageError::new(format!("no thumbnail {thumbnail:?}")))?;
        target.pixels = pixels.clone();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn read_primary_pads_outside_region() {
        let mut page = MemoryPage::new(Dimensions::new(2, 2), 0);
        page.draw_primary(&RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])))
            .unwrap();
        let region = page.read_primary(Dimensions::new(3, 1)).unwrap();
        assert_eq!(region.get_pixel(1, 0).0, [9, 9, 9, 255]);
        assert_eq!(region.get_pixel(2, 0).0, [0, 0, 0, 0]);
        assert_eq!(page.primary_draws(), 1);
    }

    #[test]
    fn put_pixels_clips_to_surface() {
        let mut page = MemoryPage::new(Dimensions::new(2, 2), 0);
        let surface = page.create_surface(Dimensions::new(2, 2)).unwrap();
        page.put_pixels(&surface, &RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])))
            .unwrap();
        let pixels = page.surface_pixels(surface).unwrap();
        assert_eq!(pixels.dimensions(), (2, 2));
        assert!(pixels.pixels().all(|p| p.0 == [1, 2, 3, 4]));
    }

    #[test]
    fn unknown_handles_are_errors() {
        let mut page = MemoryPage::new(Dimensions::new(2, 2), 1);
        let pixels = RgbaImage::new(1, 1);
        assert!(page.put_pixels(&SurfaceId(3), &pixels).is_err());
        assert!(page.append_label(&TileId(5), "x", "y").is_err());
        assert!(page.attach_surface(&TileId(0), &SurfaceId(0)).is_err());
    }

    #[test]
    fn thumbnails_keep_group_order_and_readiness() {
        let mut page = MemoryPage::new(Dimensions::new(2, 2), 0);
        let a = page.add_thumbnail(GroupId::City, RgbaImage::new(1, 1));
        let b = page.add_pending_thumbnail(GroupId::City, RgbaImage::new(1, 1));
        assert_eq!(page.thumbnails(GroupId::City).unwrap(), [a, b]);
        assert!(page.thumbnails(GroupId::Fuji).unwrap().is_empty());
        assert!(page.thumbnail_ready(&a));
        assert!(!page.thumbnail_ready(&b));
        page.mark_decoded(b);
        assert!(page.thumbnail_ready(&b));
    }
}
