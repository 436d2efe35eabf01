//! Surface provisioning: one rendering surface per tile.

use crate::page::{Page, PageError};
use crate::types::Dimensions;

/// Creates and attaches one surface per tile.
#[derive(Debug, Clone, Copy)]
pub struct GallerySurfaceManager {
    size: Dimensions,
}

impl GallerySurfaceManager {
    /// A manager that creates surfaces of `size`.
    #[must_use]
    pub const fn new(size: Dimensions) -> Self {
        Self { size }
    }

    /// For every tile in order, create a surface, append it to the tile,
    /// and record it at the same index.
    ///
    /// The returned sequence has exactly `tiles.len()` entries. No tiles
    /// yields an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns the first [`PageError`] hit while creating or attaching.
    /// Surfaces attached before the failure stay attached.
    pub fn provision<P: Page>(
        &self,
        page: &mut P,
        tiles: &[P::Tile],
    ) -> Result<Vec<P::Surface>, PageError> {
        let mut surfaces = Vec::with_capacity(tiles.len());
        for tile in tiles {
            let surface = page.create_surface(self.size)?;
            page.attach_surface(tile, &surface)?;
            surfaces.push(surface);
        }
        log::debug!("provisioned {} surfaces at {}", surfaces.len(), self.size);
        Ok(surfaces)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::memory::{MemoryNode, MemoryPage};

    #[test]
    fn one_surface_per_tile_for_any_count() {
        for count in 0..8 {
            let mut page = MemoryPage::new(Dimensions::new(8, 8), count);
            let tiles = page.tiles().unwrap();
            let surfaces = GallerySurfaceManager::new(Dimensions::new(8, 8))
                .provision(&mut page, &tiles)
                .unwrap();
            assert_eq!(surfaces.len(), count);
            for (index, surface) in surfaces.iter().enumerate() {
                assert_eq!(page.children(index), [MemoryNode::Surface(*surface)]);
            }
        }
    }

    #[test]
    fn surfaces_take_requested_size() {
        let mut page = MemoryPage::new(Dimensions::new(8, 8), 2);
        let tiles = page.tiles().unwrap();
        let surfaces = GallerySurfaceManager::new(Dimensions::new(5, 3))
            .provision(&mut page, &tiles)
            .unwrap();
        for surface in surfaces {
            assert_eq!(page.surface_size(surface), Some(Dimensions::new(5, 3)));
        }
    }

    #[test]
    fn existing_children_are_kept_in_front() {
        let mut page = MemoryPage::new(Dimensions::new(8, 8), 1);
        let tiles = page.tiles().unwrap();
        page.append_label(&tiles[0], "caption", "muted").unwrap();
        let surfaces = GallerySurfaceManager::new(Dimensions::new(4, 4))
            .provision(&mut page, &tiles)
            .unwrap();
        assert_eq!(
            page.children(0),
            [
                MemoryNode::Label {
                    text: "caption".into(),
                    class: "muted".into()
                },
                MemoryNode::Surface(surfaces[0]),
            ]
        );
    }
}
