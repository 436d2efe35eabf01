//! Contact-sheet composition with tiny-skia.
//!
//! Tiles are laid out left-to-right, top-to-bottom in a fixed number of
//! columns, each inside a thin frame. An optional strip of thumbnails
//! runs below the grid.

use image::RgbaImage;
use tiny_skia::{
    Color, ColorU8, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

/// Gap around and between cells, in pixels.
const PADDING: u32 = 12;

/// A composed sheet and where each tile landed on it.
pub struct Sheet {
    /// The sheet, straight RGBA.
    pub image: RgbaImage,
    /// Top-left corner of each tile, by tile index.
    pub tile_origins: Vec<(u32, u32)>,
}

/// Lay out `tiles` in `columns` columns with `thumbnails` in a strip
/// below. Every tile is assumed to share the first tile's size.
///
/// Returns `None` if there is nothing to place or the sheet is too
/// large to allocate.
pub fn compose(tiles: &[&RgbaImage], columns: u32, thumbnails: &[&RgbaImage]) -> Option<Sheet> {
    if tiles.is_empty() && thumbnails.is_empty() {
        return None;
    }
    let columns = columns.max(1);
    let (cell_w, cell_h) = tiles.first().map_or((0, 0), |t| t.dimensions());
    let count = u32::try_from(tiles.len()).ok()?;
    let rows = count.div_ceil(columns);
    let used_columns = count.min(columns);

    let grid_w = used_columns * (cell_w + PADDING) + PADDING;
    let grid_h = rows * (cell_h + PADDING) + PADDING;
    let strip_w = thumbnails.iter().map(|t| t.width() + PADDING).sum::<u32>() + PADDING;
    let strip_h = thumbnails
        .iter()
        .map(|t| t.height() + PADDING)
        .max()
        .unwrap_or(0);

    let mut pixmap = Pixmap::new(grid_w.max(strip_w), grid_h + strip_h)?;
    pixmap.fill(Color::from_rgba8(245, 245, 245, 255));

    let mut tile_origins = Vec::with_capacity(tiles.len());
    for (i, tile) in (0..count).zip(tiles) {
        let x = PADDING + (i % columns) * (cell_w + PADDING);
        let y = PADDING + (i / columns) * (cell_h + PADDING);
        place(&mut pixmap, tile, x, y)?;
        outline(&mut pixmap, tile, x, y);
        tile_origins.push((x, y));
    }

    let mut x = PADDING;
    for thumbnail in thumbnails {
        place(&mut pixmap, thumbnail, x, grid_h)?;
        x += thumbnail.width() + PADDING;
    }

    Some(Sheet {
        image: to_rgba(&pixmap),
        tile_origins,
    })
}

#[allow(clippy::cast_possible_wrap)]
fn place(pixmap: &mut Pixmap, image: &RgbaImage, x: u32, y: u32) -> Option<()> {
    let source = to_pixmap(image)?;
    pixmap.draw_pixmap(
        x as i32,
        y as i32,
        source.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
    Some(())
}

/// Frame `image` placed at (`x`, `y`) with a one-pixel border just
/// outside its edges.
#[allow(clippy::cast_precision_loss)]
fn outline(pixmap: &mut Pixmap, image: &RgbaImage, x: u32, y: u32) {
    let (left, top) = (x as f32 - 0.5, y as f32 - 0.5);
    let (w, h) = (image.width() as f32 + 1.0, image.height() as f32 + 1.0);
    let Some(rect) = Rect::from_xywh(left, top, w, h) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(60, 60, 60, 255);
    paint.anti_alias = false;
    let stroke = Stroke {
        width: 1.0,
        ..Stroke::default()
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

/// Premultiply straight RGBA into a pixmap.
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Un-premultiply a pixmap back to straight RGBA.
fn to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    image
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgba;

    use super::*;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn grid_wraps_at_column_count() {
        let tile = solid(20, 10, [200, 0, 0]);
        let tiles = vec![&tile; 5];
        let sheet = compose(&tiles, 2, &[]).unwrap();

        assert_eq!(sheet.tile_origins.len(), 5);
        assert_eq!(sheet.tile_origins[0], (PADDING, PADDING));
        assert_eq!(sheet.tile_origins[1], (PADDING * 2 + 20, PADDING));
        assert_eq!(sheet.tile_origins[2], (PADDING, PADDING * 2 + 10));
        assert_eq!(sheet.image.width(), 2 * (20 + PADDING) + PADDING);
        assert_eq!(sheet.image.height(), 3 * (10 + PADDING) + PADDING);
    }

    #[test]
    fn tile_pixels_survive_composition() {
        let red = solid(16, 16, [200, 10, 10]);
        let blue = solid(16, 16, [10, 10, 200]);
        let sheet = compose(&[&red, &blue], 4, &[]).unwrap();

        let (x, y) = sheet.tile_origins[1];
        assert_eq!(sheet.image.get_pixel(x + 8, y + 8).0, [10, 10, 200, 255]);
        let (x, y) = sheet.tile_origins[0];
        assert_eq!(sheet.image.get_pixel(x + 8, y + 8).0, [200, 10, 10, 255]);
    }

    #[test]
    fn thumbnail_strip_sits_below_grid() {
        let tile = solid(10, 10, [0, 0, 0]);
        let thumb = solid(30, 6, [0, 200, 0]);
        let sheet = compose(&[&tile], 3, &[&thumb, &thumb]).unwrap();

        let grid_h = 10 + 2 * PADDING;
        assert_eq!(sheet.image.height(), grid_h + 6 + PADDING);
        assert_eq!(sheet.image.width(), 2 * (30 + PADDING) + PADDING);
        assert_eq!(sheet.image.get_pixel(PADDING + 1, grid_h + 1).0, [0, 200, 0, 255]);
    }

    #[test]
    fn empty_sheet_is_none() {
        assert!(compose(&[], 4, &[]).is_none());
    }
}
