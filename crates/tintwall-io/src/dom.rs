//! The DOM-backed [`Page`].
//!
//! Tiles are the elements carrying the configured tile class, surfaces
//! are `<canvas>` elements, and thumbnails are the `<img>` elements
//! carrying a group's class name. Thumbnail pixels go through an
//! off-screen scratch canvas and are written back as a PNG data URL.

use tintwall_core::{Dimensions, GalleryConfig, GroupId, Page, PageError, RgbaImage};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement};

use crate::error::DomError;
use crate::pixels;

/// A gallery page backed by the live document.
pub struct DomPage {
    document: Document,
    primary: CanvasRenderingContext2d,
    scratch: HtmlCanvasElement,
    tile_class: String,
}

impl DomPage {
    /// Bind to `document` using the element id and class names in
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Missing`] if the primary surface does not
    /// exist, or [`DomError::WrongType`] if it is not a canvas.
    pub fn new(document: Document, config: &GalleryConfig) -> Result<Self, DomError> {
        let primary = document
            .get_element_by_id(&config.primary_surface_id)
            .ok_or_else(|| DomError::Missing(format!("element #{}", config.primary_surface_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| DomError::WrongType("canvas element"))?;
        let primary = context_2d(&primary)?;
        let scratch = create_canvas(&document)?;
        Ok(Self {
            document,
            primary,
            scratch,
            tile_class: config.tile_class.clone(),
        })
    }

    /// Pixels of a loaded image at its natural size.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if the image cannot be drawn or read back,
    /// e.g. when a cross-origin image has tainted the canvas.
    pub fn image_pixels(&self, image: &HtmlImageElement) -> Result<RgbaImage, DomError> {
        let (width, height) = (image.natural_width(), image.natural_height());
        self.scratch.set_width(width);
        self.scratch.set_height(height);
        let ctx = context_2d(&self.scratch)?;
        ctx.draw_image_with_html_image_element(image, 0.0, 0.0)?;
        let data = ctx.get_image_data(0.0, 0.0, f64::from(width), f64::from(height))?;
        pixels::from_image_data(&data)
    }

    fn collect_tiles(&self) -> Vec<Element> {
        let collection = self.document.get_elements_by_class_name(&self.tile_class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn new_surface(&self, size: Dimensions) -> Result<HtmlCanvasElement, DomError> {
        let canvas = create_canvas(&self.document)?;
        canvas.set_width(size.width);
        canvas.set_height(size.height);
        Ok(canvas)
    }

    fn label(&self, tile: &Element, text: &str, class: &str) -> Result<(), DomError> {
        let label = self.document.create_element("p")?;
        label.set_class_name(class);
        label.set_text_content(Some(text));
        tile.append_child(&label)?;
        Ok(())
    }

    fn group_images(&self, group: GroupId) -> Result<Vec<HtmlImageElement>, DomError> {
        let nodes = self
            .document
            .query_selector_all(&format!(".{}", group.class_name()))?;
        let images = (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .map(|node| node.dyn_into::<HtmlImageElement>().ok());
        only_images(group, images)
    }

    fn replace_image(&self, image: &HtmlImageElement, pixels: &RgbaImage) -> Result<(), DomError> {
        self.scratch.set_width(pixels.width());
        self.scratch.set_height(pixels.height());
        context_2d(&self.scratch)?.put_image_data(&pixels::to_image_data(pixels)?, 0.0, 0.0)?;
        image.set_src(&self.scratch.to_data_url()?);
        Ok(())
    }
}

impl Page for DomPage {
    type Tile = Element;
    type Surface = HtmlCanvasElement;
    type Thumbnail = HtmlImageElement;

    fn tiles(&self) -> Result<Vec<Element>, PageError> {
        Ok(self.collect_tiles())
    }

    fn create_surface(&mut self, size: Dimensions) -> Result<HtmlCanvasElement, PageError> {
        Ok(self.new_surface(size)?)
    }

    fn attach_surface(
        &mut self,
        tile: &Element,
        surface: &HtmlCanvasElement,
    ) -> Result<(), PageError> {
        tile.append_child(surface).map_err(DomError::from)?;
        Ok(())
    }

    fn put_pixels(
        &mut self,
        surface: &HtmlCanvasElement,
        pixels: &RgbaImage,
    ) -> Result<(), PageError> {
        let data = pixels::to_image_data(pixels)?;
        context_2d(surface)?
            .put_image_data(&data, 0.0, 0.0)
            .map_err(DomError::from)?;
        Ok(())
    }

    fn append_label(&mut self, tile: &Element, text: &str, class: &str) -> Result<(), PageError> {
        Ok(self.label(tile, text, class)?)
    }

    fn draw_primary(&mut self, pixels: &RgbaImage) -> Result<(), PageError> {
        let data = pixels::to_image_data(pixels)?;
        self.primary
            .put_image_data(&data, 0.0, 0.0)
            .map_err(DomError::from)?;
        Ok(())
    }

    fn read_primary(&self, size: Dimensions) -> Result<RgbaImage, PageError> {
        let data = self
            .primary
            .get_image_data(0.0, 0.0, f64::from(size.width), f64::from(size.height))
            .map_err(DomError::from)?;
        Ok(pixels::from_image_data(&data)?)
    }

    fn thumbnails(&self, group: GroupId) -> Result<Vec<HtmlImageElement>, PageError> {
        Ok(self.group_images(group)?)
    }

    fn thumbnail_ready(&self, thumbnail: &HtmlImageElement) -> bool {
        thumbnail.complete() && thumbnail.natural_width() > 0
    }

    fn read_thumbnail(&self, thumbnail: &HtmlImageElement) -> Result<RgbaImage, PageError> {
        Ok(self.image_pixels(thumbnail)?)
    }

    fn write_thumbnail(
        &mut self,
        thumbnail: &HtmlImageElement,
        pixels: &RgbaImage,
    ) -> Result<(), PageError> {
        Ok(self.replace_image(thumbnail, pixels)?)
    }
}

/// Every element of a group must be an image so that positions line up
/// with the group's filter assignment.
fn only_images<T>(
    group: GroupId,
    elements: impl IntoIterator<Item = Option<T>>,
) -> Result<Vec<T>, DomError> {
    elements
        .into_iter()
        .enumerate()
        .map(|(index, image)| image.ok_or(DomError::NotAnImage { group, index }))
        .collect()
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, DomError> {
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| DomError::WrongType("canvas element"))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, DomError> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| DomError::Missing("2d canvas context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| DomError::WrongType("2d canvas context"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn group_of_images_keeps_document_order() {
        let images = only_images(GroupId::Fuji, [Some("a"), Some("b"), Some("c")]);
        assert_eq!(images.unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn element_that_is_not_an_image_fails_the_group() {
        let result = only_images(GroupId::City, [Some("a"), None, Some("c")]);
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            DomError::NotAnImage {
                group: GroupId::City,
                index: 1
            }
        ));
        assert_eq!(
            err.to_string(),
            "element 1 of thumbnail group city is not an image"
        );
    }
}
