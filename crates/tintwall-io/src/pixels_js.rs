//! Binding to the page's `pixelsJS` filter library.
//!
//! When the page loads `pixelsJS`, its filter list and `ImageData`
//! transform back the gallery. Otherwise [`select_engine`] falls back to
//! the built-in [`PresetEngine`].

use tintwall_core::{FilterEngine, FilterError, FilterName, PresetEngine, RgbaImage};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::ImageData;

use crate::error::{DomError, describe};
use crate::pixels;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = pixelsJS, js_name = getFilterList)]
    fn get_filter_list() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = pixelsJS, js_name = filterImgData)]
    fn filter_img_data(data: &ImageData, filter: &str) -> Result<JsValue, JsValue>;
}

/// Filter engine backed by the global `pixelsJS` object.
///
/// Calls made when the global is absent fail with
/// [`FilterError::Engine`]; use [`detect`](Self::detect) first.
#[derive(Debug, Clone, Copy)]
pub struct PixelsJsEngine;

impl PixelsJsEngine {
    /// The engine, if the page defines a `pixelsJS` global.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let global = js_sys::Reflect::get(&window, &JsValue::from_str("pixelsJS")).ok()?;
        global.is_object().then_some(Self)
    }
}

impl FilterEngine for PixelsJsEngine {
    fn catalog(&self) -> Result<Vec<FilterName>, FilterError> {
        let list = get_filter_list().map_err(engine_error)?;
        let list = list
            .dyn_into::<js_sys::Array>()
            .map_err(|_| FilterError::Engine("getFilterList did not return an array".into()))?;
        list.iter()
            .map(|name| {
                name.as_string()
                    .map(FilterName::from)
                    .ok_or_else(|| FilterError::Engine(format!("non-string filter name {name:?}")))
            })
            .collect()
    }

    fn apply_to_buffer(
        &self,
        buffer: &RgbaImage,
        filter: &FilterName,
    ) -> Result<RgbaImage, FilterError> {
        let input = pixels::to_image_data(buffer).map_err(dom_error)?;
        let output = filter_img_data(&input, filter.as_str())
            .map_err(engine_error)?
            .dyn_into::<ImageData>()
            .map_err(|_| FilterError::Engine(format!("{filter} did not return ImageData")))?;
        pixels::from_image_data(&output).map_err(dom_error)
    }
}

/// The `pixelsJS` engine when present, else the preset engine.
#[must_use]
pub fn select_engine() -> Box<dyn FilterEngine> {
    if let Some(engine) = PixelsJsEngine::detect() {
        log::info!("using pixelsJS filter engine");
        Box::new(engine)
    } else {
        log::info!("pixelsJS not found, using preset filters");
        Box::new(PresetEngine)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn engine_error(value: JsValue) -> FilterError {
    FilterError::Engine(describe(&value))
}

#[allow(clippy::needless_pass_by_value)]
fn dom_error(err: DomError) -> FilterError {
    FilterError::Engine(err.to_string())
}
