//! Conversion between canvas `ImageData` and `RgbaImage`.
//!
//! Both layouts are row-major, non-premultiplied RGBA8, so conversion is
//! a copy plus a length check.

use tintwall_core::RgbaImage;
use wasm_bindgen::Clamped;
use web_sys::ImageData;

use crate::error::DomError;

/// Copy an `RgbaImage` into a new `ImageData`.
///
/// # Errors
///
/// Returns [`DomError::Js`] if the browser rejects the dimensions.
pub fn to_image_data(image: &RgbaImage) -> Result<ImageData, DomError> {
    Ok(ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(image.as_raw()),
        image.width(),
        image.height(),
    )?)
}

/// Copy an `ImageData` into a new `RgbaImage`.
///
/// # Errors
///
/// Returns [`DomError::PixelLength`] if the data does not cover its
/// reported dimensions.
pub fn from_image_data(data: &ImageData) -> Result<RgbaImage, DomError> {
    let Clamped(bytes) = data.data();
    rgba_from_raw(data.width(), data.height(), bytes)
}

pub(crate) fn rgba_from_raw(
    width: u32,
    height: u32,
    bytes: Vec<u8>,
) -> Result<RgbaImage, DomError> {
    let expected = width as usize * height as usize * 4;
    let actual = bytes.len();
    RgbaImage::from_raw(width, height, bytes).ok_or(DomError::PixelLength {
        width,
        height,
        expected,
        actual,
    })
}
