//! The filter engine seam.
//!
//! The gallery never implements filters itself. It drives an engine
//! through the [`FilterEngine`] trait, which mirrors the three operations
//! a pixel-filter library exposes: list its catalog, transform a buffer
//! into a new buffer, and transform an image in place.
//!
//! [`PresetEngine`](crate::presets::PresetEngine) is the built-in
//! implementation. Browser hosts can bind a JavaScript library instead.

use crate::types::{FilterName, RgbaImage};

/// Errors reported by a filter engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The engine has no filter with this name.
    #[error("unknown filter {0:?}")]
    UnknownFilter(String),

    /// The engine failed while applying a known filter.
    #[error("filter engine error: {0}")]
    Engine(String),
}

/// A pixel-filter library driven by the gallery.
pub trait FilterEngine {
    /// Names of every filter the engine offers, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Engine`] if the catalog cannot be read.
    fn catalog(&self) -> Result<Vec<FilterName>, FilterError>;

    /// Apply `filter` to `buffer`, returning a new, independent buffer.
    ///
    /// Must be pure: the input is left unmodified and repeated calls with
    /// the same input produce identical output.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFilter`] for names outside the
    /// catalog, or [`FilterError::Engine`] if the transform fails.
    fn apply_to_buffer(
        &self,
        buffer: &RgbaImage,
        filter: &FilterName,
    ) -> Result<RgbaImage, FilterError>;

    /// Apply `filter` to `image` in place.
    ///
    /// The default implementation routes through
    /// [`apply_to_buffer`](Self::apply_to_buffer) and replaces the pixels
    /// on success. On failure `image` is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`apply_to_buffer`](Self::apply_to_buffer).
    fn apply_in_place(
        &self,
        image: &mut RgbaImage,
        filter: &FilterName,
    ) -> Result<(), FilterError> {
        *image = self.apply_to_buffer(image, filter)?;
        Ok(())
    }
}

impl<E: FilterEngine + ?Sized> FilterEngine for &E {
    fn catalog(&self) -> Result<Vec<FilterName>, FilterError> {
        (**self).catalog()
    }

    fn apply_to_buffer(
        &self,
        buffer: &RgbaImage,
        filter: &FilterName,
    ) -> Result<RgbaImage, FilterError> {
        (**self).apply_to_buffer(buffer, filter)
    }

    fn apply_in_place(
        &self,
        image: &mut RgbaImage,
        filter: &FilterName,
    ) -> Result<(), FilterError> {
        (**self).apply_in_place(image, filter)
    }
}

impl<E: FilterEngine + ?Sized> FilterEngine for Box<E> {
    fn catalog(&self) -> Result<Vec<FilterName>, FilterError> {
        (**self).catalog()
    }

    fn apply_to_buffer(
        &self,
        buffer: &RgbaImage,
        filter: &FilterName,
    ) -> Result<RgbaImage, FilterError> {
        (**self).apply_to_buffer(buffer, filter)
    }

    fn apply_in_place(
        &self,
        image: &mut RgbaImage,
        filter: &FilterName,
    ) -> Result<(), FilterError> {
        (**self).apply_in_place(image, filter)
    }
}
