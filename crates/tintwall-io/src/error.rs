//! Errors raised by browser API calls.

use tintwall_core::{GroupId, PageError};
use wasm_bindgen::JsValue;

/// Errors that can occur while talking to the DOM.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// A browser API call threw or rejected.
    #[error("browser API error: {0}")]
    Js(String),

    /// A required global, element, or context is absent.
    #[error("missing {0}")]
    Missing(String),

    /// An element or value had an unexpected type.
    #[error("expected a {0}")]
    WrongType(&'static str),

    /// A thumbnail group matched an element that is not an `<img>`.
    #[error("element {index} of thumbnail group {group} is not an image")]
    NotAnImage {
        /// Group whose class the element carries.
        group: GroupId,
        /// Position of the element within the group.
        index: usize,
    },

    /// An image failed to load.
    #[error("failed to load image {src}: {reason}")]
    Load {
        /// The `src` that failed.
        src: String,
        /// Browser-provided reason, if any.
        reason: String,
    },

    /// Pixel data length does not match its dimensions.
    #[error("pixel data has {actual} bytes, expected {expected} for {width}x{height}")]
    PixelLength {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Expected byte count (`width * height * 4`).
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(describe(&value))
    }
}

impl From<DomError> for PageError {
    fn from(err: DomError) -> Self {
        Self::new(err.to_string())
    }
}

/// Best-effort text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
