//! Shared types for the tintwall gallery engine.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assignment::GroupId;
use crate::engine::FilterError;
use crate::gallery::GalleryState;
use crate::page::PageError;

/// Re-export `RgbaImage` so downstream crates can hand pixel data to the
/// engine without depending on `image` directly.
pub use image::RgbaImage;

/// Image or surface dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create a new dimensions value.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions of an existing image.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self::new(image.width(), image.height())
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Opaque name of a transformation implemented by a [`FilterEngine`].
///
/// Carries no data of its own; the engine decides what the name means.
/// Static names (the built-in assignment tables) borrow, names reported
/// by an engine's catalog own their string.
///
/// [`FilterEngine`]: crate::engine::FilterEngine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterName(Cow<'static, str>);

impl FilterName {
    /// A filter name backed by a string literal.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FilterName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&str> for FilterName {
    fn from(name: &str) -> Self {
        Self(Cow::Owned(name.to_owned()))
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable snapshot of the base image's pixels.
///
/// Captured exactly once by [`SourceImageLoader`] after the source image
/// finishes loading, then shared read-only by every orchestration step.
/// There is deliberately no mutable accessor.
///
/// [`SourceImageLoader`]: crate::loader::SourceImageLoader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPixelBuffer(RgbaImage);

impl RawPixelBuffer {
    pub(crate) const fn new(pixels: RgbaImage) -> Self {
        Self(pixels)
    }

    /// The captured pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    /// Dimensions of the captured buffer.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.0)
    }
}

/// How to treat positional mismatches between filter lists and the
/// surfaces or thumbnails they are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsPolicy {
    /// Visit only positions present on both sides; the surplus is
    /// recorded as skipped (filters) or untouched (thumbnails).
    #[default]
    Skip,
    /// Fail with [`GalleryError::BoundsMismatch`] before doing any work
    /// when filters outnumber surfaces or thumbnails outnumber filters.
    Reject,
}

/// Configuration for one gallery page.
///
/// Every field has a default matching the documentation page the gallery
/// was built for, so a partial JSON document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Path or URL of the base image shown in every tile.
    pub source_image: String,

    /// Canonical size of the primary surface and every tile surface.
    /// The source image is scaled to this size before capture.
    pub surface: Dimensions,

    /// Element id of the primary drawing surface.
    pub primary_surface_id: String,

    /// Class name identifying tile containers.
    pub tile_class: String,

    /// Class name applied to each filter label.
    pub label_class: String,

    /// Positional mismatch handling for both the orchestrator and the
    /// demo-group runner.
    pub bounds: BoundsPolicy,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            source_image: String::from("./city1.PNG"),
            surface: Dimensions::new(220, 277),
            primary_surface_id: String::from("canvas"),
            tile_class: String::from("tile"),
            label_class: String::from("text-primary"),
            bounds: BoundsPolicy::default(),
        }
    }
}

/// Errors that can occur while building or filling the gallery.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// Failed to decode the source image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The source image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A page operation (element lookup, creation, pixel I/O) failed.
    #[error(transparent)]
    Page(#[from] PageError),

    /// The filter engine could not report its catalog.
    #[error("failed to read filter catalog: {0}")]
    Catalog(#[source] FilterError),

    /// The filter engine failed for the filter at `index`.
    ///
    /// Work already written before `index` stays in place.
    #[error("filter \"{filter}\" at position {index} failed: {source}")]
    Filter {
        /// Position of the failing filter.
        index: usize,
        /// Name of the failing filter.
        filter: FilterName,
        /// Underlying engine error.
        #[source]
        source: FilterError,
    },

    /// Filter and target counts disagree under [`BoundsPolicy::Reject`].
    #[error("{target} has {available} slots but {required} are required")]
    BoundsMismatch {
        /// What ran out of slots (e.g. `"surfaces"`).
        target: String,
        /// Number of positions the work would visit.
        required: usize,
        /// Number of positions actually available.
        available: usize,
    },

    /// An event arrived in a state that cannot accept it.
    #[error("cannot {event} while gallery is {state}")]
    InvalidTransition {
        /// State the gallery was in.
        state: GalleryState,
        /// The rejected event.
        event: &'static str,
    },

    /// A thumbnail was asked to be filtered before it finished decoding.
    #[error("thumbnail {index} of group {group} has not finished decoding")]
    ThumbnailNotReady {
        /// Group the thumbnail belongs to.
        group: GroupId,
        /// Position of the thumbnail within its group.
        index: usize,
    },
}
