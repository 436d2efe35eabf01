//! Built-in preset filter engine.
//!
//! A small, deterministic catalog of named color filters. It stands in
//! for an external filter library when none is available (native builds,
//! tests, or a page without a JavaScript engine) and covers every name
//! used by the built-in assignment tables.
//!
//! Every preset is a pure per-pixel or per-row color operation on RGBA
//! data. Alpha is never modified.

use crate::engine::{FilterEngine, FilterError};
use crate::types::{FilterName, RgbaImage};

/// The color operation behind a preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recipe {
    /// Blend every pixel toward `color` by `amount` (0.0 to 1.0).
    Tint {
        /// Target color.
        color: [u8; 3],
        /// Blend weight of the target color.
        amount: f32,
    },
    /// Add a signed delta to each channel, saturating at 0 and 255.
    Adjust([i16; 3]),
    /// Sample each channel from `dx` pixels to the left (negative: right),
    /// clamping at the row edges.
    Shift([i32; 3]),
    /// Classic sepia tone matrix.
    Sepia,
    /// Luminance grayscale.
    Grayscale,
    /// Invert every color channel.
    Invert,
}

impl Recipe {
    /// Apply the recipe to a copy of `input`.
    #[must_use]
    pub fn apply(self, input: &RgbaImage) -> RgbaImage {
        let mut output = input.clone();
        match self {
            Self::Shift(dx) => shift_channels(input, &mut output, dx),
            _ => {
                for pixel in output.pixels_mut() {
                    let [r, g, b, a] = pixel.0;
                    let [r, g, b] = self.map_color([r, g, b]);
                    pixel.0 = [r, g, b, a];
                }
            }
        }
        output
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::many_single_char_names
    )]
    fn map_color(self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        let to_u8 = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        match self {
            Self::Tint { color, amount } => {
                let keep = 1.0 - amount;
                let mix = |c: u8, t: u8| to_u8(f32::from(c).mul_add(keep, f32::from(t) * amount));
                [mix(r, color[0]), mix(g, color[1]), mix(b, color[2])]
            }
            Self::Adjust(delta) => {
                let add = |c: u8, d: i16| (i16::from(c) + d).clamp(0, 255) as u8;
                [add(r, delta[0]), add(g, delta[1]), add(b, delta[2])]
            }
            Self::Sepia => {
                let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
                [
                    to_u8(0.393f32.mul_add(r, 0.769f32.mul_add(g, 0.189 * b))),
                    to_u8(0.349f32.mul_add(r, 0.686f32.mul_add(g, 0.168 * b))),
                    to_u8(0.272f32.mul_add(r, 0.534f32.mul_add(g, 0.131 * b))),
                ]
            }
            Self::Grayscale => {
                let y = to_u8(0.299f32.mul_add(
                    f32::from(r),
                    0.587f32.mul_add(f32::from(g), 0.114 * f32::from(b)),
                ));
                [y, y, y]
            }
            Self::Invert => [255 - r, 255 - g, 255 - b],
            Self::Shift(_) => [r, g, b],
        }
    }
}

#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn shift_channels(input: &RgbaImage, output: &mut RgbaImage, dx: [i32; 3]) {
    let max_x = input.width().saturating_sub(1) as i32;
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        for (channel, shift) in dx.iter().enumerate() {
            let src_x = (x as i32 - shift).clamp(0, max_x) as u32;
            pixel.0[channel] = input.get_pixel(src_x, y).0[channel];
        }
    }
}

/// Catalog of built-in presets, in catalog order.
const PRESETS: &[(&str, Recipe)] = &[
    (
        "ocean",
        Recipe::Tint {
            color: [0, 105, 148],
            amount: 0.35,
        },
    ),
    ("offset", Recipe::Shift([12, 0, -12])),
    ("twenties", Recipe::Sepia),
    ("warmth", Recipe::Adjust([30, 10, -20])),
    (
        "solange",
        Recipe::Tint {
            color: [220, 120, 40],
            amount: 0.4,
        },
    ),
    ("extreme_offset_red", Recipe::Shift([48, 0, 0])),
    (
        "perfume",
        Recipe::Tint {
            color: [240, 130, 200],
            amount: 0.3,
        },
    ),
    (
        "wood",
        Recipe::Tint {
            color: [133, 94, 66],
            amount: 0.45,
        },
    ),
    (
        "crimson",
        Recipe::Tint {
            color: [220, 20, 60],
            amount: 0.35,
        },
    ),
    ("mellow", Recipe::Adjust([-10, -5, 15])),
    ("grayscale", Recipe::Grayscale),
    ("invert", Recipe::Invert),
];

/// Filter engine backed by the built-in preset catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetEngine;

impl PresetEngine {
    /// Look up the recipe for a filter name.
    #[must_use]
    pub fn recipe(filter: &FilterName) -> Option<Recipe> {
        PRESETS
            .iter()
            .find(|(name, _)| *name == filter.as_str())
            .map(|(_, recipe)| *recipe)
    }
}

impl FilterEngine for PresetEngine {
    fn catalog(&self) -> Result<Vec<FilterName>, FilterError> {
        Ok(PRESETS
            .iter()
            .map(|&(name, _)| FilterName::from_static(name))
            .collect())
    }

    fn apply_to_buffer(
        &self,
        buffer: &RgbaImage,
        filter: &FilterName,
    ) -> Result<RgbaImage, FilterError> {
        let recipe =
            Self::recipe(filter).ok_or_else(|| FilterError::UnknownFilter(filter.to_string()))?;
        Ok(recipe.apply(buffer))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::assignment::{FilterAssignmentTable, GroupId};

    #[allow(clippy::cast_possible_truncation)]
    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 4 % 256) as u8, (y * 4 % 256) as u8, 128, 255])
        })
    }

    #[test]
    fn catalog_covers_every_assigned_filter() {
        let catalog = PresetEngine.catalog().unwrap();
        for group in GroupId::ALL {
            for filter in FilterAssignmentTable::BUILTIN.get(group) {
                assert!(
                    catalog.contains(filter),
                    "preset catalog is missing {filter} used by {group}"
                );
            }
        }
    }

    #[test]
    fn catalog_names_are_unique() {
        let catalog = PresetEngine.catalog().unwrap();
        let mut seen = std::collections::HashSet::new();
        for name in &catalog {
            assert!(seen.insert(name.clone()), "duplicate preset {name}");
        }
    }

    #[test]
    fn apply_to_buffer_is_pure() {
        let input = gradient(64, 16);
        let before = input.clone();
        for filter in PresetEngine.catalog().unwrap() {
            let first = PresetEngine.apply_to_buffer(&input, &filter).unwrap();
            let second = PresetEngine.apply_to_buffer(&input, &filter).unwrap();
            assert_eq!(first, second, "{filter} is not deterministic");
            assert_eq!(input, before, "{filter} mutated its input");
        }
    }

    #[test]
    fn every_preset_changes_a_gradient() {
        let input = gradient(64, 16);
        for filter in PresetEngine.catalog().unwrap() {
            let output = PresetEngine.apply_to_buffer(&input, &filter).unwrap();
            assert_ne!(output, input, "{filter} left the gradient unchanged");
        }
    }

    #[test]
    fn alpha_is_preserved() {
        let input = RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 77]));
        for filter in PresetEngine.catalog().unwrap() {
            let output = PresetEngine.apply_to_buffer(&input, &filter).unwrap();
            let alpha_kept = output.pixels().all(|p| p.0[3] == 77);
            assert!(alpha_kept, "{filter} touched alpha");
        }
    }

    #[test]
    fn unknown_filter_is_rejected() {
        let input = gradient(4, 4);
        let result = PresetEngine.apply_to_buffer(&input, &FilterName::from("sparkle"));
        assert_eq!(result, Err(FilterError::UnknownFilter("sparkle".into())));
    }

    #[test]
    fn in_place_failure_leaves_image_untouched() {
        let mut image = gradient(4, 4);
        let before = image.clone();
        assert!(
            PresetEngine
                .apply_in_place(&mut image, &FilterName::from("sparkle"))
                .is_err()
        );
        assert_eq!(image, before);
    }

    #[test]
    fn shift_clamps_at_left_edge() {
        let input = gradient(64, 1);
        let output = Recipe::Shift([48, 0, 0]).apply(&input);
        // Columns left of the shift distance all sample column 0.
        assert_eq!(output.get_pixel(10, 0).0[0], input.get_pixel(0, 0).0[0]);
        assert_eq!(output.get_pixel(60, 0).0[0], input.get_pixel(12, 0).0[0]);
        // Untouched channels keep their values.
        assert_eq!(output.get_pixel(60, 0).0[1], input.get_pixel(60, 0).0[1]);
    }

    #[test]
    fn adjust_saturates() {
        let input = RgbaImage::from_pixel(1, 1, Rgba([250, 5, 100, 255]));
        let output = Recipe::Adjust([30, -10, 0]).apply(&input);
        assert_eq!(output.get_pixel(0, 0).0, [255, 0, 100, 255]);
    }
}
