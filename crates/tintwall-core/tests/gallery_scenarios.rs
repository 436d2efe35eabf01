//! End-to-end gallery scenarios on an in-memory page.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;

use image::Rgba;
use tintwall_core::{
    BoundsPolicy, DemoGroupFilterRunner, Dimensions, FilterAssignmentTable, FilterEngine,
    FilterError, FilterName, Gallery, GalleryConfig, GalleryError, GroupId, MemoryPage,
    PresetEngine, RgbaImage,
};

/// Wraps the preset engine with a catalog of its first `n` presets and
/// records every in-place call.
struct RecordingEngine {
    catalog: Vec<FilterName>,
    in_place_calls: RefCell<Vec<(RgbaImage, FilterName)>>,
}

impl RecordingEngine {
    fn first(n: usize) -> Self {
        let catalog = PresetEngine.catalog().unwrap().into_iter().take(n).collect();
        Self {
            catalog,
            in_place_calls: RefCell::new(Vec::new()),
        }
    }
}

impl FilterEngine for RecordingEngine {
    fn catalog(&self) -> Result<Vec<FilterName>, FilterError> {
        Ok(self.catalog.clone())
    }

    fn apply_to_buffer(
        &self,
        buffer: &RgbaImage,
        filter: &FilterName,
    ) -> Result<RgbaImage, FilterError> {
        PresetEngine.apply_to_buffer(buffer, filter)
    }

    fn apply_in_place(
        &self,
        image: &mut RgbaImage,
        filter: &FilterName,
    ) -> Result<(), FilterError> {
        self.in_place_calls
            .borrow_mut()
            .push((image.clone(), filter.clone()));
        PresetEngine.apply_in_place(image, filter)
    }
}

const SIZE: Dimensions = Dimensions::new(64, 32);

fn config() -> GalleryConfig {
    GalleryConfig {
        surface: SIZE,
        ..GalleryConfig::default()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn base_image() -> RgbaImage {
    RgbaImage::from_fn(128, 64, |x, y| Rgba([(x * 2) as u8, (y * 4) as u8, 64, 255]))
}

#[allow(clippy::cast_possible_truncation)]
fn thumbnail(seed: usize) -> RgbaImage {
    RgbaImage::from_fn(64, 8, |x, _| Rgba([(x * 4) as u8, (seed * 20) as u8, 128, 255]))
}

fn run_gallery(tiles: usize, engine: &RecordingEngine) -> (MemoryPage, Gallery<MemoryPage>) {
    let mut page = MemoryPage::new(SIZE, tiles);
    let mut gallery = Gallery::new(config());
    gallery.page_ready(&mut page).unwrap();
    gallery
        .on_image_loaded(&mut page, engine, &base_image())
        .unwrap()
        .expect("first load signal orchestrates");
    (page, gallery)
}

#[test]
fn six_tiles_six_filters() {
    let engine = RecordingEngine::first(6);
    let (page, gallery) = run_gallery(6, &engine);
    let base = gallery.buffer().unwrap().pixels().clone();

    for (j, filter) in engine.catalog.iter().enumerate() {
        let expected = PresetEngine.apply_to_buffer(&base, filter).unwrap();
        let surface = gallery.surfaces()[j];
        assert_eq!(
            page.surface_pixels(surface).unwrap(),
            &expected,
            "surface {j} should show {filter}"
        );
        assert_eq!(page.labels(j), [filter.as_str()]);
    }
}

#[test]
fn five_tiles_six_filters_skips_the_sixth() {
    let engine = RecordingEngine::first(6);
    let mut page = MemoryPage::new(SIZE, 5);
    let mut gallery = Gallery::new(config());
    gallery.page_ready(&mut page).unwrap();
    let report = gallery
        .on_image_loaded(&mut page, &engine, &base_image())
        .unwrap()
        .unwrap();

    assert_eq!(report.applied.len(), 5);
    assert_eq!(report.skipped, [engine.catalog[5].clone()]);
    for j in 0..5 {
        assert_eq!(page.labels(j), [engine.catalog[j].as_str()]);
    }
}

#[test]
fn five_tiles_six_filters_rejected_under_reject_policy() {
    let engine = RecordingEngine::first(6);
    let mut page = MemoryPage::new(SIZE, 5);
    let mut gallery = Gallery::new(GalleryConfig {
        bounds: BoundsPolicy::Reject,
        ..config()
    });
    gallery.page_ready(&mut page).unwrap();
    let result = gallery.on_image_loaded(&mut page, &engine, &base_image());
    assert!(matches!(
        result,
        Err(GalleryError::BoundsMismatch {
            required: 6,
            available: 5,
            ..
        })
    ));
    assert!((0..5).all(|j| page.labels(j).is_empty()));
}

#[test]
fn capture_is_idempotent_across_load_signals() {
    let engine = RecordingEngine::first(3);
    let (mut page, mut gallery) = run_gallery(3, &engine);
    let captured = gallery.buffer().unwrap().clone();

    let other = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
    for _ in 0..4 {
        assert!(
            gallery
                .on_image_loaded(&mut page, &engine, &other)
                .unwrap()
                .is_none()
        );
    }
    assert_eq!(gallery.buffer(), Some(&captured));
    assert_eq!(page.primary_draws(), 1);
    for j in 0..3 {
        assert_eq!(page.labels(j).len(), 1);
    }
}

#[test]
fn buffer_transform_is_pure() {
    let engine = RecordingEngine::first(12);
    let (_, gallery) = run_gallery(1, &engine);
    let buffer = gallery.buffer().unwrap();
    let before = buffer.pixels().clone();
    for filter in &engine.catalog {
        let a = engine.apply_to_buffer(buffer.pixels(), filter).unwrap();
        let b = engine.apply_to_buffer(buffer.pixels(), filter).unwrap();
        assert_eq!(a, b);
    }
    assert_eq!(buffer.pixels(), &before);
}

#[test]
fn thumbnails_past_the_city_assignment_are_never_filtered() {
    let engine = RecordingEngine::first(12);
    let mut page = MemoryPage::new(SIZE, 0);
    let ids: Vec<_> = (0..8)
        .map(|i| page.add_thumbnail(GroupId::City, thumbnail(i)))
        .collect();

    // City has six filters: thumbnails 6 and 7 have none.
    let report = DemoGroupFilterRunner::default()
        .run_group(&mut page, &engine, GroupId::City)
        .unwrap();
    assert_eq!(report.filtered, 6);
    assert_eq!(report.untouched, 2);

    let calls = engine.in_place_calls.borrow();
    let filters = FilterAssignmentTable::BUILTIN.get(GroupId::City);
    assert_eq!(calls.len(), 6);
    for (j, (input, filter)) in calls.iter().enumerate() {
        assert_eq!(input, &thumbnail(j), "call {j} received the wrong thumbnail");
        assert_eq!(filter, &filters[j]);
    }
    for (j, id) in ids.iter().enumerate() {
        let pixels = page.thumbnail_pixels(*id).unwrap();
        if j < 6 {
            assert_ne!(pixels, &thumbnail(j), "thumbnail {j} should be filtered");
        } else {
            assert_eq!(pixels, &thumbnail(j), "thumbnail {j} should be untouched");
        }
    }
}

#[test]
fn demo_group_with_seven_images_and_six_filters() {
    let engine = RecordingEngine::first(12);
    let mut page = MemoryPage::new(SIZE, 0);
    let ids: Vec<_> = (0..7)
        .map(|i| page.add_thumbnail(GroupId::Daisy, thumbnail(i)))
        .collect();

    DemoGroupFilterRunner::default()
        .run_group(&mut page, &engine, GroupId::Daisy)
        .unwrap();

    let calls = engine.in_place_calls.borrow();
    assert_eq!(calls.len(), 6);
    assert!(calls.iter().all(|(input, _)| input != &thumbnail(6)));
    assert_eq!(page.thumbnail_pixels(ids[6]).unwrap(), &thumbnail(6));
}

#[test]
fn all_groups_run_in_table_order() {
    let engine = RecordingEngine::first(12);
    let mut page = MemoryPage::new(SIZE, 0);
    for group in GroupId::ALL {
        let count = FilterAssignmentTable::BUILTIN.get(group).len();
        for i in 0..count {
            page.add_thumbnail(group, thumbnail(i));
        }
    }

    let reports = DemoGroupFilterRunner::default()
        .run_all(&mut page, &engine)
        .unwrap();
    let groups: Vec<_> = reports.iter().map(|r| r.group).collect();
    assert_eq!(groups, GroupId::ALL);
    assert!(reports.iter().all(|r| r.untouched == 0));

    let filters: Vec<_> = engine
        .in_place_calls
        .borrow()
        .iter()
        .map(|(_, f)| f.as_str().to_owned())
        .collect();
    let expected: Vec<_> = GroupId::ALL
        .into_iter()
        .flat_map(|g| FilterAssignmentTable::BUILTIN.get(g))
        .map(|f| f.as_str().to_owned())
        .collect();
    assert_eq!(filters, expected);
}
