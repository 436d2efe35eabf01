//! tintwall-core: filter gallery orchestration (sans-IO).
//!
//! Fills a photo gallery where every tile shows one base image run
//! through a different named pixel filter, and filters rows of demo
//! thumbnails in place:
//!
//! page ready -> provision surfaces -> capture source once ->
//! apply each catalog filter -> write surface + label.
//!
//! This crate has **no I/O dependencies**. The page is reached through
//! the [`Page`] trait and the filters through the [`FilterEngine`] trait;
//! browser implementations live in `tintwall-io`.

pub mod assignment;
pub mod demo_group;
pub mod diagnostics;
pub mod engine;
pub mod gallery;
pub mod loader;
pub mod memory;
pub mod orchestrator;
pub mod page;
pub mod presets;
pub mod surface;
pub mod types;

pub use assignment::{FilterAssignmentTable, GroupId};
pub use demo_group::DemoGroupFilterRunner;
pub use diagnostics::{AppliedFilter, GroupReport, OrchestrationReport};
pub use engine::{FilterEngine, FilterError};
pub use gallery::{Capture, Gallery, GalleryState};
pub use loader::SourceImageLoader;
pub use memory::MemoryPage;
pub use orchestrator::FilterApplicationOrchestrator;
pub use page::{Page, PageError};
pub use presets::PresetEngine;
pub use surface::GallerySurfaceManager;
pub use types::{
    BoundsPolicy, Dimensions, FilterName, GalleryConfig, GalleryError, RawPixelBuffer, RgbaImage,
};
