//! The gallery state machine.
//!
//! A [`Gallery`] is the single initialization object for one page: it
//! owns the tile and surface handles, the source loader, and the
//! captured buffer, and is passed by reference to whatever drives it.
//!
//! ```text
//! Uninitialized --page_ready--> SurfacesReady --image_loaded--> ImageLoaded
//!                                                                   |
//!                                                              orchestrate
//!                                                                   v
//!                                                              Orchestrated
//! ```
//!
//! `Orchestrated` is terminal. Repeated load signals after capture are
//! ignored rather than rejected, so a host may forward every load event
//! it sees.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::OrchestrationReport;
use crate::engine::FilterEngine;
use crate::loader::SourceImageLoader;
use crate::orchestrator::FilterApplicationOrchestrator;
use crate::page::Page;
use crate::surface::GallerySurfaceManager;
use crate::types::{GalleryConfig, GalleryError, RawPixelBuffer, RgbaImage};

/// Lifecycle state of a [`Gallery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryState {
    /// Nothing has happened yet.
    Uninitialized,
    /// One surface per tile has been provisioned.
    SurfacesReady,
    /// The source buffer has been captured.
    ImageLoaded,
    /// Orchestration has run (successfully or not). Terminal.
    Orchestrated,
}

impl GalleryState {
    /// Human-readable state name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::SurfacesReady => "surfaces ready",
            Self::ImageLoaded => "image loaded",
            Self::Orchestrated => "orchestrated",
        }
    }
}

impl fmt::Display for GalleryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an image-load signal captured the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// This signal captured the buffer.
    Captured,
    /// The buffer was captured by an earlier signal; nothing changed.
    AlreadyCaptured,
}

/// One page's gallery: tiles, surfaces, source buffer, and state.
pub struct Gallery<P: Page> {
    config: GalleryConfig,
    state: GalleryState,
    tiles: Vec<P::Tile>,
    surfaces: Vec<P::Surface>,
    loader: SourceImageLoader,
    buffer: Option<RawPixelBuffer>,
}

impl<P: Page> Gallery<P> {
    /// A new, uninitialized gallery.
    #[must_use]
    pub fn new(config: GalleryConfig) -> Self {
        let loader = SourceImageLoader::new(config.source_image.clone(), config.surface);
        Self {
            config,
            state: GalleryState::Uninitialized,
            tiles: Vec::new(),
            surfaces: Vec::new(),
            loader,
            buffer: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GalleryState {
        self.state
    }

    /// The configuration this gallery was built with.
    #[must_use]
    pub const fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Path or URL of the source image the host should load.
    #[must_use]
    pub fn source(&self) -> &str {
        self.loader.source()
    }

    /// Tiles found at page-ready, in document order.
    #[must_use]
    pub fn tiles(&self) -> &[P::Tile] {
        &self.tiles
    }

    /// Surfaces, one per tile, at the same indices.
    #[must_use]
    pub fn surfaces(&self) -> &[P::Surface] {
        &self.surfaces
    }

    /// The captured source buffer, once loaded.
    #[must_use]
    pub const fn buffer(&self) -> Option<&RawPixelBuffer> {
        self.buffer.as_ref()
    }

    /// Handle the page-ready event: discover tiles and provision one
    /// surface per tile.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::InvalidTransition`] unless the gallery is
    /// [`GalleryState::Uninitialized`], or [`GalleryError::Page`] if
    /// tiles cannot be listed or surfaces cannot be created. On a page
    /// failure the gallery stays uninitialized.
    pub fn page_ready(&mut self, page: &mut P) -> Result<(), GalleryError> {
        self.expect_state(GalleryState::Uninitialized, "handle page-ready")?;

        let tiles = page.tiles()?;
        let surfaces = GallerySurfaceManager::new(self.config.surface).provision(page, &tiles)?;
        log::info!("gallery ready with {} tiles", tiles.len());

        self.tiles = tiles;
        self.surfaces = surfaces;
        self.state = GalleryState::SurfacesReady;
        Ok(())
    }

    /// Handle the source image's load-completion signal.
    ///
    /// The first signal after page-ready captures the buffer; any later
    /// signal returns [`Capture::AlreadyCaptured`] and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::InvalidTransition`] if the page is not
    /// ready yet, or [`GalleryError::Page`] if capture fails.
    pub fn image_loaded(
        &mut self,
        page: &mut P,
        image: &RgbaImage,
    ) -> Result<Capture, GalleryError> {
        match self.state {
            GalleryState::Uninitialized => Err(GalleryError::InvalidTransition {
                state: self.state,
                event: "capture the source image",
            }),
            GalleryState::ImageLoaded | GalleryState::Orchestrated => {
                log::debug!("source already captured, ignoring load signal");
                Ok(Capture::AlreadyCaptured)
            }
            GalleryState::SurfacesReady => match self.loader.on_load(page, image)? {
                Some(buffer) => {
                    self.buffer = Some(buffer);
                    self.state = GalleryState::ImageLoaded;
                    Ok(Capture::Captured)
                }
                None => Ok(Capture::AlreadyCaptured),
            },
        }
    }

    /// Run the orchestrator once over the engine's catalog.
    ///
    /// The gallery moves to [`GalleryState::Orchestrated`] before the run
    /// starts, so a failed run is not retried.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::InvalidTransition`] unless the gallery is
    /// [`GalleryState::ImageLoaded`]; otherwise whatever the orchestrator
    /// returns.
    pub fn orchestrate<E>(
        &mut self,
        page: &mut P,
        engine: &E,
    ) -> Result<OrchestrationReport, GalleryError>
    where
        E: FilterEngine + ?Sized,
    {
        self.expect_state(GalleryState::ImageLoaded, "orchestrate")?;
        let Some(buffer) = self.buffer.as_ref() else {
            return Err(GalleryError::InvalidTransition {
                state: self.state,
                event: "orchestrate without a captured buffer",
            });
        };
        self.state = GalleryState::Orchestrated;

        FilterApplicationOrchestrator::new(self.config.bounds, self.config.label_class.clone()).run(
            page,
            engine,
            buffer,
            &self.tiles,
            &self.surfaces,
        )
    }

    /// The image-load continuation: capture on the first signal and
    /// orchestrate right after. Later signals return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// See [`image_loaded`](Self::image_loaded) and
    /// [`orchestrate`](Self::orchestrate).
    pub fn on_image_loaded<E>(
        &mut self,
        page: &mut P,
        engine: &E,
        image: &RgbaImage,
    ) -> Result<Option<OrchestrationReport>, GalleryError>
    where
        E: FilterEngine + ?Sized,
    {
        match self.image_loaded(page, image)? {
            Capture::Captured => self.orchestrate(page, engine).map(Some),
            Capture::AlreadyCaptured => Ok(None),
        }
    }

    fn expect_state(
        &self,
        expected: GalleryState,
        event: &'static str,
    ) -> Result<(), GalleryError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GalleryError::InvalidTransition {
                state: self.state,
                event,
            })
        }
    }
}

impl<P: Page> fmt::Debug for Gallery<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gallery")
            .field("state", &self.state)
            .field("tiles", &self.tiles.len())
            .field("surfaces", &self.surfaces.len())
            .field("source", &self.loader.source())
            .finish_non_exhaustive()
    }
}
