//! Filter application: one engine call per catalog entry, one surface
//! and one label per result.

use web_time::Instant;

use crate::diagnostics::{AppliedFilter, OrchestrationReport};
use crate::engine::FilterEngine;
use crate::page::Page;
use crate::types::{BoundsPolicy, GalleryError, RawPixelBuffer};

/// Drives the engine over its whole catalog and fills the gallery.
#[derive(Debug, Clone)]
pub struct FilterApplicationOrchestrator {
    policy: BoundsPolicy,
    label_class: String,
}

impl FilterApplicationOrchestrator {
    /// An orchestrator applying `policy` to catalog/surface mismatches and
    /// tagging labels with `label_class`.
    #[must_use]
    pub fn new(policy: BoundsPolicy, label_class: impl Into<String>) -> Self {
        Self {
            policy,
            label_class: label_class.into(),
        }
    }

    /// Apply every catalog filter to `buffer` and write the results.
    ///
    /// For catalog position `j`: transform `buffer` (never mutated) with
    /// filter `j`, write the new pixels to surface `j`, then append a
    /// label naming the filter to tile `j`, after the surface.
    ///
    /// `tiles` and `surfaces` are positionally paired. Catalog entries
    /// without a surface are skipped under [`BoundsPolicy::Skip`] and
    /// rejected up front under [`BoundsPolicy::Reject`].
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Catalog`] if the catalog cannot be read,
    /// [`GalleryError::Filter`] for the first engine failure,
    /// [`GalleryError::Page`] for the first write failure, and
    /// [`GalleryError::BoundsMismatch`] when rejecting. Work finished
    /// before the failure stays on the page.
    pub fn run<P, E>(
        &self,
        page: &mut P,
        engine: &E,
        buffer: &RawPixelBuffer,
        tiles: &[P::Tile],
        surfaces: &[P::Surface],
    ) -> Result<OrchestrationReport, GalleryError>
    where
        P: Page,
        E: FilterEngine + ?Sized,
    {
        let started = Instant::now();
        let catalog = engine.catalog().map_err(GalleryError::Catalog)?;

        let slots = tiles.len().min(surfaces.len());
        if self.policy == BoundsPolicy::Reject && catalog.len() > slots {
            return Err(GalleryError::BoundsMismatch {
                target: "surfaces".into(),
                required: catalog.len(),
                available: slots,
            });
        }

        let mut applied = Vec::with_capacity(slots.min(catalog.len()));
        let mut skipped = Vec::new();
        for (index, filter) in catalog.into_iter().enumerate() {
            let (Some(tile), Some(surface)) = (tiles.get(index), surfaces.get(index)) else {
                log::debug!("no surface for {filter} at position {index}, skipping");
                skipped.push(filter);
                continue;
            };

            let step = Instant::now();
            let output = engine
                .apply_to_buffer(buffer.pixels(), &filter)
                .map_err(|source| GalleryError::Filter {
                    index,
                    filter: filter.clone(),
                    source,
                })?;
            page.put_pixels(surface, &output)?;
            page.append_label(tile, filter.as_str(), &self.label_class)?;

            applied.push(AppliedFilter {
                index,
                filter,
                duration: step.elapsed(),
            });
        }

        let report = OrchestrationReport {
            applied,
            skipped,
            total_duration: started.elapsed(),
        };
        log::info!(
            "applied {} filters ({} skipped) in {:.1} ms",
            report.applied.len(),
            report.skipped.len(),
            report.total_duration.as_secs_f64() * 1000.0
        );
        Ok(report)
    }
}
