//! In-place filtering of the demo thumbnail groups.
//!
//! Unlike the orchestrator, this path has no surfaces: each thumbnail's
//! own pixels are replaced by the output of its assigned filter.

use crate::assignment::{FilterAssignmentTable, GroupId};
use crate::diagnostics::GroupReport;
use crate::engine::FilterEngine;
use crate::page::Page;
use crate::types::{BoundsPolicy, GalleryError};

/// Applies each group's assignment to that group's thumbnails.
#[derive(Debug, Clone, Copy)]
pub struct DemoGroupFilterRunner {
    table: FilterAssignmentTable,
    policy: BoundsPolicy,
}

impl DemoGroupFilterRunner {
    /// A runner over `table` applying `policy` to thumbnail/filter
    /// count mismatches.
    #[must_use]
    pub const fn new(table: FilterAssignmentTable, policy: BoundsPolicy) -> Self {
        Self { table, policy }
    }

    /// Filter every group in the table, in table order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing group; groups already filtered stay
    /// filtered. See [`run_group`](Self::run_group).
    pub fn run_all<P, E>(&self, page: &mut P, engine: &E) -> Result<Vec<GroupReport>, GalleryError>
    where
        P: Page,
        E: FilterEngine + ?Sized,
    {
        self.table
            .groups()
            .map(|group| self.run_group(page, engine, group))
            .collect()
    }

    /// Filter thumbnail `j` of `group` in place with the group's filter `j`.
    ///
    /// Only `min(thumbnails, filters)` positions are visited; thumbnails
    /// past the end of the assignment are never passed to the engine.
    /// Every thumbnail that will be visited must report decode-complete
    /// before anything in the group is mutated.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::BoundsMismatch`] under
    /// [`BoundsPolicy::Reject`] when thumbnails outnumber filters,
    /// [`GalleryError::ThumbnailNotReady`] for an undecoded thumbnail,
    /// [`GalleryError::Filter`] for the first engine failure, and
    /// [`GalleryError::Page`] for read/write failures. Thumbnails
    /// filtered before a failure keep their new pixels.
    pub fn run_group<P, E>(
        &self,
        page: &mut P,
        engine: &E,
        group: GroupId,
    ) -> Result<GroupReport, GalleryError>
    where
        P: Page,
        E: FilterEngine + ?Sized,
    {
        let filters = self.table.get(group);
        let thumbnails = page.thumbnails(group)?;

        if self.policy == BoundsPolicy::Reject && thumbnails.len() > filters.len() {
            return Err(GalleryError::BoundsMismatch {
                target: format!("{group} filter assignment"),
                required: thumbnails.len(),
                available: filters.len(),
            });
        }

        let visited = thumbnails.len().min(filters.len());
        if let Some(index) = thumbnails[..visited]
            .iter()
            .position(|t| !page.thumbnail_ready(t))
        {
            return Err(GalleryError::ThumbnailNotReady { group, index });
        }

        for (index, (thumbnail, filter)) in thumbnails.iter().zip(filters).enumerate() {
            let mut pixels = page.read_thumbnail(thumbnail)?;
            engine
                .apply_in_place(&mut pixels, filter)
                .map_err(|source| GalleryError::Filter {
                    index,
                    filter: filter.clone(),
                    source,
                })?;
            page.write_thumbnail(thumbnail, &pixels)?;
        }

        let report = GroupReport {
            group,
            filtered: visited,
            untouched: thumbnails.len() - visited,
        };
        if report.untouched > 0 {
            log::warn!(
                "group {group}: {} thumbnails have no assigned filter",
                report.untouched
            );
        }
        log::debug!("group {group}: filtered {} thumbnails", report.filtered);
        Ok(report)
    }
}

impl Default for DemoGroupFilterRunner {
    fn default() -> Self {
        Self::new(FilterAssignmentTable::BUILTIN, BoundsPolicy::default())
    }
}
