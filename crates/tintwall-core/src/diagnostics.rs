//! Run reports: what the orchestrator and demo-group runner did.
//!
//! Duration measurements use [`std::time::Duration`]. Timestamps are
//! captured via the `web-time` crate, which uses `performance.now()` on
//! WASM and `std::time::Instant` on native.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assignment::GroupId;
use crate::types::FilterName;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// One filter written to one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilter {
    /// Tile/surface position.
    pub index: usize,
    /// Filter that was applied.
    pub filter: FilterName,
    /// Wall-clock time spent in the engine and the surface write.
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Outcome of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationReport {
    /// Filters applied, in catalog order.
    pub applied: Vec<AppliedFilter>,
    /// Catalog entries with no surface at their position.
    pub skipped: Vec<FilterName>,
    /// Wall-clock duration of the whole run.
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Outcome of filtering one demo group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// The group that was filtered.
    pub group: GroupId,
    /// Thumbnails that received a filter.
    pub filtered: usize,
    /// Thumbnails past the end of the group's assignment, left as-is.
    pub untouched: usize,
}
