//! Stacking per-slice contours into 3-D objects.
//!
//! [`assemble`] runs the fixed sequence group, optional merge, style,
//! filter. Each step is also exposed on its own and returns a new
//! [`Model`](sm_core::Model); inputs are never edited in place.

mod filter;
mod group;

use serde::{Deserialize, Serialize};
use sm_core::{Color, Dims, Model};
use sm_trace::PlaneTrace;

pub use filter::{apply_style, filter_by_contour_count, merge_all};
pub use group::{GroupingPolicy, group_contours};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssembleConfig {
    pub grouping: GroupingPolicy,
    /// Fold every object into one.
    pub merge_all: bool,
    pub name: Option<String>,
    pub color: Option<Color>,
    /// Objects with this many contours or fewer are dropped. `0` keeps all.
    pub filter_contours: usize,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            grouping: GroupingPolicy::default(),
            merge_all: false,
            name: None,
            color: None,
            filter_contours: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleReport {
    pub grouped: usize,
    pub before_filter: usize,
    pub after_filter: usize,
}

/// Groups `planes` (indexed by slice) into objects and applies merge, style
/// and the contour-count filter from `cfg`.
pub fn assemble(
    dims: Dims,
    planes: &[PlaneTrace],
    cfg: &AssembleConfig,
) -> (Model, AssembleReport) {
    let grouped = group_contours(dims, planes, cfg.grouping);
    let mut report = AssembleReport {
        grouped: grouped.num_objects(),
        ..AssembleReport::default()
    };

    let merged = if cfg.merge_all {
        merge_all(&grouped)
    } else {
        grouped
    };
    let styled = apply_style(&merged, cfg.name.as_deref(), cfg.color);

    report.before_filter = styled.num_objects();
    let filtered = filter_by_contour_count(&styled, cfg.filter_contours);
    report.after_filter = filtered.num_objects();

    log::info!(
        "assembled {} object(s), {} after contour filter (threshold {})",
        report.before_filter,
        report.after_filter,
        cfg.filter_contours
    );
    (filtered, report)
}
