//! Passes over hand-traced boundary models that run before rasterization.
//!
//! - [`prepare_boundary`] drops contours too small to enclose area and orders
//!   each object's contours by slice, reporting slices with no contour.
//! - [`fill_gaps`] synthesizes contours on empty slices between two traced
//!   slices, as long as the gap is at most `max_skip` slices wide.
//!
//! Interpolation only ever adds contours on empty slices; traced contours are
//! copied through untouched.

mod fill;
mod prepare;
mod shape;

pub use fill::{InterpolateConfig, InterpolationReport, fill_gaps};
pub use prepare::{BoundaryReport, missing_slices, prepare_boundary};
pub use shape::interpolate_contours;
