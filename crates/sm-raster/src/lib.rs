//! Polygon fill and label masking.
//!
//! Fill samples pixel centers: pixel `(x, y)` is set when the point `(x, y)`
//! lies inside the polygon set under the chosen [`FillRule`]. Spans are
//! half-open on the right, so two polygons sharing an edge never both claim
//! the pixels on it.
//!
//! Mask outputs are `0` or `255` in `u8`. Masking keeps label values
//! unchanged wherever the mask is non-zero.

mod footprint;
mod mask;
mod rasterize;

pub use footprint::Footprint;
pub use mask::{apply_mask_u16, union_mask_into};
pub use rasterize::{FillRule, fill_polygons_into, fill_polygons_u8, rasterize_object};
