//! Foundational primitives for masking segmented stacks against traced
//! boundaries.
//!
//! ## Rasters
//! Images are contiguous and row-major. Labels are `u16`, masks are `u8`
//! with `0` meaning outside.
//!
//! ## Coordinates
//! Pixel `(x, y)` has its center at `(x, y)` and covers the square
//! `[x - 0.5, x + 0.5] x [y - 0.5, y + 0.5]`. Contour points use the same
//! frame, so a contour traced along pixel edges sits on half-integer
//! coordinates.
//!
//! ## Vector models
//! [`Model`] is an arena: objects refer to contours by [`ContourId`], and
//! contours own their 2-D points plus the slice index they live on. Models are
//! built once and then read; stages that filter, merge or split produce new
//! models.

mod error;
mod geom;
mod image;
mod model;
mod stack;

pub use error::Error;
pub use geom::{BBox, Point2f, Vec2f, arc_length, polygon_centroid, signed_area};
pub use image::{Image, ImageView, ImageViewMut};
pub use model::{Color, Contour, ContourId, Model, ModelObject, ObjectId};
pub use stack::{Dims, SegmentationStack};
