//! Surface meshing of stacked contours and splitting by mesh connectivity.
//!
//! Each contour is joined to every overlapping contour on the nearest slice
//! above it that holds one, searching at most `skip_slices + 1` slices
//! ahead. Rings with no partner above or below are capped. Objects are then
//! split so that each connected piece of the surface becomes its own object.

mod mesh;
mod split;

use serde::{Deserialize, Serialize};

pub use mesh::{SurfaceMesh, build_mesh};
pub use split::{MeshSplit, split_by_connectivity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Empty slices allowed between two contours that are still joined.
    pub skip_slices: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self { skip_slices: 4 }
    }
}
