//! File formats around the masking pipeline.
//!
//! - vector models as JSON ([`read_model`], [`write_model`])
//! - whitespace point listings, `object contour x y z` ([`read_point_list`],
//!   [`write_point_list`])
//! - label stacks as a directory of single-channel images ([`load_stack`])
//! - binary STL for surface meshes ([`write_stl`])

mod error;
mod model_file;
mod point_list;
mod stack_dir;
mod stl;

pub use error::{FormatError, IoError};
pub use model_file::{ContourRecord, ModelFile, ObjectRecord, read_model, write_model};
pub use point_list::{
    is_point_list, parse_point_list, read_any_model, read_point_list, save_point_list,
    write_any_model, write_point_list,
};
pub use stack_dir::{load_stack, save_stack};
pub use stl::{mesh_to_stl_bytes, write_stl};

/// Slice index of a contour: the most common rounded `z` among its points.
/// Ties go to the lower slice. Mixed slices are logged.
pub(crate) fn contour_slice(points: &[[f32; 3]]) -> Result<usize, FormatError> {
    let mut zs = Vec::with_capacity(points.len());
    for p in points {
        let z = p[2].round();
        if !z.is_finite() || z < 0.0 {
            return Err(FormatError::new(None, format!("invalid z coordinate {}", p[2])));
        }
        zs.push(z as usize);
    }
    zs.sort_unstable();

    let mut best = (0usize, 0usize);
    let mut i = 0;
    while i < zs.len() {
        let run = zs[i..].iter().take_while(|&&z| z == zs[i]).count();
        if run > best.1 {
            best = (zs[i], run);
        }
        i += run;
    }

    if best.1 < zs.len() {
        log::warn!(
            "contour spans slices {}..={}, using slice {}",
            zs[0],
            zs[zs.len() - 1],
            best.0
        );
    }
    Ok(best.0)
}
