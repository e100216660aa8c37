use serde::{Deserialize, Serialize};
use sm_assemble::AssembleConfig;
use sm_core::Dims;
use sm_interp::InterpolateConfig;
use sm_mesh::MeshConfig;
use sm_raster::FillRule;
use sm_trace::TraceConfig;

use crate::MaskError;

/// How boundary objects become masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPolicy {
    /// All boundary objects are OR-ed into one mask.
    #[default]
    Union,
    /// Each boundary object masks the stack on its own; outputs are
    /// concatenated in boundary order.
    PerObject,
}

/// Parameters of one mask job, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskJobConfig {
    pub mask_policy: MaskPolicy,
    pub fill_rule: FillRule,
    /// Fill missing boundary slices before masking.
    pub run_interpolation: bool,
    pub interpolate: InterpolateConfig,
    pub trace: TraceConfig,
    pub assemble: AssembleConfig,
    /// Mesh the assembled objects and split them by surface connectivity.
    pub run_postprocessing: bool,
    pub mesh: MeshConfig,
}

impl MaskJobConfig {
    /// Rejects tracing parameters that are not finite or exceed the plane:
    /// sigma above the larger side, tolerance above the diagonal.
    pub fn validate(&self, dims: Dims) -> Result<(), MaskError> {
        let side = dims.x.max(dims.y) as f32;
        let diagonal = (dims.x as f32).hypot(dims.y as f32);
        check_range("smoothing sigma", self.trace.smooth_sigma, side)?;
        check_range("shave tolerance", self.trace.shave_tolerance, diagonal)
    }
}

fn check_range(name: &'static str, value: f32, max: f32) -> Result<(), MaskError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(MaskError::InvalidParameter { name, value, max })
    }
}
