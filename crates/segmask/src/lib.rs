//! Umbrella crate for the `segmask` workspace.
//!
//! Re-exports the stage crates and provides the job pipeline:
//! boundary preparation, optional gap filling, boundary rasterization,
//! slice masking, tracing, object assembly and optional mesh splitting.
//! See [`run_mask_job`].

mod config;
mod error;
mod pipeline;

pub use config::{MaskJobConfig, MaskPolicy};
pub use error::MaskError;
pub use pipeline::{JobSummary, MaskJobOutput, load_inputs, run_mask_job, validate_inputs};

pub use sm_assemble as assemble;
pub use sm_core::*;
pub use sm_interp as interp;
pub use sm_io as io;
pub use sm_mesh as mesh;
pub use sm_raster as raster;
pub use sm_trace as trace;
