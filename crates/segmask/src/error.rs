use thiserror::Error;

/// Fatal job errors. Per-region and per-gap problems are logged and counted
/// in the job summary instead.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("{what} mismatch: boundary model has {expected}, segmentation stack has {actual}")]
    InputMismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },
    #[error("boundary model has no objects")]
    EmptyBoundary,
    #[error("boundary object {object} contour {contour} is on slice {z}, stack depth is {depth}")]
    ContourOutOfRange {
        object: usize,
        contour: usize,
        z: usize,
        depth: usize,
    },
    #[error("{name} must be finite and within 0..={max}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        max: f32,
    },
    #[error(transparent)]
    Raster(#[from] sm_core::Error),
    #[error(transparent)]
    Io(#[from] sm_io::IoError),
}
