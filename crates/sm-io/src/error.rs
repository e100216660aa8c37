use std::path::PathBuf;

use thiserror::Error;

/// Malformed content, with the 1-based line when the format is line-based.
#[derive(Debug, Error)]
#[error("{}{msg}", .line.map(|l| format!("line {l}: ")).unwrap_or_default())]
pub struct FormatError {
    pub line: Option<usize>,
    pub msg: String,
}

impl FormatError {
    pub fn new(line: Option<usize>, msg: impl Into<String>) -> Self {
        Self {
            line,
            msg: msg.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IoError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: invalid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{}: {source}", .path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("{}: {source}", .path.display())]
    Format {
        path: PathBuf,
        source: FormatError,
    },
    #[error("{}: plane is {actual:?}, expected {expected:?}", .path.display())]
    PlaneSize {
        path: PathBuf,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("{}: a point listing needs the stack size", .0.display())]
    MissingDims(PathBuf),
    #[error("no label images found in {}", .0.display())]
    EmptyStack(PathBuf),
    #[error(transparent)]
    Raster(#[from] sm_core::Error),
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
