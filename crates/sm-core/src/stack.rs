use serde::{Deserialize, Serialize};

use crate::{Error, Image};

/// Stack extent in pixels (`x`, `y`) and slices (`z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Dims {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// Per-slice label planes; `0` is background, labels need not agree across
/// slices.
#[derive(Debug, Clone)]
pub struct SegmentationStack {
    width: usize,
    height: usize,
    planes: Vec<Image<u16>>,
}

impl SegmentationStack {
    pub fn from_planes(
        width: usize,
        height: usize,
        planes: Vec<Image<u16>>,
    ) -> Result<Self, Error> {
        for p in &planes {
            if p.dims() != (width, height) {
                return Err(Error::DimensionMismatch {
                    expected: (width, height),
                    actual: p.dims(),
                });
            }
        }

        Ok(Self {
            width,
            height,
            planes,
        })
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.height, self.planes.len())
    }

    pub fn depth(&self) -> usize {
        self.planes.len()
    }

    pub fn plane(&self, z: usize) -> Option<&Image<u16>> {
        self.planes.get(z)
    }

    pub fn planes(&self) -> &[Image<u16>] {
        &self.planes
    }
}
