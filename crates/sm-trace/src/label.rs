use serde::{Deserialize, Serialize};
use sm_core::{Image, ImageView};

const DX: [isize; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [isize; 8] = [0, -1, -1, -1, 0, 1, 1, 1];
const DIRS_C4: [u8; 4] = [0, 2, 4, 6];
const DIRS_C8: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Pixel adjacency used both for grouping pixels into regions and for
/// resolving diagonal pinches while tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Connectivity {
    C4,
    #[default]
    C8,
}

/// Maximal connected set of pixels sharing one non-background value.
#[derive(Debug, Clone)]
pub struct Region<T> {
    pub label: T,
    /// First pixel of the region in raster order; its top edge is always on
    /// the outer boundary.
    pub seed: (usize, usize),
    /// Inclusive bounds `(x0, y0, x1, y1)`.
    pub bbox: (usize, usize, usize, usize),
    pub pixels: Vec<(usize, usize)>,
}

impl<T> Region<T> {
    pub fn area(&self) -> usize {
        self.pixels.len()
    }
}

/// Region indicator over a padded window of the source plane.
#[derive(Debug, Clone)]
pub struct RegionMask {
    /// Plane coordinates of local pixel `(0, 0)`.
    pub origin: (isize, isize),
    pub mask: Image<u8>,
}

impl RegionMask {
    pub fn from_region<T>(region: &Region<T>, pad: usize) -> Self {
        let (x0, y0, x1, y1) = region.bbox;
        let w = x1 - x0 + 1 + 2 * pad;
        let h = y1 - y0 + 1 + 2 * pad;
        let origin = (x0 as isize - pad as isize, y0 as isize - pad as isize);

        let mut mask = Image::new_fill(w, h, 0u8);
        {
            let mut view = mask.as_view_mut();
            for &(x, y) in &region.pixels {
                let lx = (x as isize - origin.0) as usize;
                let ly = (y as isize - origin.1) as usize;
                if let Some(px) = view.get_mut(lx, ly) {
                    *px = 255;
                }
            }
        }

        Self { origin, mask }
    }

    pub fn to_plane(&self, local: (usize, usize)) -> (isize, isize) {
        (local.0 as isize + self.origin.0, local.1 as isize + self.origin.1)
    }
}

/// Splits `img` into connected regions of equal, non-default values.
pub fn label_regions<T>(img: &ImageView<'_, T>, connectivity: Connectivity) -> Vec<Region<T>>
where
    T: Copy + PartialEq + Default,
{
    let (width, height) = img.dims();
    let n = width * height;
    if n == 0 {
        return Vec::new();
    }

    let background = T::default();
    let dirs = dirs_for(connectivity);
    let mut seen = vec![0_u8; n];
    let mut stack = Vec::new();
    let mut regions = Vec::new();

    for sy in 0..height {
        for sx in 0..width {
            let value = img.row(sy)[sx];
            if value == background || seen[sy * width + sx] != 0 {
                continue;
            }

            stack.clear();
            seen[sy * width + sx] = 1;
            stack.push((sx, sy));
            let mut pixels = Vec::new();
            let mut bbox = (sx, sy, sx, sy);

            while let Some((x, y)) = stack.pop() {
                pixels.push((x, y));
                bbox.0 = bbox.0.min(x);
                bbox.1 = bbox.1.min(y);
                bbox.2 = bbox.2.max(x);
                bbox.3 = bbox.3.max(y);

                for &dir in dirs {
                    let Some((nx, ny)) = neighbor(x, y, dir, width, height) else {
                        continue;
                    };
                    let p = ny * width + nx;
                    if seen[p] == 0 && img.row(ny)[nx] == value {
                        seen[p] = 1;
                        stack.push((nx, ny));
                    }
                }
            }

            regions.push(Region {
                label: value,
                seed: (sx, sy),
                bbox,
                pixels,
            });
        }
    }

    regions
}

#[inline]
fn dirs_for(connectivity: Connectivity) -> &'static [u8] {
    match connectivity {
        Connectivity::C4 => &DIRS_C4,
        Connectivity::C8 => &DIRS_C8,
    }
}

#[inline]
fn neighbor(x: usize, y: usize, dir: u8, width: usize, height: usize) -> Option<(usize, usize)> {
    let nx = x as isize + DX[dir as usize];
    let ny = y as isize + DY[dir as usize];
    if nx < 0 || ny < 0 {
        return None;
    }

    let (nxu, nyu) = (nx as usize, ny as usize);
    if nxu >= width || nyu >= height {
        return None;
    }
    Some((nxu, nyu))
}
