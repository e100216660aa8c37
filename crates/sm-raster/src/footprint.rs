use sm_core::{BBox, Image, Point2f};

use crate::{FillRule, fill_polygons_u8};

/// Filled pixel set of a polygon group, stored over its own bounding box so
/// two footprints can be compared without allocating full planes.
#[derive(Debug, Clone)]
pub struct Footprint {
    x0: i64,
    y0: i64,
    mask: Image<u8>,
    area: usize,
}

impl Footprint {
    pub fn of(polygons: &[&[Point2f]], rule: FillRule) -> Self {
        let bounds = polygons
            .iter()
            .filter_map(|p| BBox::of(p))
            .reduce(BBox::union);

        let Some(b) = bounds else {
            return Self::empty();
        };

        let x0 = b.min.x.ceil() as i64;
        let y0 = b.min.y.ceil() as i64;
        let x1 = b.max.x.floor() as i64;
        let y1 = b.max.y.floor() as i64;
        if x1 < x0 || y1 < y0 {
            return Self::empty();
        }

        let shift = |p: &Point2f| Point2f::new(p.x - x0 as f32, p.y - y0 as f32);
        let local: Vec<Vec<Point2f>> = polygons
            .iter()
            .map(|poly| poly.iter().map(shift).collect())
            .collect();
        let refs: Vec<&[Point2f]> = local.iter().map(Vec::as_slice).collect();

        let mask = fill_polygons_u8((x1 - x0 + 1) as usize, (y1 - y0 + 1) as usize, &refs, rule);
        let area = mask.count_set();
        Self { x0, y0, mask, area }
    }

    fn empty() -> Self {
        Self {
            x0: 0,
            y0: 0,
            mask: Image::new_fill(0, 0, 0u8),
            area: 0,
        }
    }

    pub fn area(&self) -> usize {
        self.area
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        let (lx, ly) = (x - self.x0, y - self.y0);
        if lx < 0 || ly < 0 {
            return false;
        }
        self.mask
            .get(lx as usize, ly as usize)
            .is_some_and(|&v| v != 0)
    }

    /// Number of pixels set in both footprints.
    pub fn overlap(&self, other: &Footprint) -> usize {
        if self.area == 0 || other.area == 0 {
            return 0;
        }

        let xa = self.x0.max(other.x0);
        let ya = self.y0.max(other.y0);
        let xb = (self.x0 + self.mask.width() as i64).min(other.x0 + other.mask.width() as i64);
        let yb = (self.y0 + self.mask.height() as i64).min(other.y0 + other.mask.height() as i64);

        let mut n = 0;
        for y in ya..yb {
            for x in xa..xb {
                if self.contains(x, y) && other.contains(x, y) {
                    n += 1;
                }
            }
        }
        n
    }

    /// Shared area relative to the smaller footprint, in `[0, 1]`.
    pub fn overlap_fraction(&self, other: &Footprint) -> f32 {
        let smaller = self.area.min(other.area);
        if smaller == 0 {
            return 0.0;
        }
        self.overlap(other) as f32 / smaller as f32
    }
}
