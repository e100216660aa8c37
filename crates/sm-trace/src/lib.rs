//! Raster-to-contour tracing for masked segmentation planes.
//!
//! Each plane is split into regions: maximal connected sets of one non-zero
//! label under the configured [`Connectivity`]. Every region's outer boundary
//! is walked along pixel edges, so filling the traced polygon at pixel
//! centers gives back the region's footprint (holes filled) when smoothing
//! and shaving are off.
//!
//! Optional steps, both disabled at zero:
//! - `smooth_sigma`: Gaussian blur of the region indicator, thresholded at
//!   one half, before tracing. A region may split into several pieces.
//! - `shave_tolerance`: Ramer-Douglas-Peucker point removal, in pixels.
//!
//! A region that cannot be traced is skipped with a warning and counted in
//! [`PlaneTrace::failures`]; the rest of the plane is still traced.

pub mod conv;
pub mod kernels;
mod label;
mod simplify;
mod smooth;
mod trace;

use serde::{Deserialize, Serialize};
use sm_core::{ImageView, Point2f};

pub use label::{Connectivity, Region, RegionMask, label_regions};
pub use simplify::shave_closed;
pub use smooth::smooth_region_mask;
pub use trace::{TraceError, trace_outer_boundary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    pub connectivity: Connectivity,
    pub shave_tolerance: f32,
    pub smooth_sigma: f32,
    /// Regions with fewer pixels are ignored.
    pub min_area: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::C8,
            shave_tolerance: 0.0,
            smooth_sigma: 0.0,
            min_area: 1,
        }
    }
}

/// Closed contour traced from one region of a plane.
impl TraceConfig {
    /// Smoothing sigma used on a `(width, height)` plane. `None` when
    /// smoothing is off or the value is not finite; otherwise capped at the
    /// larger plane side.
    pub fn effective_sigma(&self, plane: (usize, usize)) -> Option<f32> {
        let s = self.smooth_sigma;
        if !s.is_finite() || s <= 0.0 {
            return None;
        }
        Some(s.min(plane.0.max(plane.1).max(1) as f32))
    }

    /// Shaving tolerance, zero unless finite and positive.
    pub fn effective_tolerance(&self) -> f32 {
        let t = self.shave_tolerance;
        if t.is_finite() && t > 0.0 { t } else { 0.0 }
    }
}

/// Closed contour traced from one region of a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedContour {
    pub label: u16,
    /// Index of the source region within the plane, in raster order of seeds.
    pub region: usize,
    /// Pixel count of the traced piece.
    pub area: usize,
    pub points: Vec<Point2f>,
}

#[derive(Debug, Clone, Default)]
pub struct PlaneTrace {
    pub contours: Vec<TracedContour>,
    pub failures: usize,
}

pub fn trace_plane(plane: &ImageView<'_, u16>, cfg: &TraceConfig) -> PlaneTrace {
    let mut out = PlaneTrace::default();
    let regions = label_regions(plane, cfg.connectivity);
    let sigma = cfg.effective_sigma(plane.dims());
    let min_area = cfg.min_area.max(1);

    for (idx, region) in regions.iter().enumerate() {
        if region.area() < min_area {
            continue;
        }

        let pieces = if let Some(sigma) = sigma {
            let pad = (3.0 * sigma).ceil() as usize + 1;
            let local = RegionMask::from_region(region, pad);
            let smoothed = smooth_region_mask(&local, sigma, plane.dims());
            let sub = label_regions(&smoothed.mask.as_view(), cfg.connectivity);
            if sub.is_empty() {
                log::debug!(
                    "region {idx} (label {}) vanished after smoothing",
                    region.label
                );
            }
            sub.into_iter()
                .filter(|s| s.area() >= min_area)
                .map(|s| (smoothed.clone(), s.seed, s.area()))
                .collect()
        } else {
            let local = RegionMask::from_region(region, 0);
            let seed = (region.seed.0 - region.bbox.0, region.seed.1 - region.bbox.1);
            vec![(local, seed, region.area())]
        };

        for (local, seed, area) in pieces {
            trace_piece(&mut out, region, idx, &local, seed, area, cfg);
        }
    }

    out
}

/// Traces one piece of region `idx` into `out`, or logs and counts the
/// failure.
fn trace_piece(
    out: &mut PlaneTrace,
    region: &Region<u16>,
    idx: usize,
    local: &RegionMask,
    seed: (usize, usize),
    area: usize,
    cfg: &TraceConfig,
) {
    match trace_outer_boundary(&local.mask.as_view(), seed, cfg.connectivity) {
        Ok(points) => {
            let (ox, oy) = (local.origin.0 as f32, local.origin.1 as f32);
            let shifted: Vec<Point2f> = points
                .iter()
                .map(|p| Point2f::new(p.x + ox, p.y + oy))
                .collect();
            out.contours.push(TracedContour {
                label: region.label,
                region: idx,
                area,
                points: shave_closed(&shifted, cfg.effective_tolerance()),
            });
        }
        Err(e) => {
            log::warn!(
                "skipping region {idx} (label {}, {} px): {e}",
                region.label,
                region.area()
            );
            out.failures += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use sm_core::{Image, signed_area};
    use sm_raster::{FillRule, fill_polygons_u8};

    use super::{
        Connectivity, PlaneTrace, RegionMask, TraceConfig, label_regions, trace_piece, trace_plane,
    };

    fn blob_plane() -> Image<u16> {
        #[rustfmt::skip]
        let data = vec![
            0u16, 0, 0, 0, 0, 0, 0, 0,
            0, 3, 3, 3, 0, 0, 0, 0,
            0, 3, 3, 0, 0, 0, 7, 7,
            0, 3, 0, 0, 0, 0, 7, 7,
            0, 0, 0, 0, 0, 0, 0, 0,
            9, 0, 0, 0, 0, 0, 0, 0,
        ];
        Image::from_vec(8, 6, data).expect("valid image")
    }

    #[test]
    fn each_region_gives_one_tagged_contour() {
        let plane = blob_plane();
        let traced = trace_plane(&plane.as_view(), &TraceConfig::default());

        assert_eq!(traced.failures, 0);
        let labels: Vec<u16> = traced.contours.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec![3, 7, 9]);

        let areas: Vec<usize> = traced.contours.iter().map(|c| c.area).collect();
        assert_eq!(areas, vec![6, 4, 1]);
        for c in &traced.contours {
            assert!((signed_area(&c.points) - c.area as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn rasterizing_traced_contours_reproduces_footprint() {
        let plane = blob_plane();
        let traced = trace_plane(&plane.as_view(), &TraceConfig::default());
        let polys: Vec<&[sm_core::Point2f]> =
            traced.contours.iter().map(|c| c.points.as_slice()).collect();

        let refill = fill_polygons_u8(8, 6, &polys, FillRule::EvenOdd);
        for (r, l) in refill.data().iter().zip(plane.data()) {
            assert_eq!(*r != 0, *l != 0);
        }
    }

    #[test]
    fn min_area_and_smoothing_drop_small_regions() {
        let plane = blob_plane();
        let cfg = TraceConfig {
            min_area: 2,
            ..TraceConfig::default()
        };
        assert_eq!(trace_plane(&plane.as_view(), &cfg).contours.len(), 2);

        let mut big = Image::new_fill(30, 30, 0u16);
        {
            let mut v = big.as_view_mut();
            for y in 8..22 {
                for x in 8..22 {
                    *v.get_mut(x, y).expect("in bounds") = 4;
                }
            }
            *v.get_mut(2, 2).expect("in bounds") = 5;
        }
        let smooth = TraceConfig {
            smooth_sigma: 1.0,
            connectivity: Connectivity::C4,
            ..TraceConfig::default()
        };
        let traced = trace_plane(&big.as_view(), &smooth);
        assert_eq!(traced.contours.len(), 1);
        assert_eq!(traced.contours[0].label, 4);
    }

    #[test]
    fn shaving_reduces_points_of_staircase_edges() {
        let plane = blob_plane();
        let plain = trace_plane(&plane.as_view(), &TraceConfig::default());
        let shaved = trace_plane(
            &plane.as_view(),
            &TraceConfig {
                shave_tolerance: 0.8,
                ..TraceConfig::default()
            },
        );
        assert!(shaved.contours[0].points.len() < plain.contours[0].points.len());
        assert!(shaved.contours[0].points.len() >= 3);
    }

    #[test]
    fn non_finite_or_huge_sigma_is_tamed() {
        let plane = blob_plane();
        let plain = trace_plane(&plane.as_view(), &TraceConfig::default());

        for bad in [f32::INFINITY, f32::NAN, -1.0] {
            let cfg = TraceConfig {
                smooth_sigma: bad,
                shave_tolerance: bad,
                ..TraceConfig::default()
            };
            assert_eq!(cfg.effective_sigma(plane.dims()), None);
            assert_eq!(cfg.effective_tolerance(), 0.0);
            assert_eq!(trace_plane(&plane.as_view(), &cfg).contours, plain.contours);
        }

        let huge = TraceConfig {
            smooth_sigma: 1.0e9,
            ..TraceConfig::default()
        };
        assert_eq!(huge.effective_sigma(plane.dims()), Some(8.0));
        assert_eq!(trace_plane(&plane.as_view(), &huge).failures, 0);
    }

    #[test]
    fn untraceable_piece_is_skipped_and_counted() {
        let plane = blob_plane();
        let regions = label_regions(&plane.as_view(), Connectivity::C8);
        let region = &regions[0];
        let local = RegionMask::from_region(region, 1);
        let cfg = TraceConfig::default();

        let mut out = PlaneTrace::default();
        // Padding corner: never set.
        trace_piece(&mut out, region, 0, &local, (0, 0), region.area(), &cfg);
        assert_eq!(out.failures, 1);
        assert!(out.contours.is_empty());

        trace_piece(&mut out, region, 0, &local, (1, 1), region.area(), &cfg);
        assert_eq!(out.failures, 1);
        assert_eq!(out.contours.len(), 1);
        assert_eq!(out.contours[0].label, 3);
    }
}
