use serde::{Deserialize, Serialize};
use sm_core::{Contour, Model, ObjectId, Point2f, polygon_centroid};

use crate::interpolate_contours;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolateConfig {
    /// Largest number of consecutive empty slices that get filled.
    pub max_skip: usize,
}

impl Default for InterpolateConfig {
    fn default() -> Self {
        Self { max_skip: 10 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpolationReport {
    /// Contours synthesized across all objects.
    pub added: usize,
    /// Gaps left open because they exceed `max_skip`.
    pub unfilled_gaps: usize,
    /// Contour pairs whose blend could not be computed.
    pub failed: usize,
}

/// Fills empty slices between contours of the same object by blending the
/// contours on either side of each gap. Existing contours are untouched.
pub fn fill_gaps(model: &Model, cfg: &InterpolateConfig) -> (Model, InterpolationReport) {
    let mut out = Model::new(model.dims());
    let mut report = InterpolationReport::default();

    for id in 0..model.num_objects() {
        let mut contours: Vec<Contour> = model.object_contours(id).cloned().collect();
        contours.extend(fill_object(model, id, cfg, &mut report));
        contours.sort_by_key(|c| c.z);

        let obj = model.object(id);
        out.add_object(obj.name.clone(), obj.color, contours);
    }

    (out, report)
}

fn fill_object(
    model: &Model,
    id: ObjectId,
    cfg: &InterpolateConfig,
    report: &mut InterpolationReport,
) -> Vec<Contour> {
    let mut zs: Vec<usize> = model.object_contours(id).map(|c| c.z).collect();
    zs.sort_unstable();
    zs.dedup();

    let mut added = Vec::new();
    for w in zs.windows(2) {
        let (za, zb) = (w[0], w[1]);
        let gap = zb - za;
        if gap <= 1 {
            continue;
        }
        if gap > cfg.max_skip + 1 {
            log::warn!(
                "object {}: {} empty slices between {za} and {zb} exceed max skip {}",
                id + 1,
                gap - 1,
                cfg.max_skip
            );
            report.unfilled_gaps += 1;
            continue;
        }

        let below: Vec<&Contour> = model.object_contours(id).filter(|c| c.z == za).collect();
        let above: Vec<&Contour> = model.object_contours(id).filter(|c| c.z == zb).collect();

        for (a, b) in pair_by_centroid(&below, &above) {
            match interpolate_contours(&a.points, &b.points, gap - 1) {
                Some(blends) => {
                    for (k, points) in blends.into_iter().enumerate() {
                        added.push(Contour::closed(za + k + 1, points));
                    }
                }
                None => {
                    log::warn!(
                        "object {}: could not interpolate between slices {za} and {zb}",
                        id + 1
                    );
                    report.failed += 1;
                }
            }
        }
    }

    report.added += added.len();
    added
}

/// Greedy one-to-one pairing, closest centroids first.
fn pair_by_centroid<'a>(a: &[&'a Contour], b: &[&'a Contour]) -> Vec<(&'a Contour, &'a Contour)> {
    let centroid = |c: &Contour| polygon_centroid(&c.points).or_else(|| c.points.first().copied());
    let ca: Vec<Option<Point2f>> = a.iter().map(|c| centroid(*c)).collect();
    let cb: Vec<Option<Point2f>> = b.iter().map(|c| centroid(*c)).collect();

    let mut candidates = Vec::new();
    for (i, pa) in ca.iter().enumerate() {
        for (j, pb) in cb.iter().enumerate() {
            if let (Some(pa), Some(pb)) = (pa, pb) {
                candidates.push((pa.distance(*pb), i, j));
            }
        }
    }
    candidates.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut used_a = vec![false; a.len()];
    let mut used_b = vec![false; b.len()];
    let mut pairs = Vec::new();
    for (_, i, j) in candidates {
        if used_a[i] || used_b[j] {
            continue;
        }
        used_a[i] = true;
        used_b[j] = true;
        pairs.push((a[i], b[j]));
    }
    pairs
}
