use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sm_core::{Contour, Dims, Model};
use sm_raster::{FillRule, Footprint};
use sm_trace::PlaneTrace;

/// How contours on different slices are tied into one object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GroupingPolicy {
    /// Contours traced from the same label value form one object.
    Label,
    /// A contour joins the object of the best-overlapping contour on the
    /// previous slice when the shared area reaches `min_fraction` of the
    /// smaller footprint. Otherwise it starts a new object.
    Overlap { min_fraction: f32 },
    /// Every contour is its own one-slice object.
    PerContour,
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        Self::Overlap { min_fraction: 0.25 }
    }
}

/// Builds one object per group; objects are numbered in order of their
/// first contour (by slice, then by trace order within the slice).
pub fn group_contours(dims: Dims, planes: &[PlaneTrace], policy: GroupingPolicy) -> Model {
    let mut groups: Vec<Vec<Contour>> = Vec::new();

    match policy {
        GroupingPolicy::Label => {
            let mut by_label: HashMap<u16, usize> = HashMap::new();
            for (z, plane) in planes.iter().enumerate() {
                for c in &plane.contours {
                    let g = *by_label.entry(c.label).or_insert_with(|| {
                        groups.push(Vec::new());
                        groups.len() - 1
                    });
                    groups[g].push(Contour::closed(z, c.points.clone()));
                }
            }
        }
        GroupingPolicy::Overlap { min_fraction } => {
            let mut prev: Vec<(Footprint, usize)> = Vec::new();
            for (z, plane) in planes.iter().enumerate() {
                let mut current = Vec::with_capacity(plane.contours.len());
                for c in &plane.contours {
                    let fp = Footprint::of(&[&c.points], FillRule::EvenOdd);
                    let best = prev
                        .iter()
                        .map(|(p, g)| (fp.overlap_fraction(p), overlap_iou(&fp, p), *g))
                        .filter(|(f, _, _)| *f > 0.0 && *f >= min_fraction)
                        .max_by(|a, b| {
                            a.0.total_cmp(&b.0)
                                .then(a.1.total_cmp(&b.1))
                                .then(b.2.cmp(&a.2))
                        });

                    let g = match best {
                        Some((_, _, g)) => g,
                        None => {
                            groups.push(Vec::new());
                            groups.len() - 1
                        }
                    };
                    groups[g].push(Contour::closed(z, c.points.clone()));
                    current.push((fp, g));
                }
                prev = current;
            }
        }
        GroupingPolicy::PerContour => {
            for (z, plane) in planes.iter().enumerate() {
                for c in &plane.contours {
                    groups.push(vec![Contour::closed(z, c.points.clone())]);
                }
            }
        }
    }

    log::debug!(
        "grouped contours into {} object(s) with {policy:?}",
        groups.len()
    );

    let mut model = Model::new(dims);
    for g in groups {
        model.add_object(None, None, g);
    }
    model
}

/// Shared area over combined area; breaks ties between candidates that
/// cover the smaller footprint equally well.
fn overlap_iou(a: &Footprint, b: &Footprint) -> f32 {
    let shared = a.overlap(b);
    let union = a.area() + b.area() - shared;
    if union == 0 {
        0.0
    } else {
        shared as f32 / union as f32
    }
}

#[cfg(test)]
mod tests {
    use sm_core::{Dims, Point2f};
    use sm_trace::{PlaneTrace, TracedContour};

    use super::{GroupingPolicy, group_contours};

    fn rect(label: u16, x0: f32, w: f32) -> TracedContour {
        TracedContour {
            label,
            region: 0,
            area: (w * 4.0) as usize,
            points: vec![
                Point2f::new(x0 - 0.5, -0.5),
                Point2f::new(x0 + w - 0.5, -0.5),
                Point2f::new(x0 + w - 0.5, 3.5),
                Point2f::new(x0 - 0.5, 3.5),
            ],
        }
    }

    fn plane(contours: Vec<TracedContour>) -> PlaneTrace {
        PlaneTrace {
            contours,
            failures: 0,
        }
    }

    #[test]
    fn overlap_follows_shapes_across_relabelled_slices() {
        let planes = vec![
            plane(vec![rect(1, 0.0, 4.0), rect(2, 20.0, 4.0)]),
            plane(vec![rect(5, 21.0, 4.0), rect(6, 1.0, 4.0)]),
            plane(vec![rect(9, 2.0, 4.0)]),
        ];
        let model = group_contours(Dims::new(32, 4, 3), &planes, GroupingPolicy::default());

        assert_eq!(model.num_objects(), 2);
        assert_eq!(model.contour_count(0), 3);
        assert_eq!(model.contour_count(1), 2);
    }

    #[test]
    fn weak_overlap_starts_new_object() {
        let planes = vec![
            plane(vec![rect(1, 0.0, 4.0)]),
            plane(vec![rect(1, 3.0, 4.0)]),
        ];
        let strict = GroupingPolicy::Overlap { min_fraction: 0.5 };

        assert_eq!(group_contours(Dims::new(8, 4, 2), &planes, strict).num_objects(), 2);
        let loose = group_contours(Dims::new(8, 4, 2), &planes, GroupingPolicy::default());
        assert_eq!(loose.num_objects(), 1);
    }

    #[test]
    fn label_and_per_contour_policies() {
        let planes = vec![
            plane(vec![rect(1, 0.0, 4.0), rect(2, 20.0, 4.0)]),
            plane(vec![rect(2, 0.0, 4.0)]),
        ];

        let by_label = group_contours(Dims::new(32, 4, 2), &planes, GroupingPolicy::Label);
        assert_eq!(by_label.num_objects(), 2);
        assert_eq!(by_label.contour_count(1), 2);

        let each = group_contours(Dims::new(32, 4, 2), &planes, GroupingPolicy::PerContour);
        assert_eq!(each.num_objects(), 3);
    }

    fn square(label: u16, x0: f32, y0: f32, side: f32) -> TracedContour {
        TracedContour {
            label,
            region: 0,
            area: (side * side) as usize,
            points: vec![
                Point2f::new(x0 - 0.5, y0 - 0.5),
                Point2f::new(x0 + side - 0.5, y0 - 0.5),
                Point2f::new(x0 + side - 0.5, y0 + side - 0.5),
                Point2f::new(x0 - 0.5, y0 + side - 0.5),
            ],
        }
    }

    #[test]
    fn nested_blob_follows_itself_not_the_enclosing_ring() {
        let ring = square(1, 0.0, 0.0, 10.0);
        let blob = square(2, 4.0, 4.0, 2.0);
        let next = square(7, 4.0, 4.0, 2.0);
        let dims = Dims::new(12, 12, 2);

        let planes = vec![
            plane(vec![blob.clone(), ring.clone()]),
            plane(vec![next.clone()]),
        ];
        let model = group_contours(dims, &planes, GroupingPolicy::default());
        assert_eq!(model.contour_count(0), 2);
        assert_eq!(model.contour_count(1), 1);

        let planes = vec![plane(vec![ring, blob]), plane(vec![next])];
        let model = group_contours(dims, &planes, GroupingPolicy::default());
        assert_eq!(model.contour_count(0), 1);
        assert_eq!(model.contour_count(1), 2);
    }
}
