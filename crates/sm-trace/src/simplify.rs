use sm_core::Point2f;

/// Ramer-Douglas-Peucker point shaving for a closed polygon.
///
/// Points closer than `tolerance` to the simplified outline are dropped.
/// A tolerance `<= 0` disables shaving, and at least three points are kept.
pub fn shave_closed(points: &[Point2f], tolerance: f32) -> Vec<Point2f> {
    if tolerance <= 0.0 || points.len() <= 3 {
        return points.to_vec();
    }

    // Split the ring at the vertex farthest from the first one.
    let first = points[0];
    let (far, _) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, first.distance(*p)))
        .fold((0, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });
    if far == 0 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[far] = true;

    let mut ring: Vec<Point2f> = points[far..].to_vec();
    ring.push(first);

    rdp_mark(points, 0, far, tolerance, &mut keep);
    let mut tail_keep = vec![false; ring.len()];
    rdp_mark(&ring, 0, ring.len() - 1, tolerance, &mut tail_keep);
    for (i, &k) in tail_keep.iter().enumerate().take(ring.len() - 1) {
        if k {
            keep[far + i] = true;
        }
    }

    let out: Vec<Point2f> = points
        .iter()
        .zip(&keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect();

    if out.len() < 3 {
        return points.to_vec();
    }
    out
}

fn rdp_mark(points: &[Point2f], lo: usize, hi: usize, tolerance: f32, keep: &mut [bool]) {
    if hi <= lo + 1 {
        return;
    }

    let mut stack = vec![(lo, hi)];
    while let Some((a, b)) = stack.pop() {
        if b <= a + 1 {
            continue;
        }

        let mut best = a;
        let mut best_d = 0.0f32;
        for i in (a + 1)..b {
            let d = segment_distance(points[i], points[a], points[b]);
            if d > best_d {
                best_d = d;
                best = i;
            }
        }

        if best_d > tolerance {
            keep[best] = true;
            stack.push((a, best));
            stack.push((best, b));
        }
    }
}

fn segment_distance(p: Point2f, a: Point2f, b: Point2f) -> f32 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use sm_core::Point2f;

    use super::shave_closed;

    #[test]
    fn collinear_points_are_shaved() {
        let pts = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(2.0, 0.0),
            Point2f::new(2.0, 1.0),
            Point2f::new(2.0, 2.0),
            Point2f::new(1.0, 2.0),
            Point2f::new(0.0, 2.0),
            Point2f::new(0.0, 1.0),
        ];

        let out = shave_closed(&pts, 0.1);
        assert_eq!(
            out,
            vec![
                Point2f::new(0.0, 0.0),
                Point2f::new(2.0, 0.0),
                Point2f::new(2.0, 2.0),
                Point2f::new(0.0, 2.0),
            ]
        );
    }

    #[test]
    fn zero_tolerance_and_small_rings_pass_through() {
        let tri = vec![
            Point2f::new(0.0, 0.0),
            Point2f::new(1.0, 0.0),
            Point2f::new(0.0, 1.0),
        ];
        assert_eq!(shave_closed(&tri, 5.0), tri);

        let staircase: Vec<Point2f> = (0..8)
            .map(|i| Point2f::new((i / 2) as f32, ((i + 1) / 2) as f32))
            .collect();
        assert_eq!(shave_closed(&staircase, 0.0), staircase);
    }

    #[test]
    fn shaving_keeps_at_least_a_triangle() {
        let pts: Vec<Point2f> = (0..12)
            .map(|i| {
                let t = i as f32 / 12.0 * std::f32::consts::TAU;
                Point2f::new(t.cos(), t.sin())
            })
            .collect();
        let out = shave_closed(&pts, 10.0);
        assert!(out.len() >= 3);
    }
}
