use sm_core::{Point2f, arc_length, signed_area};

/// Samples used to pick the cyclic alignment between two outlines.
const ALIGN_SAMPLES: usize = 64;

/// Blends two closed outlines into `steps` intermediate outlines at
/// `t = k / (steps + 1)`, `k = 1..=steps`.
///
/// Both outlines are brought to the same orientation, `b` is restarted at the
/// arc position that best matches `a`'s start, and then both are sampled at
/// the union of their normalized vertex arc positions so every input corner
/// survives. Returns `None` when either outline has fewer than three points
/// or no length.
pub fn interpolate_contours(
    a: &[Point2f],
    b: &[Point2f],
    steps: usize,
) -> Option<Vec<Vec<Point2f>>> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }
    if arc_length(a, true) <= f32::EPSILON || arc_length(b, true) <= f32::EPSILON {
        return None;
    }

    let b_oriented: Vec<Point2f> = if (signed_area(a) >= 0.0) == (signed_area(b) >= 0.0) {
        b.to_vec()
    } else {
        b.iter().rev().copied().collect()
    };

    let pa = arc_params(a);
    let pb = arc_params(&b_oriented);

    let shift = best_shift(a, &pa, &b_oriented, &pb);
    let b_aligned = restart_at(&b_oriented, &pb, shift as f32 / ALIGN_SAMPLES as f32);
    let pb = arc_params(&b_aligned);

    let mut ts: Vec<f32> = pa.iter().chain(pb.iter()).copied().collect();
    ts.sort_by(f32::total_cmp);
    ts.dedup_by(|x, y| (*x - *y).abs() < 1e-5);

    let sa: Vec<Point2f> = ts.iter().map(|&t| point_at(a, &pa, t)).collect();
    let sb: Vec<Point2f> = ts.iter().map(|&t| point_at(&b_aligned, &pb, t)).collect();

    let out = (1..=steps)
        .map(|k| {
            let t = k as f32 / (steps + 1) as f32;
            sa.iter().zip(&sb).map(|(p, q)| p.lerp(*q, t)).collect()
        })
        .collect();
    Some(out)
}

/// Normalized arc position of every vertex, starting at 0.
fn arc_params(points: &[Point2f]) -> Vec<f32> {
    let total = arc_length(points, true);
    let mut params = Vec::with_capacity(points.len());
    let mut acc = 0.0f32;
    params.push(0.0);
    for w in points.windows(2) {
        acc += w[0].distance(w[1]);
        params.push(acc / total);
    }
    params
}

/// Point at normalized arc position `t` in `[0, 1)`.
fn point_at(points: &[Point2f], params: &[f32], t: f32) -> Point2f {
    let n = points.len();
    let t = t.rem_euclid(1.0);
    let i = match params.binary_search_by(|p| p.total_cmp(&t)) {
        Ok(i) => return points[i],
        Err(i) => i - 1,
    };

    let t0 = params[i];
    let t1 = if i + 1 < n { params[i + 1] } else { 1.0 };
    let span = t1 - t0;
    if span <= 0.0 {
        return points[i];
    }
    points[i].lerp(points[(i + 1) % n], (t - t0) / span)
}

/// Same ring, starting at arc position `t`.
fn restart_at(points: &[Point2f], params: &[f32], t: f32) -> Vec<Point2f> {
    let mut out = vec![point_at(points, params, t)];
    let after = params.iter().position(|&p| p > t + 1e-6).unwrap_or(points.len());
    out.extend_from_slice(&points[after..]);
    for (p, &pt) in points[..after].iter().zip(params) {
        if (pt - t).abs() > 1e-6 {
            out.push(*p);
        }
    }
    out
}

fn best_shift(a: &[Point2f], pa: &[f32], b: &[Point2f], pb: &[f32]) -> usize {
    let n = ALIGN_SAMPLES;
    let sa: Vec<Point2f> = (0..n).map(|i| point_at(a, pa, i as f32 / n as f32)).collect();
    let sb: Vec<Point2f> = (0..n).map(|i| point_at(b, pb, i as f32 / n as f32)).collect();

    let mut best = (0, f32::INFINITY);
    for s in 0..n {
        let cost: f32 = (0..n)
            .map(|i| {
                let d = sb[(i + s) % n] - sa[i];
                d.dot(d)
            })
            .sum();
        if cost < best.1 {
            best = (s, cost);
        }
    }
    best.0
}
