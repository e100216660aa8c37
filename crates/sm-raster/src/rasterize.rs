use serde::{Deserialize, Serialize};
use sm_core::{Dims, Image, ImageViewMut, Model, ObjectId, Point2f};

/// Inside test used when several polygons on one slice overlap.
///
/// All contours of one object on one slice are filled together with the same
/// rule, so nested contours act as holes under [`FillRule::EvenOdd`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
}

pub fn fill_polygons_u8(
    width: usize,
    height: usize,
    polygons: &[&[Point2f]],
    rule: FillRule,
) -> Image<u8> {
    let mut out = Image::new_fill(width, height, 0u8);
    fill_polygons_into(&mut out.as_view_mut(), polygons, rule);
    out
}

/// Sets every pixel whose center is inside `polygons` to 255; other pixels
/// are left untouched.
pub fn fill_polygons_into(
    dst: &mut ImageViewMut<'_, u8>,
    polygons: &[&[Point2f]],
    rule: FillRule,
) {
    let width = dst.width();
    if width == 0 || dst.height() == 0 {
        return;
    }

    let mut crossings: Vec<(f32, i32)> = Vec::new();
    for y in 0..dst.height() {
        let yc = y as f32;
        crossings.clear();

        for poly in polygons {
            if poly.len() < 3 {
                continue;
            }
            let n = poly.len();
            for i in 0..n {
                let a = poly[i];
                let b = poly[(i + 1) % n];
                if (a.y > yc) == (b.y > yc) {
                    continue;
                }
                let x = a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y);
                let wind = if b.y > a.y { 1 } else { -1 };
                crossings.push((x, wind));
            }
        }

        if crossings.len() < 2 {
            continue;
        }
        crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

        let row = dst.row_mut(y);
        let mut winding = 0i32;
        let mut parity = false;
        for pair in crossings.windows(2) {
            winding += pair[0].1;
            parity = !parity;
            let inside = match rule {
                FillRule::EvenOdd => parity,
                FillRule::NonZero => winding != 0,
            };
            if !inside {
                continue;
            }

            let (start, end) = span(pair[0].0, pair[1].0, width);
            for px in &mut row[start..end] {
                *px = 255;
            }
        }
    }
}

/// Pixel columns whose centers lie in `[xa, xb)`, clipped to `0..width`.
#[inline]
fn span(xa: f32, xb: f32, width: usize) -> (usize, usize) {
    let clip = |v: f32| -> usize {
        if v <= 0.0 {
            0
        } else {
            (v as usize).min(width)
        }
    };
    let start = clip(xa.ceil());
    let end = clip(xb.ceil());
    (start, end.max(start))
}

/// One mask plane per slice of `dims` for a single object.
pub fn rasterize_object(
    model: &Model,
    object: ObjectId,
    dims: Dims,
    rule: FillRule,
) -> Vec<Image<u8>> {
    let mut by_z: Vec<Vec<&[Point2f]>> = vec![Vec::new(); dims.z];
    for c in model.object_contours(object) {
        if let Some(slot) = by_z.get_mut(c.z) {
            slot.push(c.points.as_slice());
        } else {
            log::warn!(
                "object {}: contour on slice {} is outside the stack depth {}",
                object + 1,
                c.z,
                dims.z
            );
        }
    }

    by_z.iter()
        .map(|polys| fill_polygons_u8(dims.x, dims.y, polys, rule))
        .collect()
}
