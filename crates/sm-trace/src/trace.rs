use core::fmt;

use sm_core::{ImageView, Point2f};

use crate::Connectivity;

/// Walking directions along pixel edges, clockwise on screen.
const STEP: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const EAST: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceError {
    /// Seed pixel is unset or has a set pixel directly above it.
    BadSeed,
    /// Walk did not return to the seed within the step budget.
    Unclosed,
    /// Fewer than three corners were produced.
    Degenerate,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSeed => write!(f, "seed pixel is not on the outer boundary"),
            Self::Unclosed => write!(f, "boundary walk did not close"),
            Self::Degenerate => write!(f, "boundary has fewer than three corners"),
        }
    }
}

impl std::error::Error for TraceError {}

/// Traces the outer boundary of the set pixels connected to `seed`.
///
/// The walk follows pixel edges with the region on its right, starting at
/// the top-left corner of `seed`, which must be the region's first pixel in
/// raster order. Only corners are emitted, in local pixel-center coordinates
/// (`x - 0.5`, `y - 0.5` for corner `(x, y)`), so the polygon runs clockwise
/// on screen. Diagonal pinches are passed through under
/// [`Connectivity::C8`] and cut under [`Connectivity::C4`].
pub fn trace_outer_boundary(
    mask: &ImageView<'_, u8>,
    seed: (usize, usize),
    connectivity: Connectivity,
) -> Result<Vec<Point2f>, TraceError> {
    let inside = |x: isize, y: isize| -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        mask.get(x as usize, y as usize).is_some_and(|&v| v != 0)
    };

    let (sx, sy) = (seed.0 as isize, seed.1 as isize);
    if !inside(sx, sy) || inside(sx, sy - 1) {
        return Err(TraceError::BadSeed);
    }

    let start = (sx, sy);
    let mut v = start;
    let mut dir = EAST;
    let mut corners = vec![corner_point(v)];

    let max_steps = 4 * mask.width() * mask.height() + 4;
    for _ in 0..max_steps {
        v = (v.0 + STEP[dir].0, v.1 + STEP[dir].1);

        let (l, r) = ahead(v, dir);
        let left_in = inside(l.0, l.1);
        let right_in = inside(r.0, r.1);

        let next = match (left_in, right_in) {
            (true, true) => turn_left(dir),
            (false, true) => dir,
            (false, false) => turn_right(dir),
            (true, false) => match connectivity {
                Connectivity::C8 => turn_left(dir),
                Connectivity::C4 => turn_right(dir),
            },
        };

        if v == start && next == EAST {
            return if corners.len() < 3 {
                Err(TraceError::Degenerate)
            } else {
                Ok(corners)
            };
        }

        if next != dir {
            corners.push(corner_point(v));
        }
        dir = next;
    }

    Err(TraceError::Unclosed)
}

/// The two pixels in front of corner `v` when moving along `dir`, as
/// `(ahead_left, ahead_right)`.
#[inline]
fn ahead(v: (isize, isize), dir: usize) -> ((isize, isize), (isize, isize)) {
    let (x, y) = v;
    let nw = (x - 1, y - 1);
    let ne = (x, y - 1);
    let sw = (x - 1, y);
    let se = (x, y);
    match dir {
        0 => (ne, se),
        1 => (se, sw),
        2 => (sw, nw),
        _ => (nw, ne),
    }
}

#[inline]
fn turn_left(dir: usize) -> usize {
    (dir + 3) & 3
}

#[inline]
fn turn_right(dir: usize) -> usize {
    (dir + 1) & 3
}

#[inline]
fn corner_point(v: (isize, isize)) -> Point2f {
    Point2f::new(v.0 as f32 - 0.5, v.1 as f32 - 0.5)
}

#[cfg(test)]
mod tests {
    use sm_core::{Image, Point2f, signed_area};

    use super::{TraceError, trace_outer_boundary};
    use crate::Connectivity;

    #[test]
    fn single_pixel_traces_unit_square() {
        let mut img = Image::new_fill(3, 3, 0u8);
        *img.as_view_mut().get_mut(1, 1).expect("in bounds") = 255;

        let poly = trace_outer_boundary(&img.as_view(), (1, 1), Connectivity::C8).expect("traced");
        assert_eq!(
            poly,
            vec![
                Point2f::new(0.5, 0.5),
                Point2f::new(1.5, 0.5),
                Point2f::new(1.5, 1.5),
                Point2f::new(0.5, 1.5),
            ]
        );
        assert!((signed_area(&poly) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn l_shape_has_six_corners_and_exact_area() {
        #[rustfmt::skip]
        let data = vec![
            255u8, 0,
            255, 0,
            255, 255,
        ];
        let img = Image::from_vec(2, 3, data).expect("valid image");

        let poly = trace_outer_boundary(&img.as_view(), (0, 0), Connectivity::C4).expect("traced");
        assert_eq!(poly.len(), 6);
        assert!((signed_area(&poly) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn diagonal_pinch_depends_on_connectivity() {
        #[rustfmt::skip]
        let data = vec![
            255u8, 0,
            0, 255,
        ];
        let img = Image::from_vec(2, 2, data).expect("valid image");

        let c8 = trace_outer_boundary(&img.as_view(), (0, 0), Connectivity::C8).expect("traced");
        assert!((signed_area(&c8) - 2.0).abs() < 1e-6);

        let c4 = trace_outer_boundary(&img.as_view(), (0, 0), Connectivity::C4).expect("traced");
        assert!((signed_area(&c4) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn region_touching_border_closes() {
        let img = Image::new_fill(4, 3, 255u8);
        let poly = trace_outer_boundary(&img.as_view(), (0, 0), Connectivity::C8).expect("traced");

        assert_eq!(poly.len(), 4);
        assert_eq!(poly[0], Point2f::new(-0.5, -0.5));
        assert_eq!(poly[2], Point2f::new(3.5, 2.5));
    }

    #[test]
    fn seed_must_be_on_top_boundary() {
        let img = Image::new_fill(2, 2, 255u8);
        assert_eq!(
            trace_outer_boundary(&img.as_view(), (0, 1), Connectivity::C8),
            Err(TraceError::BadSeed)
        );
        let empty = Image::new_fill(2, 2, 0u8);
        assert_eq!(
            trace_outer_boundary(&empty.as_view(), (0, 0), Connectivity::C8),
            Err(TraceError::BadSeed)
        );
    }
}
