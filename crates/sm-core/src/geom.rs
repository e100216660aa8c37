use core::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

impl Point2f {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn distance(self, other: Self) -> f32 {
        (other - self).norm()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn norm(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl Add<Vec2f> for Point2f {
    type Output = Point2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        Point2f::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        Vec2f {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Sub<Point2f> for Point2f {
    type Output = Vec2f;

    fn sub(self, rhs: Point2f) -> Self::Output {
        Vec2f {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Axis-aligned bounds of a point set, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min: Point2f,
    pub max: Point2f,
}

impl BBox {
    pub fn of(points: &[Point2f]) -> Option<Self> {
        let first = *points.first()?;
        let mut b = Self {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            min: Point2f::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2f::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// Shoelace area of a closed polygon. Positive when the vertices run
/// clockwise on screen (y pointing down).
pub fn signed_area(points: &[Point2f]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut acc = 0.0f32;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        acc += a.x * b.y - b.x * a.y;
    }
    0.5 * acc
}

/// Area centroid of a closed polygon, falling back to the vertex mean for
/// degenerate (zero-area) input.
pub fn polygon_centroid(points: &[Point2f]) -> Option<Point2f> {
    if points.is_empty() {
        return None;
    }

    let area = signed_area(points);
    if area.abs() < 1e-6 {
        let n = points.len() as f32;
        let sx: f32 = points.iter().map(|p| p.x).sum();
        let sy: f32 = points.iter().map(|p| p.y).sum();
        return Some(Point2f::new(sx / n, sy / n));
    }

    let mut cx = 0.0f32;
    let mut cy = 0.0f32;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let w = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    Some(Point2f::new(cx / (6.0 * area), cy / (6.0 * area)))
}

pub fn arc_length(points: &[Point2f], closed: bool) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }

    let mut len = 0.0f32;
    for w in points.windows(2) {
        len += w[0].distance(w[1]);
    }
    if closed {
        len += points[points.len() - 1].distance(points[0]);
    }
    len
}

#[cfg(test)]
mod tests {
    use super::{BBox, Point2f, arc_length, polygon_centroid, signed_area};

    fn square(x0: f32, y0: f32, side: f32) -> Vec<Point2f> {
        vec![
            Point2f::new(x0, y0),
            Point2f::new(x0 + side, y0),
            Point2f::new(x0 + side, y0 + side),
            Point2f::new(x0, y0 + side),
        ]
    }

    #[test]
    fn point_vec_ops() {
        let p = Point2f::new(2.0, 3.0);
        let q = Point2f::new(5.0, 7.0);

        assert!((p.distance(q) - 5.0).abs() < 1e-6);
        assert_eq!(p.lerp(q, 0.5), Point2f::new(3.5, 5.0));
        assert_eq!((q - p).dot(q - p), 25.0);
    }

    #[test]
    fn square_area_centroid_and_length() {
        let sq = square(1.0, 1.0, 2.0);

        assert!((signed_area(&sq) - 4.0).abs() < 1e-6);
        let rev: Vec<_> = sq.iter().rev().copied().collect();
        assert!((signed_area(&rev) + 4.0).abs() < 1e-6);

        let c = polygon_centroid(&sq).expect("non-empty polygon");
        assert!((c.x - 2.0).abs() < 1e-6 && (c.y - 2.0).abs() < 1e-6);
        assert!((arc_length(&sq, true) - 8.0).abs() < 1e-6);
        assert!((arc_length(&sq, false) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn bounds_of_point_sets() {
        let sq = square(0.0, 0.0, 4.0);

        let a = BBox::of(&sq).expect("non-empty");
        let c = BBox::of(&square(10.0, 10.0, 1.0)).expect("non-empty");
        assert_eq!(a.min, Point2f::new(0.0, 0.0));
        assert_eq!(a.union(c).max, Point2f::new(11.0, 11.0));
        assert!(BBox::of(&[]).is_none());
    }
}
