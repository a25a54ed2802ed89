use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Device-space point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 2D cross product (z component of the 3D one).
    #[must_use]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

/// Interior intersection of segments `a0 -> a1` and `b0 -> b1`.
///
/// Both segment parameters must lie strictly inside `(0, 1)`. Parallel,
/// collinear and degenerate segments report no crossing.
#[must_use]
pub fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denominator = r.cross(s);
    if denominator.abs() <= f64::EPSILON {
        return None;
    }
    let offset = b0 - a0;
    let t = offset.cross(s) / denominator;
    let u = offset.cross(r) / denominator;
    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Some(a0 + r * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, segment_intersection};

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        )
        .expect("crossing");
        assert!((hit.x - 5.0).abs() <= 1e-12);
        assert!((hit.y - 5.0).abs() <= 1e-12);
    }

    #[test]
    fn parallel_and_touching_segments_do_not_cross() {
        let parallel = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
        );
        assert!(parallel.is_none());

        let touching_at_endpoint = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
        );
        assert!(touching_at_endpoint.is_none());
    }
}
