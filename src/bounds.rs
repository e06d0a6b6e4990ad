use crate::geometry::Point2;

/// Axis-aligned bounding box of a planar sample set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut b = BoundingBox::new([first.x, first.y], [first.x, first.y]);
        for p in &points[1..] {
            b.min[0] = b.min[0].min(p.x);
            b.min[1] = b.min[1].min(p.y);
            b.max[0] = b.max[0].max(p.x);
            b.max[1] = b.max[1].max(p.y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
        )
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        )
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min[0] && p.x <= self.max[0] && p.y >= self.min[1] && p.y <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = [Point2::new(1.0, 5.0), Point2::new(-2.0, 3.0), Point2::new(4.0, -1.0)];
        let b = BoundingBox::from_points(&pts).unwrap();
        assert_eq!(b.min, [-2.0, -1.0]);
        assert_eq!(b.max, [4.0, 5.0]);
        assert_eq!(b.width(), 6.0);
        assert_eq!(b.center(), Point2::new(1.0, 2.0));
        assert!(b.contains(Point2::new(4.0, 5.0)));
        assert!(!b.contains(Point2::new(4.1, 5.0)));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new([0.0, 0.0], [2.0, 1.0]);
        let b = BoundingBox::new([-1.0, 0.5], [1.0, 3.0]);
        assert_eq!(a.union(&b), BoundingBox::new([-1.0, 0.0], [2.0, 3.0]));
    }
}
