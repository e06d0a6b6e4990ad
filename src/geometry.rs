//! Planar vector primitives shared by the polygon, Voronoi and triangulation code.

use std::ops::{Add, Mul, Neg, Sub};

/// A point (or free vector) in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    /// Z-component of the 3D cross product of `self` and `other`.
    #[inline]
    pub fn cross(self, other: Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn dot(self, other: Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the direction of `self`. A zero vector stays zero.
    pub fn normalize(self) -> Point2 {
        let l = self.length();
        if l == 0.0 {
            return self;
        }
        Point2::new(self.x / l, self.y / l)
    }

    /// Vector perpendicular to the segment `self -> other`, pointing to its left.
    #[inline]
    pub fn normal_to(self, other: Point2) -> Point2 {
        Point2::new(self.y - other.y, other.x - self.x)
    }

    /// Signed side test of `self` relative to the directed edge `a -> b`.
    ///
    /// Positive when `self` lies to the left (counter-clockwise), negative to the
    /// right and zero when the three points are collinear.
    #[inline]
    pub fn orientation(self, a: Point2, b: Point2) -> f64 {
        (a.x - self.x) * (b.y - self.y) - (b.x - self.x) * (a.y - self.y)
    }

    #[inline]
    pub fn distance_squared(self, other: Point2) -> f64 {
        (self - other).length_squared()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(p: [f64; 2]) -> Self {
        Point2::new(p[0], p[1])
    }
}

impl Add for Point2 {
    type Output = Point2;
    #[inline]
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;
    #[inline]
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;
    #[inline]
    fn mul(self, s: f64) -> Point2 {
        Point2::new(self.x * s, self.y * s)
    }
}

impl Neg for Point2 {
    type Output = Point2;
    #[inline]
    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

/// Orientation of the triangle `(a, b, c)`: twice its signed area, positive when
/// the vertices are counter-clockwise.
#[inline]
pub fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
    (b - a).cross(c - a)
}

/// Circumcenter of the triangle `(a, b, c)`.
///
/// Collinear input yields non-finite coordinates; callers check with
/// [`Point2::is_finite`].
pub fn circumcenter(a: Point2, b: Point2, c: Point2) -> Point2 {
    let d = ((a.x - c.x) * (b.y - c.y) - (b.x - c.x) * (a.y - c.y)) * 2.0;
    let sa = (a.x - c.x) * (a.x + c.x) + (a.y - c.y) * (a.y + c.y);
    let sb = (b.x - c.x) * (b.x + c.x) + (b.y - c.y) * (b.y + c.y);
    let cx = (sa * (b.y - c.y) - sb * (a.y - c.y)) / d;
    let cy = (sb * (a.x - c.x) - sa * (b.x - c.x)) / d;
    Point2::new(cx, cy)
}

/// Half-plane rank used to order directions by angle, starting at the positive x axis.
#[inline]
fn half(v: Point2) -> u8 {
    if v.y > 0.0 || (v.y == 0.0 && v.x > 0.0) { 0 } else { 1 }
}

/// Total counter-clockwise angular order of `a` and `b` around `center`.
pub fn angular_cmp(center: Point2, a: Point2, b: Point2) -> std::cmp::Ordering {
    let da = a - center;
    let db = b - center;
    half(da).cmp(&half(db)).then_with(|| {
        let c = da.cross(db);
        if c > 0.0 {
            std::cmp::Ordering::Less
        } else if c < 0.0 {
            std::cmp::Ordering::Greater
        } else {
            da.length_squared().total_cmp(&db.length_squared())
        }
    })
}
