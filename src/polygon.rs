use crate::geometry::Point2;

/// A convex polygon with counter-clockwise vertices.
///
/// The area is computed once on construction. Vertices must not repeat and must
/// wind in a single rotational direction, otherwise clipping results are wrong.
#[derive(Clone, Debug, Default)]
pub struct ConvexPolygon {
    vertices: Vec<Point2>,
    area: f64,
}

impl ConvexPolygon {
    pub fn new(vertices: Vec<Point2>) -> ConvexPolygon {
        let area = fan_area(&vertices);
        ConvexPolygon { vertices, area }
    }

    /// The polygon with no vertices, as produced by disjoint intersections.
    pub fn empty() -> ConvexPolygon {
        ConvexPolygon::default()
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Unsigned area, zero for fewer than three vertices.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Inclusive point-in-polygon test for a counter-clockwise polygon.
    pub fn contains(&self, p: Point2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        (0..n).all(|i| {
            let a = self.vertices[if i == 0 { n - 1 } else { i - 1 }];
            let b = self.vertices[i];
            p.orientation(a, b) >= 0.0
        })
    }

    /// Sutherland–Hodgman intersection of `self` with `other`.
    ///
    /// Every directed edge of `self` clips the running output, which starts as the
    /// vertices of `other`. Neither input is modified. Disjoint polygons produce an
    /// empty polygon.
    pub fn intersect(&self, other: &ConvexPolygon) -> ConvexPolygon {
        let n = self.vertices.len();
        if n == 0 {
            return ConvexPolygon::empty();
        }
        let mut output = other.vertices.clone();
        let mut input = Vec::with_capacity(output.len() + n);

        for i in 0..n {
            if output.is_empty() {
                break;
            }
            let a = self.vertices[if i == 0 { n - 1 } else { i - 1 }];
            let b = self.vertices[i];

            std::mem::swap(&mut input, &mut output);
            output.clear();

            let m = input.len();
            for j in 0..m {
                let c = input[if j == 0 { m - 1 } else { j - 1 }];
                let d = input[j];
                let c_in = c.orientation(a, b) >= 0.0;
                let d_in = d.orientation(a, b) >= 0.0;

                if c_in {
                    output.push(c);
                    if !d_in {
                        if let Some(x) = line_intersection(a, b, c, d) {
                            output.push(x);
                        }
                    }
                } else if d_in {
                    if let Some(x) = line_intersection(a, b, c, d) {
                        output.push(x);
                    }
                }
            }
        }

        ConvexPolygon::new(output)
    }
}

/// Intersection of the lines through `a -> b` and `c -> d`.
///
/// Solves `a + r·t = c + s·u` with `r = b - a`, `s = d - c`. Returns `None` for
/// parallel lines or a non-finite result; the clipper then emits no point for
/// that crossing.
pub fn line_intersection(a: Point2, b: Point2, c: Point2, d: Point2) -> Option<Point2> {
    let r = b - a;
    let s = d - c;
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let t = (c - a).cross(s) / denom;
    let x = a + r * t;
    x.is_finite().then_some(x)
}

/// Sum of the fan triangles `(v0, v[i-1], v[i])`, each taken unsigned.
fn fan_area(vertices: &[Point2]) -> f64 {
    let Some(&c) = vertices.first() else {
        return 0.0;
    };
    let mut area = 0.0;
    for w in vertices.windows(2) {
        let (a, b) = (w[0], w[1]);
        if a == c {
            continue;
        }
        area += (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)).abs() / 2.0;
    }
    area
}
