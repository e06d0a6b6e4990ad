//! Incremental Delaunay triangulation over an index arena.
//!
//! The triangulation keeps its enclosing super triangle, so every sample has a
//! closed fan of incident triangles and therefore a bounded Voronoi cell.
//! Triangles touching a super vertex are not part of the sample triangulation;
//! [`Triangulation::locate`] treats them as outside the hull.
//!
//! Besides construction it exposes the read-only cavity queries used by the
//! interpolators: [`Triangulation::locate`], [`Triangulation::circumcircle_triangles`],
//! [`Triangulation::edge_set`] and [`Triangulation::create_triangles`].

pub mod hilbert;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bounds::BoundingBox;
use crate::config::{InvalidVertexPolicy, TriangulationConfig};
use crate::error::DtfeError;
use crate::geometry::{Point2, circumcenter, orient2d};

/// Number of super-triangle vertices at the start of the vertex arena.
pub const SUPER_VERTEX_COUNT: usize = 3;

const NO_HINT: usize = usize::MAX;

/// Handle of a vertex in the triangulation arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

/// Handle of a triangle slot in the triangulation arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(pub usize);

/// A weighted sample and the triangles incident to it.
#[derive(Clone, Debug)]
pub struct Vertex {
    position: Point2,
    weight: f64,
    triangles: Vec<TriangleId>,
}

impl Vertex {
    pub fn new(position: Point2, weight: f64) -> Self {
        Self { position, weight, triangles: Vec::new() }
    }

    pub fn position(&self) -> Point2 {
        self.position
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn incident_triangles(&self) -> &[TriangleId] {
        &self.triangles
    }

    /// False for samples dropped during construction.
    pub fn is_inserted(&self) -> bool {
        !self.triangles.is_empty()
    }
}

/// Per-edge unit normals and projected extents of a triangle.
///
/// `normals[i]` is perpendicular to the edge opposite vertex `i`, and
/// `extents[i]` is the projection of the triangle onto it measured from vertex `i`.
#[derive(Clone, Copy, Debug)]
pub struct EdgeFrame {
    pub normals: [Point2; 3],
    pub extents: [f64; 3],
}

impl EdgeFrame {
    fn new(p: [Point2; 3]) -> Self {
        let normals = [
            p[1].normal_to(p[2]).normalize(),
            p[2].normal_to(p[0]).normalize(),
            p[0].normal_to(p[1]).normalize(),
        ];
        let extents = [
            normals[0].dot(p[1] - p[0]),
            normals[1].dot(p[2] - p[1]),
            normals[2].dot(p[0] - p[2]),
        ];
        Self { normals, extents }
    }

    /// Linear weight of each corner at `q`. The weights sum to one.
    pub fn weights(&self, corners: [Point2; 3], q: Point2) -> [f64; 3] {
        let mut w = [0.0; 3];
        for i in 0..3 {
            w[i] = 1.0 - self.normals[i].dot(q - corners[i]) / self.extents[i];
        }
        w
    }
}

/// A counter-clockwise triangle with its cached circumcircle.
#[derive(Clone, Debug)]
pub struct Triangle {
    vertices: [VertexId; 3],
    circumcenter: Point2,
    radius_squared: f64,
    area: f64,
    frame: EdgeFrame,
}

impl Triangle {
    /// Builds the triangle, swapping `b` and `c` if needed to wind counter-clockwise.
    pub fn new(ids: [VertexId; 3], points: [Point2; 3]) -> Self {
        let (ids, points) = if orient2d(points[0], points[1], points[2]) < 0.0 {
            ([ids[0], ids[2], ids[1]], [points[0], points[2], points[1]])
        } else {
            (ids, points)
        };
        let cc = circumcenter(points[0], points[1], points[2]);
        Self {
            vertices: ids,
            circumcenter: cc,
            radius_squared: cc.distance_squared(points[0]),
            area: 0.5 * orient2d(points[0], points[1], points[2]),
            frame: EdgeFrame::new(points),
        }
    }

    pub fn vertices(&self) -> [VertexId; 3] {
        self.vertices
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }

    pub fn circumcenter(&self) -> Point2 {
        self.circumcenter
    }

    /// Inclusive circumcircle test.
    pub fn in_circumcircle(&self, p: Point2) -> bool {
        p.distance_squared(self.circumcenter) <= self.radius_squared
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn frame(&self) -> &EdgeFrame {
        &self.frame
    }

    /// Directed counter-clockwise edges `ab`, `bc`, `ca`.
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.vertices;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    /// The two corners other than `v`, in counter-clockwise order.
    pub fn opposite_corners(&self, v: VertexId) -> Option<[VertexId; 2]> {
        let i = self.vertices.iter().position(|&x| x == v)?;
        Some([self.vertices[(i + 1) % 3], self.vertices[(i + 2) % 3]])
    }
}

/// A directed edge between two vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub a: VertexId,
    pub b: VertexId,
}

impl Edge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self { a, b }
    }

    /// Direction-independent key.
    pub fn key(&self) -> (VertexId, VertexId) {
        if self.a < self.b { (self.a, self.b) } else { (self.b, self.a) }
    }
}

/// A transient triangle fanning a point that is not in the arena to an edge.
#[derive(Clone, Copy, Debug)]
pub struct TempTriangle {
    pub a: VertexId,
    pub b: VertexId,
    pub circumcenter: Point2,
}

/// Delaunay triangulation of weighted samples.
///
/// Vertex ids `0..SUPER_VERTEX_COUNT` are the super triangle; sample `i` has id
/// `SUPER_VERTEX_COUNT + i`.
#[derive(Debug)]
pub struct Triangulation {
    vertices: Vec<Vertex>,
    triangles: Vec<Option<Triangle>>,
    free: Vec<usize>,
    live: usize,
    // Start of the next locate walk. Atomic so that `&self` queries stay `Sync`.
    last_located: AtomicUsize,
}

impl Triangulation {
    /// Triangulates `points`. `weights`, if given, must match `points` in length;
    /// otherwise every sample has unit weight.
    pub fn new(points: &[Point2], weights: Option<&[f64]>, config: TriangulationConfig) -> Result<Self, DtfeError> {
        if let Some(w) = weights {
            if w.len() != points.len() {
                return Err(DtfeError::LengthMismatch { points: points.len(), weights: w.len() });
            }
        }

        let finite: Vec<Point2> = points.iter().copied().filter(|p| p.is_finite()).collect();
        let bounds = BoundingBox::from_points(&finite)
            .unwrap_or_else(|| BoundingBox::new([0.0, 0.0], [0.0, 0.0]));
        let mut tri = Self::with_super_triangle(&bounds, config.super_triangle_scale);

        tri.vertices.extend(points.iter().enumerate().map(|(i, &p)| {
            Vertex::new(p, weights.map_or(1.0, |w| w[i]))
        }));

        tracing::debug!(samples = points.len(), "linearizing samples along hilbert curve");
        let order = hilbert::hilbert_sorted(points, &bounds, config.hilbert_order);

        for i in order {
            let id = VertexId(SUPER_VERTEX_COUNT + i);
            if let Err(e) = tri.insert_vertex(id) {
                match config.invalid_vertex_policy {
                    InvalidVertexPolicy::Reject => return Err(e),
                    InvalidVertexPolicy::Drop => {
                        tracing::debug!(error = %e, "dropping sample");
                    }
                }
            }
        }

        tracing::debug!(triangles = tri.live, "triangulation complete");
        Ok(tri)
    }

    fn with_super_triangle(bounds: &BoundingBox, scale: f64) -> Self {
        let extent = bounds.width().max(bounds.height());
        let extent = if extent > 0.0 { extent } else { 1.0 };
        let radius = scale.max(2.0) * extent;
        let c = bounds.center();

        let mut tri = Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            free: Vec::new(),
            live: 0,
            last_located: AtomicUsize::new(NO_HINT),
        };

        // equilateral, counter-clockwise from the top
        for k in 0..SUPER_VERTEX_COUNT {
            let angle = std::f64::consts::FRAC_PI_2 + k as f64 * 2.0 * std::f64::consts::FRAC_PI_3;
            let p = Point2::new(c.x + radius * angle.cos(), c.y + radius * angle.sin());
            tri.vertices.push(Vertex::new(p, 0.0));
        }
        tri.add_triangle([VertexId(0), VertexId(1), VertexId(2)]);
        tri
    }

    /// Adds a sample after construction.
    ///
    /// On failure the sample is removed again and the triangulation is unchanged.
    pub fn insert(&mut self, point: Point2, weight: f64) -> Result<VertexId, DtfeError> {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex::new(point, weight));
        if let Err(e) = self.insert_vertex(id) {
            self.vertices.pop();
            return Err(e);
        }
        Ok(id)
    }

    /// Bowyer–Watson insertion of an arena vertex that has no triangles yet.
    fn insert_vertex(&mut self, id: VertexId) -> Result<(), DtfeError> {
        let p = self.position(id);
        // every orientation test is false for NaN, so the walk would accept any triangle
        if !p.is_finite() {
            return Err(DtfeError::NonFiniteSample { id });
        }
        let start = self.walk(p)?.ok_or(DtfeError::OutsideTriangulation { id })?;

        if self.triangle_ref(start).vertices.iter().any(|&v| self.position(v) == p) {
            return Err(DtfeError::DuplicateVertex { id });
        }

        let cavity = self.circumcircle_triangles_from(p, start);
        let edges = self.edge_set(&cavity);

        // the cavity must be star-shaped from p, otherwise the fan would fold over
        if edges.iter().any(|e| orient2d(self.position(e.a), self.position(e.b), p) <= 0.0) {
            return Err(DtfeError::DegenerateInsertion { id });
        }

        for t in cavity {
            self.remove_triangle(t);
        }
        let mut first = None;
        for e in edges {
            let t = self.add_triangle([e.a, e.b, id]);
            first.get_or_insert(t);
        }
        if let Some(t) = first {
            self.last_located.store(t.0, Ordering::Relaxed);
        }
        Ok(())
    }

    fn add_triangle(&mut self, ids: [VertexId; 3]) -> TriangleId {
        let points = ids.map(|v| self.position(v));
        let t = Triangle::new(ids, points);
        let slot = match self.free.pop() {
            Some(slot) => {
                self.triangles[slot] = Some(t);
                slot
            }
            None => {
                self.triangles.push(Some(t));
                self.triangles.len() - 1
            }
        };
        let tid = TriangleId(slot);
        for v in ids {
            self.vertices[v.0].triangles.push(tid);
        }
        self.live += 1;
        tid
    }

    fn remove_triangle(&mut self, tid: TriangleId) {
        let Some(t) = self.triangles.get_mut(tid.0).and_then(Option::take) else {
            return;
        };
        for v in t.vertices {
            let list = &mut self.vertices[v.0].triangles;
            if let Some(pos) = list.iter().position(|&x| x == tid) {
                list.swap_remove(pos);
            }
        }
        self.free.push(tid.0);
        self.live -= 1;
    }

    // --- Accessors ---

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    pub fn position(&self, id: VertexId) -> Point2 {
        self.vertices[id.0].position
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn sample_count(&self) -> usize {
        self.vertices.len() - SUPER_VERTEX_COUNT
    }

    /// Arena id of the `i`-th sample.
    pub fn sample_id(i: usize) -> VertexId {
        VertexId(SUPER_VERTEX_COUNT + i)
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (SUPER_VERTEX_COUNT..self.vertices.len()).map(VertexId)
    }

    pub fn is_super_vertex(&self, id: VertexId) -> bool {
        id.0 < SUPER_VERTEX_COUNT
    }

    pub fn touches_super(&self, t: &Triangle) -> bool {
        t.vertices.iter().any(|&v| self.is_super_vertex(v))
    }

    pub fn triangle(&self, id: TriangleId) -> Option<&Triangle> {
        self.triangles.get(id.0).and_then(Option::as_ref)
    }

    // Only for ids taken from the live structure.
    fn triangle_ref(&self, id: TriangleId) -> &Triangle {
        match self.triangles[id.0].as_ref() {
            Some(t) => t,
            None => unreachable!("dangling triangle id {id:?}"),
        }
    }

    /// Number of live triangles, including those touching the super triangle.
    pub fn triangle_count(&self) -> usize {
        self.live
    }

    /// All live triangles, including those touching the super triangle.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().map(|t| (TriangleId(i), t)))
    }

    /// Triangles whose corners are all samples.
    pub fn sample_triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles().filter(|(_, t)| !self.touches_super(t))
    }

    pub fn incident_triangles(&self, id: VertexId) -> &[TriangleId] {
        &self.vertices[id.0].triangles
    }

    /// Vertices sharing an edge with `id`, in ascending id order.
    pub fn neighbor_vertices(&self, id: VertexId) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = self
            .incident_triangles(id)
            .iter()
            .flat_map(|&t| self.triangle_ref(t).vertices)
            .filter(|&v| v != id)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// The triangle other than `t` that shares the edge `(u, v)`.
    fn opposite(&self, t: TriangleId, u: VertexId, v: VertexId) -> Option<TriangleId> {
        self.vertices[u.0]
            .triangles
            .iter()
            .copied()
            .find(|&other| other != t && self.triangle_ref(other).contains_vertex(v))
    }

    // --- Cavity queries ---

    /// Visibility walk to the triangle enclosing `p`, including super triangles.
    ///
    /// `Ok(None)` when `p` lies outside the super triangle.
    fn walk(&self, p: Point2) -> Result<Option<TriangleId>, DtfeError> {
        let hint = self.last_located.load(Ordering::Relaxed);
        let start = match self.triangles.get(hint) {
            Some(Some(_)) => Some(TriangleId(hint)),
            _ => self.triangles().next().map(|(id, _)| id),
        };
        let Some(mut current) = start else {
            return Ok(None);
        };

        let max_steps = self.live + 1;
        for _ in 0..max_steps {
            let [a, b, c] = self.triangle_ref(current).vertices;
            let (pa, pb, pc) = (self.position(a), self.position(b), self.position(c));

            let exit = if orient2d(pb, pc, p) < 0.0 {
                Some((b, c))
            } else if orient2d(pc, pa, p) < 0.0 {
                Some((c, a))
            } else if orient2d(pa, pb, p) < 0.0 {
                Some((a, b))
            } else {
                None
            };

            match exit {
                None => {
                    self.last_located.store(current.0, Ordering::Relaxed);
                    return Ok(Some(current));
                }
                Some((u, v)) => match self.opposite(current, u, v) {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
            }
        }
        Err(DtfeError::WalkCycle { steps: max_steps })
    }

    /// Sample triangle enclosing `p`, or `None` when `p` is outside the hull of
    /// the samples.
    pub fn locate(&self, p: Point2) -> Result<Option<TriangleId>, DtfeError> {
        Ok(self.walk(p)?.filter(|&t| !self.touches_super(self.triangle_ref(t))))
    }

    /// Triangles whose circumcircle contains `p`: the cavity that inserting `p`
    /// would destroy. Empty when `p` is outside the super triangle.
    pub fn circumcircle_triangles(&self, p: Point2) -> Result<Vec<TriangleId>, DtfeError> {
        Ok(match self.walk(p)? {
            Some(start) => self.circumcircle_triangles_from(p, start),
            None => Vec::new(),
        })
    }

    fn circumcircle_triangles_from(&self, p: Point2, start: TriangleId) -> Vec<TriangleId> {
        let mut cavity = vec![start];
        let mut checked: HashSet<TriangleId> = HashSet::from([start]);
        let mut stack = vec![start];

        while let Some(t) = stack.pop() {
            for e in self.triangle_ref(t).edges() {
                let Some(n) = self.opposite(t, e.a, e.b) else {
                    continue;
                };
                if checked.insert(n) && self.triangle_ref(n).in_circumcircle(p) {
                    cavity.push(n);
                    stack.push(n);
                }
            }
        }
        cavity
    }

    /// Edges that belong to exactly one of `tris`, keeping their direction.
    ///
    /// For a cavity of counter-clockwise triangles this is its boundary, wound
    /// counter-clockwise.
    pub fn edge_set(&self, tris: &[TriangleId]) -> Vec<Edge> {
        let mut counts: HashMap<(VertexId, VertexId), usize> = HashMap::new();
        let edges: Vec<Edge> = tris
            .iter()
            .filter_map(|&t| self.triangle(t))
            .flat_map(|t| t.edges())
            .collect();
        for e in &edges {
            *counts.entry(e.key()).or_insert(0) += 1;
        }
        edges.into_iter().filter(|e| counts[&e.key()] == 1).collect()
    }

    /// Fans `p` to every edge without touching the triangulation.
    pub fn create_triangles(&self, edges: &[Edge], p: Point2) -> Vec<TempTriangle> {
        edges
            .iter()
            .map(|e| TempTriangle {
                a: e.a,
                b: e.b,
                circumcenter: circumcenter(self.position(e.a), self.position(e.b), p),
            })
            .collect()
    }

    /// Closest sample to `p` among the vertices of its cavity, or `None` outside the hull.
    pub fn nearest_vertex(&self, p: Point2) -> Result<Option<VertexId>, DtfeError> {
        if self.locate(p)?.is_none() {
            return Ok(None);
        }
        let cavity = self.circumcircle_triangles(p)?;
        Ok(cavity
            .iter()
            .flat_map(|&t| self.triangle_ref(t).vertices)
            .filter(|&v| !self.is_super_vertex(v))
            .min_by(|&a, &b| {
                p.distance_squared(self.position(a))
                    .total_cmp(&p.distance_squared(self.position(b)))
            }))
    }
}
