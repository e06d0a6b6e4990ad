use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::DtfeError;
use crate::geometry::{Point2, angular_cmp};
use crate::polygon::ConvexPolygon;
use crate::triangulation::{Triangulation, VertexId};

/// One triangle of the fan around a Voronoi center: the two corners other
/// than the center and the triangle's circumcenter.
#[derive(Clone, Copy, Debug)]
pub struct FanTriangle {
    pub corners: [VertexId; 2],
    pub circumcenter: Point2,
}

impl FanTriangle {
    pub fn spans(&self, a: VertexId, b: VertexId) -> bool {
        self.corners.contains(&a) && self.corners.contains(&b)
    }
}

/// A Voronoi cell: a convex boundary plus the neighbor that owns each boundary vertex.
///
/// Vertex `i` of the polygon is the circumcenter of the fan triangle spanning
/// `neighbors[i - 1]` and `neighbors[i]` (indices wrap).
#[derive(Clone, Debug, Default)]
pub struct Voronoi {
    polygon: ConvexPolygon,
    neighbors: Vec<VertexId>,
}

impl Voronoi {
    /// Builds the cell of `center` from its neighbors and the fan of triangles around it.
    pub fn create<F>(center: Point2, mut neighbors: Vec<VertexId>, fan: &[FanTriangle], position: F) -> Result<Voronoi, DtfeError>
    where
        F: Fn(VertexId) -> Point2,
    {
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors.sort_by(|&a, &b| angular_cmp(center, position(a), position(b)));

        let n = neighbors.len();
        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            let a = neighbors[if i == 0 { n - 1 } else { i - 1 }];
            let b = neighbors[i];
            match fan.iter().find(|t| t.spans(a, b)) {
                Some(t) => vertices.push(t.circumcenter),
                None => {
                    tracing::warn!(?a, ?b, "no fan triangle spans consecutive neighbors");
                    return Err(DtfeError::AdjacencyInconsistent { a, b });
                }
            }
        }

        Ok(Voronoi {
            polygon: ConvexPolygon::new(vertices),
            neighbors,
        })
    }

    /// The cell of an inserted vertex, from its incident triangles.
    pub fn from_vertex(triangulation: &Triangulation, id: VertexId) -> Result<Voronoi, DtfeError> {
        let fan: Vec<FanTriangle> = triangulation
            .incident_triangles(id)
            .iter()
            .filter_map(|&t| triangulation.triangle(t))
            .filter_map(|t| {
                t.opposite_corners(id).map(|corners| FanTriangle {
                    corners,
                    circumcenter: t.circumcenter(),
                })
            })
            .collect();
        let neighbors = triangulation.neighbor_vertices(id);
        Voronoi::create(triangulation.position(id), neighbors, &fan, |v| triangulation.position(v))
    }

    /// The cell `q` would own if it were inserted, built without modifying the
    /// triangulation. Its neighbors are the natural neighbors of `q`.
    pub fn second_order(triangulation: &Triangulation, q: Point2) -> Result<Voronoi, DtfeError> {
        let cavity = triangulation.circumcircle_triangles(q)?;
        if cavity.is_empty() {
            return Err(DtfeError::InvalidVertex { x: q.x, y: q.y });
        }
        let on_sample = cavity
            .iter()
            .filter_map(|&t| triangulation.triangle(t))
            .flat_map(|t| t.vertices())
            .any(|v| triangulation.position(v) == q);
        if on_sample {
            return Err(DtfeError::InvalidVertex { x: q.x, y: q.y });
        }

        let boundary = triangulation.edge_set(&cavity);
        let temp = triangulation.create_triangles(&boundary, q);
        let neighbors: Vec<VertexId> = temp.iter().flat_map(|t| [t.a, t.b]).collect();

        let fan: Vec<FanTriangle> = temp
            .iter()
            .map(|t| FanTriangle { corners: [t.a, t.b], circumcenter: t.circumcenter })
            .collect();
        Voronoi::create(q, neighbors, &fan, |v| triangulation.position(v))
    }

    pub fn polygon(&self) -> &ConvexPolygon {
        &self.polygon
    }

    pub fn neighbors(&self) -> &[VertexId] {
        &self.neighbors
    }

    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    pub fn intersect(&self, other: &ConvexPolygon) -> ConvexPolygon {
        self.polygon.intersect(other)
    }
}

/// Memoized Voronoi cells of inserted vertices.
///
/// Entries are never refreshed on their own; callers invalidate them when the
/// triangulation around a vertex changes.
#[derive(Clone, Debug, Default)]
pub struct CellCache {
    cells: HashMap<VertexId, Voronoi>,
}

impl CellCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: VertexId) -> Option<&Voronoi> {
        self.cells.get(&id)
    }

    pub fn get_or_build(&mut self, triangulation: &Triangulation, id: VertexId) -> Result<&Voronoi, DtfeError> {
        match self.cells.entry(id) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let cell = Voronoi::from_vertex(triangulation, id)?;
                Ok(e.insert(cell))
            }
        }
    }

    pub fn insert(&mut self, id: VertexId, cell: Voronoi) {
        self.cells.insert(id, cell);
    }

    pub fn invalidate(&mut self) {
        self.cells.clear();
    }

    pub fn invalidate_vertices(&mut self, ids: &[VertexId]) {
        for id in ids {
            self.cells.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
