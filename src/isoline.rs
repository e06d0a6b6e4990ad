//! Iso-contours of relative density over the sample triangles.
//!
//! Each sample triangle whose corners straddle the iso value contributes one
//! segment between the two crossed edges. Segments sharing a crossed edge are
//! chained into polylines.

use std::collections::{HashMap, VecDeque};

use crate::density::{DensityScale, max_density};
use crate::geometry::Point2;
use crate::triangulation::{Triangulation, VertexId};

type EdgeKey = (VertexId, VertexId);

#[derive(Clone, Copy, Debug)]
struct Segment {
    ends: [(EdgeKey, Point2); 2],
}

impl Segment {
    /// The end on `edge` and the opposite end.
    fn split_at(&self, edge: EdgeKey) -> Option<((EdgeKey, Point2), (EdgeKey, Point2))> {
        match self.ends {
            [a, b] if a.0 == edge => Some((a, b)),
            [a, b] if b.0 == edge => Some((b, a)),
            _ => None,
        }
    }
}

/// Polylines where the relative density (on `scale`) equals `value`.
///
/// Undefined densities count as zero. A closed loop repeats its first point
/// at the end; an open line ends on the hull of the samples.
pub fn isolines(
    triangulation: &Triangulation,
    densities: &[Option<f64>],
    value: f64,
    scale: DensityScale,
) -> Vec<Vec<Point2>> {
    let max = max_density(densities);
    let relative = |v: VertexId| scale.relative(densities.get(v.0).copied().flatten().unwrap_or(0.0), max);

    let crossing = |u: VertexId, v: VertexId| -> (EdgeKey, Point2) {
        // fixed orientation so both triangles of an edge agree on the point
        let (u, v) = if u < v { (u, v) } else { (v, u) };
        let (du, dv) = (relative(u), relative(v));
        let (pu, pv) = (triangulation.position(u), triangulation.position(v));
        let t = (value - du) / (dv - du);
        ((u, v), pu + (pv - pu) * t)
    };

    let mut segments = Vec::new();
    for (_, tri) in triangulation.sample_triangles() {
        let corners = tri.vertices();
        let above: Vec<bool> = corners.iter().map(|&v| relative(v) > value).collect();
        let count = above.iter().filter(|&&a| a).count();
        if count == 0 || count == 3 {
            continue;
        }
        // the corner on its own side of the iso value
        let lone = count == 1;
        let Some(k) = above.iter().position(|&a| a == lone) else {
            continue;
        };
        let (c, a, b) = (corners[k], corners[(k + 1) % 3], corners[(k + 2) % 3]);
        segments.push(Segment { ends: [crossing(c, a), crossing(c, b)] });
    }

    let mut by_edge: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        for (edge, _) in s.ends {
            by_edge.entry(edge).or_default().push(i);
        }
    }

    let mut used = vec![false; segments.len()];
    let next = |edge: EdgeKey, used: &[bool]| -> Option<usize> {
        by_edge.get(&edge)?.iter().copied().find(|&i| !used[i])
    };

    let mut lines = Vec::new();
    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let [(tail_edge, tail), (head_edge, head)] = segments[start].ends;
        let mut line = VecDeque::from([tail, head]);

        let mut edge = head_edge;
        let mut closed = false;
        while let Some(i) = next(edge, &used) {
            used[i] = true;
            let Some((_, (far_edge, far))) = segments[i].split_at(edge) else {
                break;
            };
            line.push_back(far);
            edge = far_edge;
            if edge == tail_edge {
                closed = true;
                break;
            }
        }

        if !closed {
            let mut edge = tail_edge;
            while let Some(i) = next(edge, &used) {
                used[i] = true;
                let Some((_, (far_edge, far))) = segments[i].split_at(edge) else {
                    break;
                };
                line.push_front(far);
                edge = far_edge;
            }
        }
        lines.push(Vec::from(line));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriangulationConfig;
    use crate::triangulation::SUPER_VERTEX_COUNT;

    fn square_with_center(center_density: f64) -> (Triangulation, Vec<Option<f64>>) {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
        ];
        let tri = Triangulation::new(&pts, None, TriangulationConfig::default()).unwrap();
        let mut densities = vec![None; SUPER_VERTEX_COUNT];
        densities.extend([Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(center_density)]);
        (tri, densities)
    }

    #[test]
    fn test_peak_gives_closed_loop() {
        let (tri, densities) = square_with_center(3.0);
        // relative 0.5 is density 1.5, a quarter of the way from each corner to the center
        let lines = isolines(&tri, &densities, 0.5, DensityScale::Linear);
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line.len(), 5);
        assert_eq!(line.first(), line.last());
        for p in line {
            let r = p.distance_squared(Point2::new(1.0, 1.0)).sqrt();
            assert!((r - 0.75 * 2f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flat_field_has_no_lines() {
        let (tri, densities) = square_with_center(1.0);
        assert!(isolines(&tri, &densities, 0.5, DensityScale::Linear).is_empty());
        assert!(isolines(&tri, &densities, 1.0, DensityScale::Log).is_empty());
    }
}
