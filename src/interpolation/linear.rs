use super::{DensityField, InterpolationStrategy, PointDensity};
use crate::error::DtfeError;
use crate::geometry::Point2;

/// Linear interpolation inside the enclosing triangle, weighting each corner by
/// its distance from the opposite edge along the cached edge normals.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstOrder;

impl InterpolationStrategy for FirstOrder {
    fn name(&self) -> &'static str {
        "first_order"
    }

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
        let tri = field.triangulation;
        let Some(t) = tri.locate(q)?.and_then(|t| tri.triangle(t)) else {
            return Ok(PointDensity::OutsideHull);
        };
        let ids = t.vertices();
        let corners = ids.map(|v| tri.position(v));
        let weights = t.frame().weights(corners, q);

        let sum: f64 = ids
            .iter()
            .zip(weights)
            .map(|(&v, w)| w * field.density(v).unwrap_or(0.0))
            .sum();
        Ok(PointDensity::from_value(sum))
    }
}

/// Linear interpolation inside the enclosing triangle using barycentric coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct Barycentric;

impl InterpolationStrategy for Barycentric {
    fn name(&self) -> &'static str {
        "barycentric"
    }

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
        let Some(ids) = field.located_corners(q)? else {
            return Ok(PointDensity::OutsideHull);
        };
        let [a, b, c] = ids.map(|v| field.triangulation.position(v));

        let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
        if det == 0.0 {
            return Ok(PointDensity::Undefined);
        }
        let la = ((b.y - c.y) * (q.x - c.x) + (c.x - b.x) * (q.y - c.y)) / det;
        let lb = ((c.y - a.y) * (q.x - c.x) + (a.x - c.x) * (q.y - c.y)) / det;
        let lc = 1.0 - la - lb;

        let d = ids.map(|v| field.density(v).unwrap_or(0.0));
        Ok(PointDensity::from_value(la * d[0] + lb * d[1] + lc * d[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriangulationConfig;
    use crate::triangulation::{Triangulation, VertexId};
    use crate::voronoi::CellCache;

    #[test]
    fn test_linear_interpolants_agree() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), Point2::new(1.0, 3.0)];
        let tri = Triangulation::new(&pts, None, TriangulationConfig::default()).unwrap();
        let mut densities = vec![None; tri.vertex_count()];
        densities[Triangulation::sample_id(0).0] = Some(1.0);
        densities[Triangulation::sample_id(1).0] = Some(2.0);
        densities[Triangulation::sample_id(2).0] = Some(6.0);
        let mut cells = CellCache::new();
        let mut field = DensityField::new(&tri, &densities, &mut cells);

        let q = Point2::new(1.5, 1.0);
        let a = FirstOrder.density(&mut field, q).unwrap().value().unwrap();
        let b = Barycentric.density(&mut field, q).unwrap().value().unwrap();
        assert!((a - b).abs() < 1e-12);

        // equal weights at the centroid
        let centroid = Point2::new(5.0 / 3.0, 1.0);
        let mean = Barycentric.density(&mut field, centroid).unwrap().value().unwrap();
        assert!((mean - 3.0).abs() < 1e-12);
        assert!(FirstOrder.density(&mut field, Point2::new(3.0, 3.0)).unwrap().is_outside());
        assert!(field.density(VertexId(0)).is_none());
    }
}
