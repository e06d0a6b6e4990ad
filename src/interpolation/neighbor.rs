use super::{DensityField, InterpolationStrategy, PointDensity};
use crate::error::DtfeError;
use crate::geometry::Point2;

/// Largest density among the natural neighbors of the query.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxNeighbor;

impl InterpolationStrategy for MaxNeighbor {
    fn name(&self) -> &'static str {
        "max_neighbor"
    }

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
        let tri = field.triangulation;
        if tri.locate(q)?.is_none() {
            return Ok(PointDensity::OutsideHull);
        }
        let max = tri
            .circumcircle_triangles(q)?
            .into_iter()
            .filter_map(|t| tri.triangle(t))
            .flat_map(|t| t.vertices())
            .filter_map(|v| field.density(v))
            .reduce(f64::max);
        Ok(max.map_or(PointDensity::Undefined, PointDensity::from_value))
    }
}

/// Mean density of the corners of the enclosing triangle.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean;

impl InterpolationStrategy for Mean {
    fn name(&self) -> &'static str {
        "mean"
    }

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
        let Some(ids) = field.located_corners(q)? else {
            return Ok(PointDensity::OutsideHull);
        };
        let sum: f64 = ids.iter().map(|&v| field.density(v).unwrap_or(0.0)).sum();
        Ok(PointDensity::from_value(sum / 3.0))
    }
}

/// Density of the closest sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl InterpolationStrategy for NearestNeighbor {
    fn name(&self) -> &'static str {
        "nearest_neighbor"
    }

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
        Ok(match field.triangulation.nearest_vertex(q)? {
            None => PointDensity::OutsideHull,
            Some(v) => field.density(v).map_or(PointDensity::Undefined, PointDensity::from_value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TriangulationConfig;
    use crate::triangulation::Triangulation;
    use crate::voronoi::CellCache;

    #[test]
    fn test_neighbor_interpolants() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
        ];
        let tri = Triangulation::new(&pts, None, TriangulationConfig::default()).unwrap();
        let mut densities = vec![None; tri.vertex_count()];
        for (i, d) in [1.0, 2.0, 3.0, 4.0, 10.0].into_iter().enumerate() {
            densities[Triangulation::sample_id(i).0] = Some(d);
        }
        let mut cells = CellCache::new();
        let mut field = DensityField::new(&tri, &densities, &mut cells);

        // lower triangle (0, 1, center)
        let q = Point2::new(1.0, 0.3);
        assert_eq!(Mean.density(&mut field, q).unwrap(), PointDensity::Value(13.0 / 3.0));
        assert_eq!(NearestNeighbor.density(&mut field, Point2::new(1.8, 1.9)).unwrap(), PointDensity::Value(3.0));
        assert_eq!(MaxNeighbor.density(&mut field, q).unwrap(), PointDensity::Value(10.0));

        let outside = Point2::new(-1.0, 1.0);
        assert!(Mean.density(&mut field, outside).unwrap().is_outside());
        assert!(NearestNeighbor.density(&mut field, outside).unwrap().is_outside());
        assert!(MaxNeighbor.density(&mut field, outside).unwrap().is_outside());
    }
}
