use super::{DensityField, InterpolationStrategy, PointDensity};
use crate::error::DtfeError;
use crate::geometry::Point2;
use crate::voronoi::Voronoi;

/// Sibson interpolation: the density of each natural neighbor weighted by the
/// share of its Voronoi cell the query would take over.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalNeighbor;

impl InterpolationStrategy for NaturalNeighbor {
    fn name(&self) -> &'static str {
        "natural_neighbor"
    }

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
        point_density(field, q)
    }
}

/// Natural-neighbor density at `q`, classifying hull and degenerate queries.
///
/// Only adjacency and walk failures surface as errors.
pub fn point_density(field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
    if field.triangulation.locate(q)?.is_none() {
        return Ok(PointDensity::OutsideHull);
    }
    match natural_neighbor_interpolation(field, q) {
        Ok(v) => Ok(PointDensity::from_value(v)),
        Err(DtfeError::InvalidVertex { .. }) => Ok(PointDensity::Undefined),
        Err(e) => Err(e),
    }
}

/// `Σ area(cell(q) ∩ cell(n)) · density(n) / area(cell(q))` over the natural
/// neighbors `n` of `q`.
///
/// Neighbors without a density (super vertices, zero-area samples) add nothing.
/// Fails with `InvalidVertex` when the cell of `q` has no usable area.
pub fn natural_neighbor_interpolation(field: &mut DensityField<'_>, q: Point2) -> Result<f64, DtfeError> {
    let cell = Voronoi::second_order(field.triangulation, q)?;
    let area = cell.area();
    if !(area > 0.0) || !area.is_finite() {
        return Err(DtfeError::InvalidVertex { x: q.x, y: q.y });
    }

    let mut sum = 0.0;
    for &n in cell.neighbors() {
        let Some(density) = field.density(n) else {
            continue;
        };
        let owned = field.cells.get_or_build(field.triangulation, n)?;
        sum += owned.intersect(cell.polygon()).area() * density;
    }
    Ok(sum / area)
}
