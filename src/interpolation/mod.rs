//! Density interpolation at arbitrary query points.
//!
//! Every interpolant reads the same [`DensityField`]: the triangulation, the
//! per-vertex densities, and the memoized Voronoi cells. Queries outside the
//! convex hull of the samples report [`PointDensity::OutsideHull`] rather than
//! an error.

mod linear;
mod natural_neighbor;
mod neighbor;

use std::fmt;
use std::str::FromStr;

pub use linear::{Barycentric, FirstOrder};
pub use natural_neighbor::{NaturalNeighbor, natural_neighbor_interpolation, point_density};
pub use neighbor::{MaxNeighbor, Mean, NearestNeighbor};

use crate::error::DtfeError;
use crate::geometry::Point2;
use crate::triangulation::{Triangulation, VertexId};
use crate::voronoi::CellCache;

/// Result of a density query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointDensity {
    /// The query lies outside the convex hull of the samples.
    OutsideHull,
    /// The query is inside the hull but no density can be assigned, e.g. it
    /// sits exactly on a sample.
    Undefined,
    Value(f64),
}

impl PointDensity {
    /// Wraps `v`, mapping non-finite values to `Undefined`.
    pub fn from_value(v: f64) -> Self {
        if v.is_finite() { PointDensity::Value(v) } else { PointDensity::Undefined }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            PointDensity::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_outside(self) -> bool {
        self == PointDensity::OutsideHull
    }
}

/// Borrowed view of an estimated density field.
pub struct DensityField<'a> {
    pub triangulation: &'a Triangulation,
    /// Density per arena vertex, indexed by `VertexId`.
    pub densities: &'a [Option<f64>],
    pub cells: &'a mut CellCache,
}

impl<'a> DensityField<'a> {
    pub fn new(triangulation: &'a Triangulation, densities: &'a [Option<f64>], cells: &'a mut CellCache) -> Self {
        Self { triangulation, densities, cells }
    }

    /// Density of `id`; super vertices carry none.
    pub fn density(&self, id: VertexId) -> Option<f64> {
        if self.triangulation.is_super_vertex(id) {
            return None;
        }
        self.densities.get(id.0).copied().flatten()
    }

    /// Corners of the sample triangle enclosing `q`, or `None` outside the hull.
    pub(crate) fn located_corners(&self, q: Point2) -> Result<Option<[VertexId; 3]>, DtfeError> {
        let tri = self.triangulation;
        Ok(tri.locate(q)?.and_then(|t| tri.triangle(t)).map(|t| t.vertices()))
    }
}

/// A way of turning per-vertex densities into a density at any point.
pub trait InterpolationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError>;
}

/// Runtime choice of interpolant, e.g. from a string passed over the wasm boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    NaturalNeighbor,
    MaxNeighbor,
    FirstOrder,
    Barycentric,
    Mean,
    NearestNeighbor,
}

impl Interpolation {
    pub const ALL: [Interpolation; 6] = [
        Interpolation::NaturalNeighbor,
        Interpolation::MaxNeighbor,
        Interpolation::FirstOrder,
        Interpolation::Barycentric,
        Interpolation::Mean,
        Interpolation::NearestNeighbor,
    ];

    fn strategy(self) -> &'static dyn InterpolationStrategy {
        match self {
            Interpolation::NaturalNeighbor => &NaturalNeighbor,
            Interpolation::MaxNeighbor => &MaxNeighbor,
            Interpolation::FirstOrder => &FirstOrder,
            Interpolation::Barycentric => &Barycentric,
            Interpolation::Mean => &Mean,
            Interpolation::NearestNeighbor => &NearestNeighbor,
        }
    }
}

impl InterpolationStrategy for Interpolation {
    fn name(&self) -> &'static str {
        self.strategy().name()
    }

    fn density(&self, field: &mut DensityField<'_>, q: Point2) -> Result<PointDensity, DtfeError> {
        self.strategy().density(field, q)
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interpolation {
    type Err = DtfeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "natural_neighbor" | "natural" => Ok(Interpolation::NaturalNeighbor),
            "max_neighbor" | "max" => Ok(Interpolation::MaxNeighbor),
            "first_order" | "linear" => Ok(Interpolation::FirstOrder),
            "barycentric" => Ok(Interpolation::Barycentric),
            "mean" => Ok(Interpolation::Mean),
            "nearest_neighbor" | "nearest" => Ok(Interpolation::NearestNeighbor),
            _ => Err(DtfeError::UnknownStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for kind in Interpolation::ALL {
            assert_eq!(kind.to_string().parse::<Interpolation>().unwrap(), kind);
        }
        assert_eq!("Natural-Neighbor".parse::<Interpolation>().unwrap(), Interpolation::NaturalNeighbor);
        assert!(matches!("cubic".parse::<Interpolation>(), Err(DtfeError::UnknownStrategy(_))));
    }

    #[test]
    fn test_point_density_value() {
        assert_eq!(PointDensity::from_value(f64::NAN), PointDensity::Undefined);
        assert_eq!(PointDensity::from_value(2.0).value(), Some(2.0));
        assert!(PointDensity::OutsideHull.is_outside());
    }
}
