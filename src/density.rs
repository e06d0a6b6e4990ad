//! DTFE point density of each sample.

use std::str::FromStr;

use crate::error::DtfeError;
use crate::triangulation::{Triangulation, VertexId};

/// Density of vertex `id`: its weight divided by the area of the contiguous
/// Delaunay cell (all incident sample triangles).
///
/// Triangles touching the super triangle do not count. Returns `None` when the
/// area is zero, for super vertices, and for samples that were never inserted.
pub fn compute_density(triangulation: &Triangulation, id: VertexId) -> Option<f64> {
    if triangulation.is_super_vertex(id) {
        return None;
    }
    let area: f64 = triangulation
        .incident_triangles(id)
        .iter()
        .filter_map(|&t| triangulation.triangle(t))
        .filter(|t| !triangulation.touches_super(t))
        .map(|t| t.area())
        .filter(|&a| a > 0.0)
        .sum();
    if area == 0.0 {
        return None;
    }
    Some(triangulation.vertex(id).weight() / area)
}

/// Largest absolute defined density, or 0 when none is defined.
pub fn max_density(densities: &[Option<f64>]) -> f64 {
    densities.iter().flatten().map(|d| d.abs()).fold(0.0, f64::max)
}

/// Mapping from an absolute density to `[-1, 1]` relative to the maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DensityScale {
    #[default]
    Linear,
    Log,
}

impl DensityScale {
    /// Relative density of `d` against `max`. The sign of `d` is kept and zero
    /// maps to zero; a non-positive `max` gives zero.
    pub fn relative(self, d: f64, max: f64) -> f64 {
        if d == 0.0 || !(max > 0.0) {
            return 0.0;
        }
        let magnitude = d.abs();
        let r = match self {
            DensityScale::Linear => magnitude / max,
            DensityScale::Log => (1.0 + magnitude).log10() / (1.0 + max).log10(),
        };
        r.copysign(d)
    }
}

impl FromStr for DensityScale {
    type Err = DtfeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(DensityScale::Linear),
            "log" => Ok(DensityScale::Log),
            other => Err(DtfeError::UnknownStrategy(other.to_string())),
        }
    }
}
