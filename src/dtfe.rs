use std::collections::{HashMap, HashSet};

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::bounds::BoundingBox;
use crate::config::TriangulationConfig;
use crate::density::{DensityScale, compute_density, max_density};
use crate::error::DtfeError;
use crate::geometry::Point2;
use crate::interpolation::{self, DensityField, InterpolationStrategy, PointDensity};
use crate::isoline;
use crate::triangulation::{SUPER_VERTEX_COUNT, Triangulation, VertexId};
use crate::voronoi::{CellCache, Voronoi};

/// A density field estimated from weighted samples.
///
/// Samples are set first, then [`Dtfe::calculate`] triangulates them and
/// precomputes every sample's density and Voronoi cell. Queries before that
/// fail with [`DtfeError::NotCalculated`].
pub struct Dtfe {
    pub bounds: BoundingBox,
    pub config: TriangulationConfig,
    samples: Vec<Point2>,
    weights: Vec<f64>,
    // Sample densities given by the caller instead of estimated from weights.
    assigned: Option<Vec<Option<f64>>>,
    triangulation: Option<Triangulation>,
    // Indexed by arena vertex id, super vertices included.
    densities: Vec<Option<f64>>,
    cells: CellCache,
}

impl Dtfe {
    pub fn new(bounds: BoundingBox) -> Self {
        Self::with_config(bounds, TriangulationConfig::default())
    }

    pub fn with_config(bounds: BoundingBox, config: TriangulationConfig) -> Self {
        Self {
            bounds,
            config,
            samples: Vec::new(),
            weights: Vec::new(),
            assigned: None,
            triangulation: None,
            densities: Vec::new(),
            cells: CellCache::new(),
        }
    }

    /// Replaces the samples with a flat `[x, y, x, y, ...]` buffer, each of unit weight.
    /// A trailing odd coordinate is ignored.
    pub fn set_samples(&mut self, samples: &[f64]) {
        let points = samples.chunks_exact(2).map(|c| Point2::new(c[0], c[1])).collect();
        self.set_points(points);
    }

    pub fn set_points(&mut self, points: Vec<Point2>) {
        self.weights = vec![1.0; points.len()];
        self.assigned = None;
        self.samples = points;
        self.reset();
    }

    /// Replaces the sample weights. The length is checked by [`Dtfe::calculate`].
    pub fn set_weights(&mut self, weights: Vec<f64>) {
        self.weights = weights;
        self.reset();
    }

    /// Assigns sample densities directly, in sample order, instead of
    /// estimating them from the weights. Cleared by [`Dtfe::set_points`].
    pub fn set_densities(&mut self, densities: Vec<Option<f64>>) {
        self.assigned = Some(densities);
        self.reset();
    }

    /// Generates random samples within the bounds and sets them with unit weight.
    pub fn random_samples(&mut self, count: usize) {
        let mut rng = StdRng::seed_from_u64(get_seed());
        let w = self.bounds.width();
        let h = self.bounds.height();
        let points = (0..count)
            .map(|_| {
                Point2::new(
                    self.bounds.min[0] + rng.r#gen::<f64>() * w,
                    self.bounds.min[1] + rng.r#gen::<f64>() * h,
                )
            })
            .collect();
        self.set_points(points);
    }

    fn reset(&mut self) {
        self.triangulation = None;
        self.densities.clear();
        self.cells.invalidate();
    }

    /// Triangulates the samples and computes every density and Voronoi cell.
    pub fn calculate(&mut self) -> Result<(), DtfeError> {
        self.reset();
        if let Some(assigned) = &self.assigned {
            if assigned.len() != self.samples.len() {
                return Err(DtfeError::LengthMismatch { points: self.samples.len(), weights: assigned.len() });
            }
        }
        let tri = Triangulation::new(&self.samples, Some(&self.weights), self.config)?;

        self.densities = match &self.assigned {
            Some(assigned) => (0..tri.vertex_count())
                .map(|i| {
                    let id = VertexId(i);
                    if tri.is_super_vertex(id) || !tri.vertex(id).is_inserted() {
                        None
                    } else {
                        assigned[i - SUPER_VERTEX_COUNT]
                    }
                })
                .collect(),
            None => (0..tri.vertex_count())
                .into_par_iter()
                .map(|i| compute_density(&tri, VertexId(i)))
                .collect(),
        };

        let cells: Vec<(VertexId, Voronoi)> = (SUPER_VERTEX_COUNT..tri.vertex_count())
            .into_par_iter()
            .map(VertexId)
            .filter(|&id| tri.vertex(id).is_inserted())
            .map(|id| Voronoi::from_vertex(&tri, id).map(|cell| (id, cell)))
            .collect::<Result<_, _>>()?;
        for (id, cell) in cells {
            self.cells.insert(id, cell);
        }

        tracing::debug!(
            samples = tri.sample_count(),
            triangles = tri.triangle_count(),
            cells = self.cells.len(),
            "density field calculated"
        );
        self.triangulation = Some(tri);
        Ok(())
    }

    /// Inserts one more sample into a calculated field.
    ///
    /// Densities and cells of the new sample and its Delaunay neighbors are
    /// recomputed; the rest of the field is untouched. With assigned densities
    /// the weight is taken as the new sample's density and no other density
    /// changes.
    pub fn insert_sample(&mut self, point: Point2, weight: f64) -> Result<VertexId, DtfeError> {
        let tri = self.triangulation.as_mut().ok_or(DtfeError::NotCalculated)?;
        let id = tri.insert(point, weight)?;
        self.samples.push(point);
        self.weights.push(weight);

        let mut affected = tri.neighbor_vertices(id);
        affected.push(id);
        self.cells.invalidate_vertices(&affected);

        self.densities.resize(tri.vertex_count(), None);
        match &mut self.assigned {
            Some(assigned) => {
                assigned.push(Some(weight));
                self.densities[id.0] = Some(weight);
            }
            None => {
                for &v in &affected {
                    self.densities[v.0] = compute_density(tri, v);
                }
            }
        }
        tracing::debug!(?id, affected = affected.len(), "sample inserted");
        Ok(id)
    }

    pub fn triangulation(&self) -> Result<&Triangulation, DtfeError> {
        self.triangulation.as_ref().ok_or(DtfeError::NotCalculated)
    }

    pub fn samples(&self) -> &[Point2] {
        &self.samples
    }

    pub fn count_samples(&self) -> usize {
        self.samples.len()
    }

    /// Density of sample `index`, `None` if undefined or not calculated.
    pub fn density(&self, index: usize) -> Option<f64> {
        self.densities.get(SUPER_VERTEX_COUNT + index).copied().flatten()
    }

    /// Per-sample densities in sample order.
    pub fn densities(&self) -> &[Option<f64>] {
        self.densities.get(SUPER_VERTEX_COUNT..).unwrap_or(&[])
    }

    pub fn max_density(&self) -> f64 {
        max_density(&self.densities)
    }

    pub fn relative_density(&self, d: f64, scale: DensityScale) -> f64 {
        scale.relative(d, self.max_density())
    }

    /// Voronoi cell of sample `index`. Empty for a dropped sample.
    pub fn voronoi(&mut self, index: usize) -> Result<&Voronoi, DtfeError> {
        let tri = self.triangulation.as_ref().ok_or(DtfeError::NotCalculated)?;
        let count = tri.sample_count();
        if index >= count {
            return Err(DtfeError::SampleOutOfRange { index, count });
        }
        self.cells.get_or_build(tri, Triangulation::sample_id(index))
    }

    pub fn field(&mut self) -> Result<DensityField<'_>, DtfeError> {
        let tri = self.triangulation.as_ref().ok_or(DtfeError::NotCalculated)?;
        Ok(DensityField::new(tri, &self.densities, &mut self.cells))
    }

    pub fn point_density(&mut self, q: Point2) -> Result<PointDensity, DtfeError> {
        interpolation::point_density(&mut self.field()?, q)
    }

    pub fn natural_neighbor_interpolation(&mut self, q: Point2) -> Result<f64, DtfeError> {
        interpolation::natural_neighbor_interpolation(&mut self.field()?, q)
    }

    pub fn interpolate(&mut self, q: Point2, strategy: &dyn InterpolationStrategy) -> Result<PointDensity, DtfeError> {
        strategy.density(&mut self.field()?, q)
    }

    /// Samples the field at the centers of an `nx` by `ny` raster over the bounds,
    /// row by row from `min`.
    pub fn density_grid(&mut self, nx: usize, ny: usize, strategy: &dyn InterpolationStrategy) -> Result<Vec<PointDensity>, DtfeError> {
        let dx = self.bounds.width() / nx as f64;
        let dy = self.bounds.height() / ny as f64;
        let [x0, y0] = self.bounds.min;

        let mut field = self.field()?;
        let mut grid = Vec::with_capacity(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let q = Point2::new(x0 + (i as f64 + 0.5) * dx, y0 + (j as f64 + 0.5) * dy);
                grid.push(strategy.density(&mut field, q)?);
            }
        }
        Ok(grid)
    }

    /// Iso-contours where the relative density on `scale` equals `value`.
    pub fn isolines(&self, value: f64, scale: DensityScale) -> Result<Vec<Vec<Point2>>, DtfeError> {
        let tri = self.triangulation()?;
        Ok(isoline::isolines(tri, &self.densities, value, scale))
    }

    /// The field `a - b` over the samples of both.
    ///
    /// Samples present in both maps take the difference of their densities.
    /// A sample present in only one map is compared against the other map's
    /// `strategy` interpolation at that point, which counts as zero outside
    /// its hull. Samples dropped from either map are left out. The result is
    /// triangulated with `a`'s configuration.
    pub fn difference(a: &mut Dtfe, b: &mut Dtfe, strategy: &dyn InterpolationStrategy) -> Result<Dtfe, DtfeError> {
        let a_samples = a.inserted_samples()?;
        let b_samples = b.inserted_samples()?;
        let key = |p: Point2| (p.x.to_bits(), p.y.to_bits());
        let b_index: HashMap<(u64, u64), Option<f64>> = b_samples.iter().map(|&(p, d)| (key(p), d)).collect();
        let a_keys: HashSet<(u64, u64)> = a_samples.iter().map(|&(p, _)| key(p)).collect();

        let mut points = Vec::with_capacity(a_samples.len() + b_samples.len());
        let mut densities = Vec::with_capacity(points.capacity());
        for &(p, da) in &a_samples {
            let db = match b_index.get(&key(p)) {
                Some(&d) => d,
                None => interpolated_or_zero(b.interpolate(p, strategy)?),
            };
            points.push(p);
            densities.push(da.zip(db).map(|(da, db)| da - db));
        }
        for &(p, db) in b_samples.iter().filter(|(p, _)| !a_keys.contains(&key(*p))) {
            let da = interpolated_or_zero(a.interpolate(p, strategy)?);
            points.push(p);
            densities.push(da.zip(db).map(|(da, db)| da - db));
        }

        let mut diff = Dtfe::with_config(a.bounds.union(&b.bounds), a.config);
        diff.set_points(points);
        diff.set_densities(densities);
        diff.calculate()?;
        tracing::debug!(samples = diff.count_samples(), "difference field calculated");
        Ok(diff)
    }

    // Positions and densities of the samples that made it into the triangulation.
    fn inserted_samples(&self) -> Result<Vec<(Point2, Option<f64>)>, DtfeError> {
        let tri = self.triangulation()?;
        Ok(tri
            .sample_ids()
            .filter(|&id| tri.vertex(id).is_inserted())
            .map(|id| (tri.position(id), self.densities.get(id.0).copied().flatten()))
            .collect())
    }
}

fn interpolated_or_zero(d: PointDensity) -> Option<f64> {
    match d {
        PointDensity::Value(v) => Some(v),
        PointDensity::OutsideHull => Some(0.0),
        PointDensity::Undefined => None,
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}
