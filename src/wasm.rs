use crate::bounds::BoundingBox;
use crate::density::DensityScale;
use crate::dtfe::Dtfe;
use crate::geometry::Point2;
use crate::interpolation::{Interpolation, PointDensity};
use wasm_bindgen::prelude::*;
use js_sys::{Array, Float64Array};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_STRATEGIES: &str = r#"
export type InterpolationName =
    "natural_neighbor" | "max_neighbor" | "first_order" | "barycentric" | "mean" | "nearest_neighbor";
"#;

fn to_js(e: crate::DtfeError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// --- Bounding Box ---

/// Axis-aligned bounds of the sampled region.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[wasm_bindgen]
impl BoundingBox2D {
    #[wasm_bindgen(constructor)]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox2D {
        BoundingBox2D { min_x, min_y, max_x, max_y }
    }
}

impl From<BoundingBox2D> for BoundingBox {
    fn from(b: BoundingBox2D) -> Self {
        BoundingBox::new([b.min_x, b.min_y], [b.max_x, b.max_y])
    }
}

// --- Density field ---

/// Density estimation over weighted 2D samples, for JavaScript callers.
#[wasm_bindgen]
pub struct Dtfe2D {
    inner: Dtfe,
}

#[wasm_bindgen]
impl Dtfe2D {
    #[wasm_bindgen(constructor)]
    pub fn new(bounds: BoundingBox2D) -> Dtfe2D {
        Dtfe2D { inner: Dtfe::new(bounds.into()) }
    }

    /// Sets samples from a flat `[x, y, x, y, ...]` buffer.
    pub fn set_samples(&mut self, samples: &[f64]) {
        self.inner.set_samples(samples);
    }

    pub fn set_weights(&mut self, weights: &[f64]) {
        self.inner.set_weights(weights.to_vec());
    }

    pub fn random_samples(&mut self, count: usize) {
        self.inner.random_samples(count);
    }

    pub fn calculate(&mut self) -> Result<(), JsValue> {
        self.inner.calculate().map_err(to_js)
    }

    pub fn insert_sample(&mut self, x: f64, y: f64, weight: f64) -> Result<(), JsValue> {
        self.inner.insert_sample(Point2::new(x, y), weight).map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn count_samples(&self) -> usize {
        self.inner.count_samples()
    }

    #[wasm_bindgen(getter)]
    pub fn max_density(&self) -> f64 {
        self.inner.max_density()
    }

    /// Density of sample `index`, undefined if it has none.
    pub fn density(&self, index: usize) -> Option<f64> {
        self.inner.density(index)
    }

    /// Relative density in `[-1, 1]` on a `"linear"` or `"log"` scale.
    pub fn relative_density(&self, d: f64, scale: &str) -> Result<f64, JsValue> {
        let scale: DensityScale = scale.parse().map_err(to_js)?;
        Ok(self.inner.relative_density(d, scale))
    }

    /// Natural-neighbor density at `(x, y)`, undefined outside the hull or on a sample.
    pub fn point_density(&mut self, x: f64, y: f64) -> Result<Option<f64>, JsValue> {
        let d = self.inner.point_density(Point2::new(x, y)).map_err(to_js)?;
        Ok(d.value())
    }

    pub fn interpolate(&mut self, x: f64, y: f64, strategy: &str) -> Result<Option<f64>, JsValue> {
        let strategy: Interpolation = strategy.parse().map_err(to_js)?;
        let d = self.inner.interpolate(Point2::new(x, y), &strategy).map_err(to_js)?;
        Ok(d.value())
    }

    /// Row-major `nx * ny` raster over the bounds; NaN where there is no density.
    pub fn density_grid(&mut self, nx: usize, ny: usize, strategy: &str) -> Result<Float64Array, JsValue> {
        let strategy: Interpolation = strategy.parse().map_err(to_js)?;
        let grid = self.inner.density_grid(nx, ny, &strategy).map_err(to_js)?;
        let values: Vec<f64> = grid.into_iter().map(|d| d.value().unwrap_or(f64::NAN)).collect();
        Ok(Float64Array::from(values.as_slice()))
    }

    /// Flat `[x, y, ...]` vertices of the Voronoi cell of sample `index`.
    pub fn cell(&mut self, index: usize) -> Result<Vec<f64>, JsValue> {
        let cell = self.inner.voronoi(index).map_err(to_js)?;
        Ok(cell.polygon().vertices().iter().flat_map(|p| p.to_array()).collect())
    }

    /// Iso-contours of relative density, one flat `[x, y, ...]` array per line.
    pub fn isolines(&self, value: f64, scale: &str) -> Result<Array, JsValue> {
        let scale: DensityScale = scale.parse().map_err(to_js)?;
        let lines = self.inner.isolines(value, scale).map_err(to_js)?;
        Ok(lines
            .iter()
            .map(|line| {
                let flat: Vec<f64> = line.iter().flat_map(|p| p.to_array()).collect();
                Float64Array::from(flat.as_slice())
            })
            .collect())
    }

    pub fn is_outside(&mut self, x: f64, y: f64) -> Result<bool, JsValue> {
        let d = self.inner.point_density(Point2::new(x, y)).map_err(to_js)?;
        Ok(d == PointDensity::OutsideHull)
    }
}
