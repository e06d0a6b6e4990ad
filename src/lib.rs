//! # dtfe
//!
//! `dtfe` estimates a continuous density field from weighted 2D samples using the
//! Delaunay Tessellation Field Estimator, and is designed to be used in Rust as well
//! as compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Natural-neighbor interpolation**: Densities at arbitrary points from second-order Voronoi cells, without modifying the triangulation.
//! - **Alternate interpolants**: Max-neighbor, linear (edge-normal and barycentric), mean, and nearest-neighbor strategies behind one trait.
//! - **Iso-contours and difference maps**: Density isolines by marching triangles, and the difference field of two estimates.
//! - **Incremental Delaunay**: Bowyer–Watson triangulation with Hilbert-ordered insertion and a retained super triangle.
//! - **WASM-first**: Built with `wasm-bindgen` and `wasm-bindgen-rayon` for use from JavaScript and TypeScript.
//!
//! ## Example
//!
//! See the `demos/` directory for rendering a density heat map to SVG.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`Dtfe`] struct, which owns the samples, their
//! triangulation, and the precomputed densities and Voronoi cells.

mod bounds;
mod config;
mod density;
mod dtfe;
mod error;
mod geometry;
pub mod interpolation;
mod isoline;
mod polygon;
pub mod triangulation;
mod voronoi;
pub mod wasm;

pub use bounds::BoundingBox;
pub use config::InvalidVertexPolicy;
pub use config::TriangulationConfig;
pub use density::DensityScale;
pub use density::compute_density;
pub use density::max_density;
pub use dtfe::Dtfe;
pub use error::DtfeError;
pub use geometry::Point2;
pub use geometry::angular_cmp;
pub use geometry::circumcenter;
pub use geometry::orient2d;
pub use interpolation::DensityField;
pub use interpolation::Interpolation;
pub use interpolation::InterpolationStrategy;
pub use interpolation::PointDensity;
pub use isoline::isolines;
pub use polygon::ConvexPolygon;
pub use polygon::line_intersection;
pub use triangulation::Triangulation;
pub use triangulation::VertexId;
pub use voronoi::CellCache;
pub use voronoi::FanTriangle;
pub use voronoi::Voronoi;
