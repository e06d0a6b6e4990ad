use plotters::prelude::*;
use rand::Rng;
use dtfe::{BoundingBox, DensityScale, Dtfe, Interpolation, InvalidVertexPolicy, Point2, TriangulationConfig};

const RESOLUTION: usize = 128;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let points = clustered_samples(2000);

    run_example("dtfe_natural_neighbor.svg", &points, Interpolation::NaturalNeighbor, DensityScale::Log)?;
    run_example("dtfe_first_order.svg", &points, Interpolation::FirstOrder, DensityScale::Log)?;
    run_example("dtfe_nearest_neighbor.svg", &points, Interpolation::NearestNeighbor, DensityScale::Linear)?;

    Ok(())
}

/// A few gaussian-like clusters over a sparse uniform background.
fn clustered_samples(count: usize) -> Vec<Point2> {
    let mut rng = rand::thread_rng();
    let centers = [(30.0, 35.0, 6.0), (65.0, 60.0, 10.0), (45.0, 80.0, 4.0)];
    (0..count)
        .map(|i| {
            if i % 5 == 0 {
                return Point2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
            }
            let (cx, cy, spread) = centers[i % centers.len()];
            // sum of uniforms approximates a normal distribution
            let dx: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0)).sum();
            let dy: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0)).sum();
            Point2::new((cx + dx * spread).clamp(0.0, 100.0), (cy + dy * spread).clamp(0.0, 100.0))
        })
        .collect()
}

fn run_example(
    filename: &str,
    points: &[Point2],
    strategy: Interpolation,
    scale: DensityScale,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
    // clamped samples may coincide on the border
    let config = TriangulationConfig::default().with_policy(InvalidVertexPolicy::Drop);
    let mut dtfe = Dtfe::with_config(bounds, config);
    dtfe.set_points(points.to_vec());
    dtfe.calculate()?;

    let grid = dtfe.density_grid(RESOLUTION, RESOLUTION, &strategy)?;
    let step = 100.0 / RESOLUTION as f64;

    // Draw density raster
    for (k, d) in grid.iter().enumerate() {
        let Some(d) = d.value() else {
            continue;
        };
        let r = dtfe.relative_density(d, scale);
        let (i, j) = (k % RESOLUTION, k / RESOLUTION);
        let x = i as f64 * step;
        let y = j as f64 * step;
        let color = HSLColor(0.66 * (1.0 - r), 0.9, 0.2 + 0.5 * r);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x, y), (x + step, y + step)],
            color.filled(),
        )))?;
    }

    // Draw samples
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 1, BLACK.mix(0.4).filled())),
    )?;

    root.present()?;
    println!("Saved {} ({})", filename, strategy);
    Ok(())
}
