use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dtfe::{BoundingBox, Dtfe, Point2, Triangulation, TriangulationConfig};
use rand::prelude::*;
use rand::rngs::StdRng;

fn random_points(count: usize) -> Vec<Point2> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|_| Point2::new(rng.r#gen::<f64>() * 100.0, rng.r#gen::<f64>() * 100.0))
        .collect()
}

fn benchmark_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulation");
    for count in [1_000, 10_000, 50_000] {
        let points = random_points(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &points, |b, points| {
            b.iter(|| Triangulation::new(black_box(points), None, TriangulationConfig::default()).unwrap())
        });
    }
    group.finish();
}

fn benchmark_calculate(c: &mut Criterion) {
    let bounds = BoundingBox::new([0.0, 0.0], [100.0, 100.0]);
    let mut dtfe = Dtfe::new(bounds);
    dtfe.random_samples(10_000);

    c.bench_function("calculate_10000", |b| {
        b.iter(|| {
            dtfe.calculate().unwrap();
            black_box(dtfe.max_density());
        })
    });
}

criterion_group!(benches, benchmark_triangulation, benchmark_calculate);
criterion_main!(benches);
