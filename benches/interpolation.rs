use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dtfe::{BoundingBox, Dtfe, Interpolation, Point2};

fn prepared(count: usize) -> Dtfe {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [100.0, 100.0]));
    dtfe.random_samples(count);
    dtfe.calculate().unwrap();
    dtfe
}

fn queries() -> Vec<Point2> {
    let mut qs = Vec::with_capacity(1000);
    for j in 0..25 {
        for i in 0..40 {
            qs.push(Point2::new(10.0 + i as f64 * 2.0 + 0.37, 10.0 + j as f64 * 3.2 + 0.11));
        }
    }
    qs
}

fn benchmark_strategies(c: &mut Criterion) {
    let mut dtfe = prepared(10_000);
    let qs = queries();

    for kind in Interpolation::ALL {
        c.bench_function(&format!("interpolate_{}_1000", kind), |b| {
            b.iter(|| {
                for &q in &qs {
                    black_box(dtfe.interpolate(q, &kind).unwrap());
                }
            })
        });
    }
}

fn benchmark_density_grid(c: &mut Criterion) {
    let mut dtfe = prepared(5_000);

    c.bench_function("density_grid_100x100", |b| {
        b.iter(|| black_box(dtfe.density_grid(100, 100, &Interpolation::NaturalNeighbor).unwrap()))
    });
}

criterion_group!(benches, benchmark_strategies, benchmark_density_grid);
criterion_main!(benches);
