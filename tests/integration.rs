use approx::assert_relative_eq;
use dtfe::{
    BoundingBox, DensityScale, Dtfe, DtfeError, Interpolation, InvalidVertexPolicy, Point2, PointDensity, TriangulationConfig,
};

fn jittered_lattice(n: usize, spacing: f64) -> Vec<f64> {
    let mut samples = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let jx = ((i * 7 + j * 3) % 5) as f64 * 1e-4;
            let jy = ((i * 3 + j * 11) % 7) as f64 * 1e-4;
            samples.push(i as f64 * spacing + jx);
            samples.push(j as f64 * spacing + jy);
        }
    }
    samples
}

fn triangular_lattice(n: usize, side: f64) -> Vec<f64> {
    let row = side * 3f64.sqrt() / 2.0;
    let mut samples = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            samples.push(i as f64 * side + (j % 2) as f64 * side / 2.0);
            samples.push(j as f64 * row);
        }
    }
    samples
}

// density of an interior vertex: unit weight over six equilateral triangles
fn lattice_density(side: f64) -> f64 {
    1.0 / (6.0 * 3f64.sqrt() / 4.0 * side * side)
}

#[test]
fn test_three_samples_interpolate_between_densities() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [10.0, 8.0]));
    dtfe.set_samples(&[0.0, 0.0, 10.0, 0.0, 5.0, 8.0]);
    dtfe.set_weights(vec![1.0, 2.0, 4.0]);
    dtfe.calculate().unwrap();

    // a single triangle of area 40
    assert_relative_eq!(dtfe.density(0).unwrap(), 1.0 / 40.0);
    assert_relative_eq!(dtfe.density(2).unwrap(), 4.0 / 40.0);

    let v = dtfe.natural_neighbor_interpolation(Point2::new(5.0, 8.0 / 3.0)).unwrap();
    assert!(v > 1.0 / 40.0 && v < 4.0 / 40.0, "Expected value between sample densities, got {}", v);
}

#[test]
fn test_symmetric_triangle_centroid() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [4.0, 4.0]));
    dtfe.set_samples(&[0.0, 0.0, 4.0, 0.0, 2.0, 4.0]);
    dtfe.calculate().unwrap();

    // equal weights over one triangle of area 8
    let v = dtfe.natural_neighbor_interpolation(Point2::new(2.0, 4.0 / 3.0)).unwrap();
    assert_relative_eq!(v, 1.0 / 8.0, max_relative = 1e-9);
}

#[test]
fn test_query_classification() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [4.0, 4.0]));
    dtfe.set_samples(&jittered_lattice(5, 1.0));
    dtfe.calculate().unwrap();

    assert_eq!(dtfe.point_density(Point2::new(-1.0, 2.0)).unwrap(), PointDensity::OutsideHull);
    assert_eq!(dtfe.point_density(Point2::new(100.0, 100.0)).unwrap(), PointDensity::OutsideHull);

    let on_sample = dtfe.samples()[12];
    assert_eq!(dtfe.point_density(on_sample).unwrap(), PointDensity::Undefined);
    assert!(matches!(
        dtfe.natural_neighbor_interpolation(on_sample),
        Err(DtfeError::InvalidVertex { .. })
    ));

    match dtfe.point_density(Point2::new(2.3, 1.7)).unwrap() {
        PointDensity::Value(v) => assert!(v.is_finite() && v > 0.0),
        other => panic!("Expected a density, got {:?}", other),
    }
}

#[test]
fn test_uniform_lattice_density() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [18.0, 14.0]));
    dtfe.set_samples(&triangular_lattice(9, 2.0));
    dtfe.calculate().unwrap();

    let expected = lattice_density(2.0);
    let center = 4 * 9 + 4;
    assert_relative_eq!(dtfe.density(center).unwrap(), expected, max_relative = 1e-9);

    // interior queries see only interior samples of the same density
    for q in [Point2::new(8.3, 7.5), Point2::new(7.1, 6.2), Point2::new(9.0, 8.0)] {
        let v = dtfe.point_density(q).unwrap().value().unwrap();
        assert_relative_eq!(v, expected, max_relative = 1e-9);
    }
}

#[test]
fn test_interpolants_agree_on_uniform_field() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [18.0, 14.0]));
    dtfe.set_samples(&triangular_lattice(9, 2.0));
    dtfe.calculate().unwrap();

    let expected = lattice_density(2.0);
    let q = Point2::new(8.4, 7.3);
    for kind in Interpolation::ALL {
        let v = dtfe.interpolate(q, &kind).unwrap().value().unwrap();
        assert_relative_eq!(v, expected, max_relative = 1e-9);
    }

    let a = dtfe.interpolate(q, &Interpolation::FirstOrder).unwrap().value().unwrap();
    let b = dtfe.interpolate(q, &Interpolation::Barycentric).unwrap().value().unwrap();
    assert_relative_eq!(a, b, epsilon = 1e-12);
}

#[test]
fn test_density_grid() {
    let mut dtfe = Dtfe::new(BoundingBox::new([-1.0, -1.0], [5.0, 5.0]));
    dtfe.set_samples(&jittered_lattice(5, 1.0));
    dtfe.calculate().unwrap();

    let grid = dtfe.density_grid(6, 6, &Interpolation::NaturalNeighbor).unwrap();
    assert_eq!(grid.len(), 36);
    // the outer ring of raster cells lies outside the lattice
    assert!(grid[0].is_outside());
    assert!(grid[35].is_outside());
    assert!(grid[2 * 6 + 2].value().is_some());
}

#[test]
fn test_duplicate_samples() {
    let samples = [0.0, 0.0, 1.0, 0.0, 0.5, 1.0, 1.0, 0.0];

    let mut strict = Dtfe::new(BoundingBox::new([0.0, 0.0], [1.0, 1.0]));
    strict.set_samples(&samples);
    assert!(matches!(strict.calculate(), Err(DtfeError::DuplicateVertex { .. })));

    let config = TriangulationConfig::default().with_policy(InvalidVertexPolicy::Drop);
    let mut lenient = Dtfe::with_config(BoundingBox::new([0.0, 0.0], [1.0, 1.0]), config);
    lenient.set_samples(&samples);
    lenient.calculate().unwrap();
    assert_eq!(lenient.count_samples(), 4);
    let defined = lenient.densities().iter().filter(|d| d.is_some()).count();
    assert_eq!(defined, 3);
}

#[test]
fn test_sample_cells() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [100.0, 100.0]));
    dtfe.random_samples(200);
    dtfe.calculate().unwrap();

    for i in 0..dtfe.count_samples() {
        let sample = dtfe.samples()[i];
        let cell = dtfe.voronoi(i).unwrap();
        assert_eq!(cell.polygon().len(), cell.neighbors().len());
        assert!(cell.area() > 0.0);
        assert!(cell.polygon().contains(sample), "Cell {} does not contain its sample", i);
    }
}

#[test]
fn test_relative_density_range() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [100.0, 100.0]));
    dtfe.random_samples(100);
    dtfe.calculate().unwrap();

    let max = dtfe.max_density();
    for d in dtfe.densities().iter().flatten() {
        for scale in [DensityScale::Linear, DensityScale::Log] {
            let r = dtfe.relative_density(*d, scale);
            assert!((-1.0..=1.0).contains(&r));
        }
    }
    assert_relative_eq!(dtfe.relative_density(max, DensityScale::Linear), 1.0);
}

#[test]
fn test_linear_ramp_gives_one_straight_isoline() {
    let mut dtfe = Dtfe::new(BoundingBox::new([0.0, 0.0], [4.0, 4.0]));
    dtfe.set_samples(&jittered_lattice(5, 1.0));
    let ramp = dtfe.samples().iter().map(|p| Some(1.0 + p.x)).collect();
    dtfe.set_densities(ramp);
    dtfe.calculate().unwrap();

    let level = 0.5 * dtfe.max_density() - 1.0;
    let lines = dtfe.isolines(0.5, DensityScale::Linear).unwrap();
    assert_eq!(lines.len(), 1, "Expected a single isoline, got {:?}", lines);

    // at least one segment per triangle in the column of squares it crosses
    let line = &lines[0];
    assert!(line.len() >= 9);
    for p in line {
        assert_relative_eq!(p.x, level, epsilon = 1e-9);
    }
    let last = line[line.len() - 1];
    let (lo, hi) = (line[0].y.min(last.y), line[0].y.max(last.y));
    assert!(lo < 1e-3 && hi > 4.0 - 1e-3, "Isoline should run across the hull, got ends {} and {}", lo, hi);
}

#[test]
fn test_difference_of_scaled_weights() {
    let samples = jittered_lattice(4, 1.0);
    let mut heavy = Dtfe::new(BoundingBox::new([0.0, 0.0], [3.0, 3.0]));
    heavy.set_samples(&samples);
    heavy.set_weights(vec![2.0; 16]);
    heavy.calculate().unwrap();
    let mut light = Dtfe::new(BoundingBox::new([0.0, 0.0], [3.0, 3.0]));
    light.set_samples(&samples);
    light.calculate().unwrap();

    let diff = Dtfe::difference(&mut heavy, &mut light, &Interpolation::NaturalNeighbor).unwrap();
    assert_eq!(diff.count_samples(), 16);
    for i in 0..16 {
        assert_relative_eq!(diff.density(i).unwrap(), light.density(i).unwrap(), max_relative = 1e-12);
    }
}

#[test]
fn test_difference_interpolates_unshared_samples() {
    let square = [0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0];
    let bounds = BoundingBox::new([0.0, 0.0], [3.0, 2.0]);

    let mut a = Dtfe::new(bounds);
    a.set_samples(&[&square[..], &[1.0, 0.8, 3.0, 1.0][..]].concat());
    a.calculate().unwrap();
    let mut b = Dtfe::new(bounds);
    b.set_samples(&[&square[..], &[0.6, 1.3][..]].concat());
    b.calculate().unwrap();

    let diff = Dtfe::difference(&mut a, &mut b, &Interpolation::NaturalNeighbor).unwrap();
    // a's samples in order, then the one only b has
    assert_eq!(diff.count_samples(), 7);
    assert_eq!(diff.samples()[6], Point2::new(0.6, 1.3));

    for i in 0..4 {
        assert_relative_eq!(diff.density(i).unwrap(), a.density(i).unwrap() - b.density(i).unwrap());
    }
    let b_at = b.natural_neighbor_interpolation(Point2::new(1.0, 0.8)).unwrap();
    assert_relative_eq!(diff.density(4).unwrap(), a.density(4).unwrap() - b_at);
    // outside b's hull b contributes nothing
    assert_relative_eq!(diff.density(5).unwrap(), a.density(5).unwrap());
    let a_at = a.natural_neighbor_interpolation(Point2::new(0.6, 1.3)).unwrap();
    assert_relative_eq!(diff.density(6).unwrap(), a_at - b.density(4).unwrap());
}
