use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use vtu_probe::{interpolate, DataArray, Dim, Neighbors, Point, ProbeOptions};

fn probes(n: usize) -> Vec<Point> {
    let coords: Array2<f64> = Array2::random((n, 3), Uniform::new(1., 9.));
    coords
        .outer_iter()
        .map(|row| [row[0], row[1], row[2]])
        .collect()
}

fn neighbors_bench(c: &mut Criterion) {
    let points: Array2<f64> = Array2::random((50_000, 3), Uniform::new(0., 10.));
    let field = DataArray::scalar("f", points.column(0).to_vec());
    let probes = probes(50);
    let options = ProbeOptions::default();

    c.bench_function("search 50 probes in 50k nodes", |b| {
        b.iter(|| Neighbors::search(black_box(points.view()), &probes, 20, Dim::Three))
    });

    let neighbors = Neighbors::search(points.view(), &probes, 20, Dim::Three);

    c.bench_function("linear interpolation of 50 probes", |b| {
        b.iter(|| interpolate(&neighbors, points.view(), black_box(&probes), &field, &options).unwrap())
    });
}

criterion_group!(benches, neighbors_bench);
criterion_main!(benches);
