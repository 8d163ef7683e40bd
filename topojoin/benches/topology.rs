//! Benchmarks pour la construction de topologies

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use topojoin::{topology, Options};

/// Grille de `n x n` carrés jointifs: chaque arête intérieure est partagée
fn square_grid(n: usize) -> GeoJson {
    let mut features = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (i as f64, j as f64);
            let ring = vec![
                vec![x, y],
                vec![x + 1.0, y],
                vec![x + 1.0, y + 1.0],
                vec![x, y + 1.0],
                vec![x, y],
            ];
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                id: None,
                properties: None,
                foreign_members: None,
            });
        }
    }
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

fn bench_square_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("square_grid");

    for n in [10usize, 50, 100] {
        let input = square_grid(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| {
                let options = Options::new().quantization(10_000);
                let result = topology([("grid".to_string(), input.clone())], &options).unwrap();
                black_box(result.arcs.len())
            })
        });
    }

    group.finish();
}

fn bench_passthrough(c: &mut Criterion) {
    let input = square_grid(50);

    let mut group = c.benchmark_group("passthrough");
    group.sample_size(20);
    group.bench_function("grid_50", |b| {
        b.iter(|| {
            let result = topology([("grid".to_string(), black_box(input.clone()))], &Options::new())
                .unwrap();
            black_box(result.arcs.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_square_grid, bench_passthrough);
criterion_main!(benches);
