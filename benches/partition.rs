use cmap::map::{CombinatorialMap, OrbitKind};
use cmap::primitive;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

const SIDES: usize = 4096;

fn prism() -> CombinatorialMap {
    primitive::prism(SIDES).unwrap().map
}

fn vertices(map: CombinatorialMap) {
    let vertices = map.partition(OrbitKind::Vertex);
    assert_eq!(2 * SIDES, vertices.len());
}

fn euler(map: CombinatorialMap) {
    assert_eq!(2, map.euler());
}

fn benchmark(criterion: &mut Criterion) {
    criterion.bench_function("vertices", move |bencher| {
        bencher.iter_batched(prism, vertices, BatchSize::LargeInput)
    });
    criterion.bench_function("euler", move |bencher| {
        bencher.iter_batched(prism, euler, BatchSize::LargeInput)
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
