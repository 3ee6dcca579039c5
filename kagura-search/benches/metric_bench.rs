//! Distance Kernel Benchmarks
//!
//! Run with: cargo bench --package kagura-search

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::Rng;

fn random_vec(dim: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_cosine(c: &mut Criterion) {
    let dims = [64, 384, 768, 1536];

    let mut group = c.benchmark_group("cosine");

    for dim in dims {
        let a = random_vec(dim);
        let b = random_vec(dim);

        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("dim_{}", dim), |bencher| {
            bencher.iter(|| black_box(kagura_search::cosine(black_box(&a), black_box(&b))))
        });
    }

    group.finish();
}

fn bench_dot(c: &mut Criterion) {
    let dims = [64, 384, 768, 1536];

    let mut group = c.benchmark_group("dot");

    for dim in dims {
        let a = random_vec(dim);
        let b = random_vec(dim);

        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("dim_{}", dim), |bencher| {
            bencher.iter(|| black_box(kagura_search::dot(black_box(&a), black_box(&b))))
        });
    }

    group.finish();
}

fn bench_l2(c: &mut Criterion) {
    let dims = [64, 384, 768, 1536];

    let mut group = c.benchmark_group("l2");

    for dim in dims {
        let a = random_vec(dim);
        let b = random_vec(dim);

        group.throughput(Throughput::Elements(1));
        group.bench_function(format!("dim_{}", dim), |bencher| {
            bencher.iter(|| black_box(kagura_search::l2(black_box(&a), black_box(&b))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cosine, bench_dot, bench_l2);
criterion_main!(benches);
