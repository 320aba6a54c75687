//! Sequential vs parallel throughput of the batched rotation mappings.
//!
//! ## Usage
//!
//! ```bash
//! cargo bench --bench mappings_benchmark
//! ```

use apex_rotations::{mappings, random_rotmat, random_unitquat, Batch, Execution, MappingConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nalgebra::Matrix3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use std::hint::black_box;

const BATCH_SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn configs() -> [(&'static str, MappingConfig); 2] {
    [
        (
            "sequential",
            MappingConfig::default().with_execution(Execution::Sequential),
        ),
        (
            "parallel",
            MappingConfig::default().with_execution(Execution::Parallel),
        ),
    ]
}

fn bench_unitquat_rotmat(c: &mut Criterion) {
    let mut group = c.benchmark_group("unitquat_rotmat_roundtrip");
    let mut rng = StdRng::seed_from_u64(666);

    for batch_size in BATCH_SIZES.iter() {
        let q = random_unitquat::<f64, _>(*batch_size, &mut rng);
        group.throughput(Throughput::Elements(*batch_size as u64));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, batch_size), &q, |b, q| {
                b.iter(|| {
                    let r = mappings::unitquat_to_rotmat(black_box(q), &config);
                    black_box(mappings::rotmat_to_unitquat(&r, &config))
                })
            });
        }
    }

    group.finish();
}

fn bench_rotvec_rotmat(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotvec_rotmat_roundtrip");
    let mut rng = StdRng::seed_from_u64(42);

    for batch_size in BATCH_SIZES.iter() {
        let rotvecs = mappings::rotmat_to_rotvec(
            &random_rotmat::<f64, _>(*batch_size, &mut rng),
            &MappingConfig::default(),
        );
        group.throughput(Throughput::Elements(*batch_size as u64));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, batch_size), &rotvecs, |b, v| {
                b.iter(|| {
                    let r = mappings::rotvec_to_rotmat(black_box(v), &config);
                    black_box(mappings::rotmat_to_rotvec(&r, &config))
                })
            });
        }
    }

    group.finish();
}

fn bench_special_procrustes(c: &mut Criterion) {
    let mut group = c.benchmark_group("special_procrustes");
    let mut rng = StdRng::seed_from_u64(7);

    for batch_size in BATCH_SIZES.iter() {
        let matrices = Batch::from_items(
            (0..*batch_size)
                .map(|_| Matrix3::<f64>::from_fn(|_, _| StandardNormal.sample(&mut rng)))
                .collect(),
        );
        group.throughput(Throughput::Elements(*batch_size as u64));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, batch_size), &matrices, |b, m| {
                b.iter(|| black_box(mappings::special_procrustes(black_box(m), &config)))
            });
        }
    }

    group.finish();
}

fn bench_symmatrixvec(c: &mut Criterion) {
    let mut group = c.benchmark_group("symmatrixvec_to_unitquat");
    let mut rng = StdRng::seed_from_u64(11);

    for batch_size in BATCH_SIZES.iter() {
        let vectors = Batch::from_items(
            (0..*batch_size)
                .map(|_| {
                    apex_rotations::Symmatrixvec::<f64>::from_fn(|_, _| {
                        StandardNormal.sample(&mut rng)
                    })
                })
                .collect(),
        );
        group.throughput(Throughput::Elements(*batch_size as u64));

        for (name, config) in configs() {
            group.bench_with_input(BenchmarkId::new(name, batch_size), &vectors, |b, x| {
                b.iter(|| black_box(mappings::symmatrixvec_to_unitquat(black_box(x), &config)))
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_unitquat_rotmat,
    bench_rotvec_rotmat,
    bench_special_procrustes,
    bench_symmatrixvec
);
criterion_main!(benches);
