use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use surf_mesh::geometry::vector::Point3;
use surf_mesh::spatial::PointTree;

fn cloud(n: usize, seed: u64) -> Vec<Point3> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.r#gen::<[f64; 3]>()).collect()
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_tree");
    let queries = cloud(256, 7);

    for &n in &[1_000usize, 50_000] {
        let pts = cloud(n, 1);

        group.bench_with_input(BenchmarkId::new("build", n), &n, |b, _| {
            b.iter(|| black_box(PointTree::build(&pts)));
        });

        let tree = PointTree::build(&pts);
        group.bench_with_input(BenchmarkId::new("nearest", n), &n, |b, _| {
            b.iter(|| {
                for &q in &queries {
                    black_box(tree.nearest(q));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("neighborhood", n), &n, |b, _| {
            let mut out = Vec::new();
            b.iter(|| {
                for &q in &queries {
                    out.clear();
                    black_box(tree.neighborhood(q, 16, 64, &mut out));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("repldup", n), &n, |b, _| {
            b.iter(|| black_box(tree.repldup(1e-4)));
        });
    }

    group.finish();
}

fn bench_incremental(c: &mut Criterion) {
    let pts = cloud(10_000, 3);
    c.bench_function("point_tree/insert_erase", |b| {
        b.iter(|| {
            let mut tree = PointTree::build(Vec::<Point3>::new());
            for &p in &pts {
                tree.insert(p);
            }
            for i in (0..pts.len() as u32).step_by(2) {
                tree.erase(i);
            }
            black_box(tree.len());
        });
    });
}

criterion_group!(benches, bench_queries, bench_incremental);
criterion_main!(benches);
