use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use surf_mesh::algs::meshgen::{MeshGenOptions, sphere_shell, structured_grid};
use surf_mesh::topology::MeshTopology;

fn grid(n: usize) -> MeshTopology {
    structured_grid(n, n, [0.0; 2], [1.0; 2], MeshGenOptions::default()).expect("grid")
}

fn bench_bulk(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_bulk");

    for &n in &[32usize, 128] {
        let mesh = grid(n);

        group.bench_with_input(BenchmarkId::new("fixate", n), &n, |b, _| {
            b.iter(|| {
                let mut m = mesh.clone();
                m.fixate();
                black_box(m.n_edges());
            });
        });

        group.bench_with_input(BenchmarkId::new("gradient_operator", n), &n, |b, _| {
            b.iter(|| black_box(mesh.gradient_operator().expect("current")));
        });

        group.bench_with_input(BenchmarkId::new("recompute_normals", n), &n, |b, _| {
            let mut m = mesh.clone();
            b.iter(|| {
                m.recompute_normals().expect("current");
                black_box(m.normals().len());
            });
        });
    }

    group.bench_function("sphere_shell_unify", |b| {
        b.iter(|| black_box(sphere_shell(1.0, 64, 128, MeshGenOptions::default()).expect("sphere")));
    });

    group.finish();
}

fn bench_edits(c: &mut Criterion) {
    let mesh = grid(64);
    let edges: Vec<[u32; 2]> = mesh
        .edges()
        .iter()
        .step_by(7)
        .map(|e| e.vertices())
        .collect();

    c.bench_function("mesh_edits/split_edge", |b| {
        b.iter(|| {
            let mut m = mesh.clone();
            for &[a, v] in &edges {
                black_box(m.split_edge(a, v).expect("edge"));
            }
        });
    });
}

criterion_group!(benches, bench_bulk, bench_edits);
criterion_main!(benches);
