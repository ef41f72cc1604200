#![allow(dead_code)]
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use surf_mesh::algs::meshgen::{MeshGenOptions, structured_grid, triangulate_grid};
use surf_mesh::geometry::vector::{Point3, distance_sq};
use surf_mesh::topology::MeshTopology;

/// `n` uniformly random points in the unit cube, reproducible from `seed`.
pub fn random_points(n: usize, seed: u64) -> Vec<Point3> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..n).map(|_| rng.r#gen::<[f64; 3]>()).collect()
}

/// Linear-scan nearest point; ties go to the smaller index.
pub fn brute_nearest(pts: &[Point3], q: Point3, skip: Option<u32>) -> Option<u32> {
    let mut best: Option<(f64, u32)> = None;
    for (i, &p) in pts.iter().enumerate() {
        if Some(i as u32) == skip {
            continue;
        }
        let d = distance_sq(p, q);
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, i as u32));
        }
    }
    best.map(|(_, i)| i)
}

/// Linear-scan radius query, ascending.
pub fn brute_find(pts: &[Point3], q: Point3, r: f64) -> Vec<u32> {
    (0..pts.len() as u32)
        .filter(|&i| distance_sq(pts[i as usize], q).sqrt() < r)
        .collect()
}

/// `n`×`n` unit-spacing point grid, triangulated.
pub fn unit_grid(n: usize) -> MeshTopology {
    let rows: Vec<Vec<Point3>> = (0..n)
        .map(|j| (0..n).map(|i| [i as f64, j as f64, 0.0]).collect())
        .collect();
    triangulate_grid(&rows, MeshGenOptions::default()).unwrap()
}

/// Structured grid over `[0, nx] x [0, ny]` with unit cells.
pub fn cell_grid(nx: usize, ny: usize) -> MeshTopology {
    structured_grid(nx, ny, [0.0; 2], [nx as f64, ny as f64], MeshGenOptions::default()).unwrap()
}

/// Number of edges with fewer than two faces.
pub fn boundary_edge_count(mesh: &MeshTopology) -> usize {
    mesh.boundary_edges().unwrap().len()
}

/// Assert two floats agree to `tol`.
pub fn assert_close(got: f64, want: f64, tol: f64) {
    assert!((got - want).abs() <= tol, "got {got}, want {want} (tol {tol})");
}
