//! Triangulation of structured point grids.

use crate::geometry::vector::Point3;
use crate::mesh_error::SurfMeshError;
use crate::topology::edit::UnifyOptions;
use crate::topology::entity::{MeshToken, VertexId};
use crate::topology::mesh::MeshTopology;

/// Optional metadata for mesh generators.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeshGenOptions {
    /// Token of the generated mesh.
    pub token: MeshToken,
    /// Tag given to every generated face.
    pub tag: i32,
}

fn invalid_geometry(message: impl Into<String>) -> SurfMeshError {
    SurfMeshError::InvalidGeometry(message.into())
}

/// Triangulate a structured grid given as rows of points and [`fixate`](MeshTopology::fixate) it.
///
/// Vertex `(i, j)` is `rows[j][i]`. Every cell `v0 = (i, j)`, `v1 = (i+1, j)`,
/// `v2 = (i+1, j+1)`, `v3 = (i, j+1)` becomes the faces `(v0, v1, v2)` and
/// `(v0, v2, v3)`. Cells with coincident corners (poles, collapsed rows)
/// lose their degenerate halves, and vertices left without faces are
/// compacted away. Coincident grid points are *not* welded; see
/// [`MeshTopology::unify`].
pub fn triangulate_grid(
    rows: &[Vec<Point3>],
    options: MeshGenOptions,
) -> Result<MeshTopology, SurfMeshError> {
    if rows.len() < 2 {
        return Err(invalid_geometry("grid needs at least two rows"));
    }
    let width = rows[0].len();
    if width < 2 {
        return Err(invalid_geometry("grid rows need at least two points"));
    }
    for (j, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(invalid_geometry(format!(
                "row {j} has {} points, expected {width}",
                row.len()
            )));
        }
        if let Some(i) = row.iter().position(|p| p.iter().any(|x| !x.is_finite())) {
            return Err(invalid_geometry(format!("point ({i}, {j}) is not finite")));
        }
    }

    let mut mesh = MeshTopology::with_token(options.token);
    for row in rows {
        for &p in row {
            mesh.push_vertex(p);
        }
    }
    let stride = width as VertexId;
    for j in 0..rows.len() as VertexId - 1 {
        for i in 0..stride - 1 {
            let v0 = j * stride + i;
            let v1 = v0 + 1;
            let v3 = v0 + stride;
            let v2 = v3 + 1;
            mesh.push_face_raw([v0, v1, v2], options.tag);
            mesh.push_face_raw([v0, v2, v3], options.tag);
        }
    }
    mesh.fixate();
    Ok(mesh)
}

/// Structured triangle mesh of the rectangle `[min, max]` in the `z = 0`
/// plane with `nx`×`ny` cells.
pub fn structured_grid(
    nx: usize,
    ny: usize,
    min: [f64; 2],
    max: [f64; 2],
    options: MeshGenOptions,
) -> Result<MeshTopology, SurfMeshError> {
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry("nx and ny must be positive"));
    }
    if !(max[0] > min[0] && max[1] > min[1]) {
        return Err(invalid_geometry("max must exceed min along both axes"));
    }
    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let rows: Vec<Vec<Point3>> = (0..=ny)
        .map(|j| {
            let y = min[1] + dy * j as f64;
            (0..=nx).map(|i| [min[0] + dx * i as f64, y, 0.0]).collect()
        })
        .collect();
    triangulate_grid(&rows, options)
}

/// Closed, outward-wound sphere of `radius` from a latitude/longitude grid
/// with `n_lat` bands and `n_lon` sectors.
///
/// The grid repeats the seam column and collapses the pole rows, so the
/// triangulated result is welded with [`MeshTopology::unify`].
pub fn sphere_shell(
    radius: f64,
    n_lat: usize,
    n_lon: usize,
    options: MeshGenOptions,
) -> Result<MeshTopology, SurfMeshError> {
    if !(radius > 0.0) {
        return Err(invalid_geometry("radius must be positive"));
    }
    if n_lat < 2 || n_lon < 3 {
        return Err(invalid_geometry(
            "sphere shell requires n_lat >= 2 and n_lon >= 3",
        ));
    }
    let rows = sphere_rows(radius, n_lat, n_lon);
    let mut mesh = triangulate_grid(&rows, options)?;
    mesh.unify_with(&UnifyOptions {
        threshold: radius * 1e-9,
        ..UnifyOptions::default()
    });
    Ok(mesh)
}

/// Unwelded latitude/longitude rows from the south to the north pole.
pub(crate) fn sphere_rows(radius: f64, n_lat: usize, n_lon: usize) -> Vec<Vec<Point3>> {
    use std::f64::consts::{PI, TAU};
    (0..=n_lat)
        .map(|j| {
            if j == 0 {
                return vec![[0.0, 0.0, -radius]; n_lon + 1];
            }
            if j == n_lat {
                return vec![[0.0, 0.0, radius]; n_lon + 1];
            }
            let theta = PI * (1.0 - j as f64 / n_lat as f64);
            let (sin_t, cos_t) = theta.sin_cos();
            (0..=n_lon)
                .map(|i| {
                    let phi = TAU * i as f64 / n_lon as f64;
                    [
                        radius * sin_t * phi.cos(),
                        radius * sin_t * phi.sin(),
                        radius * cos_t,
                    ]
                })
                .collect()
        })
        .collect()
}
