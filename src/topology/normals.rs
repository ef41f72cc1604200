//! Per-vertex normals from incident faces.

use super::mesh::MeshTopology;
use crate::geometry::vector::{Point3, add, interior_angle, normalize_or_zero, scale, triangle_normal};
use crate::mesh_error::SurfMeshError;

impl MeshTopology {
    /// Recompute every vertex normal as the angle-weighted mean of the unit
    /// normals of its incident faces.
    ///
    /// Vertices without faces, or whose contributions cancel exactly, get
    /// the zero vector.
    pub fn recompute_normals(&mut self) -> Result<(), SurfMeshError> {
        self.ensure_current()?;
        let mut normals = vec![[0.0; 3]; self.vertices.len()];
        for face in &self.faces {
            let [a, b, c] = face.vertices().map(|v| self.vertices[v as usize]);
            let unit = normalize_or_zero(triangle_normal(a, b, c));
            let corners: [(usize, Point3, Point3, Point3); 3] = [
                (face.vertices()[0] as usize, a, b, c),
                (face.vertices()[1] as usize, b, c, a),
                (face.vertices()[2] as usize, c, a, b),
            ];
            for (v, apex, p, q) in corners {
                normals[v] = add(normals[v], scale(unit, interior_angle(apex, p, q)));
            }
        }
        for n in &mut normals {
            *n = normalize_or_zero(*n);
        }
        self.normals = normals;
        self.touch_surgical();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_fan_points_up() {
        let mut mesh = MeshTopology::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            [[0, 1, 2], [0, 2, 3]],
        );
        mesh.recompute_normals().unwrap();
        for n in mesh.normals() {
            assert!((n[2] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn isolated_vertex_gets_zero_normal() {
        let mut mesh = MeshTopology::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            [[0, 1, 2]],
        );
        let lone = mesh.push_vertex([3.0, 3.0, 3.0]);
        mesh.recompute_normals().unwrap();
        assert_eq!(mesh.normals()[lone as usize], [0.0; 3]);
    }

    #[test]
    fn ridge_normal_bisects_the_fold() {
        // two unit right triangles folded 90 degrees along the x axis
        let mut mesh = MeshTopology::from_parts(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            [[0, 1, 2], [1, 0, 3]],
        );
        mesh.recompute_normals().unwrap();
        let n = mesh.normals()[1];
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((n[0]).abs() < 1e-12);
        assert!((n[1] - h).abs() < 1e-12 && (n[2] - h).abs() < 1e-12);
    }

    #[test]
    fn stale_maps_are_rejected() {
        let mut mesh = MeshTopology::new();
        mesh.push_face_raw([0, 1, 2], 0);
        assert!(matches!(
            mesh.recompute_normals(),
            Err(SurfMeshError::StaleAdjacency { .. })
        ));
    }
}
