//! Boundary classification utilities.
//!
//! A vertex is on the boundary when one of its edges has fewer than two
//! incident faces; vertices without any edge are reported separately.

use crate::mesh_error::SurfMeshError;
use crate::topology::entity::VertexId;
use crate::topology::mesh::MeshTopology;

/// Classified vertex sets, each ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryClassification {
    pub boundary: Vec<VertexId>,
    pub interior: Vec<VertexId>,
    pub isolated: Vec<VertexId>,
}

impl BoundaryClassification {
    /// `true` for a mesh without boundary edges.
    pub fn is_closed(&self) -> bool {
        self.boundary.is_empty()
    }
}

/// Classify every vertex of `mesh` as boundary, interior or isolated.
pub fn classify_vertices(mesh: &MeshTopology) -> Result<BoundaryClassification, SurfMeshError> {
    let maps = mesh.adjacency()?;
    let mut out = BoundaryClassification::default();
    for v in 0..mesh.n_vertices() as VertexId {
        let edges = maps.vertex_edges(v);
        if edges.is_empty() {
            out.isolated.push(v);
        } else if edges
            .iter()
            .any(|e| maps.edge_faces(e).map_or(0, <[_]>::len) < 2)
        {
            out.boundary.push(v);
        } else {
            out.interior.push(v);
        }
    }
    log::debug!(
        "classified {} boundary, {} interior, {} isolated vertices",
        out.boundary.len(),
        out.interior.len(),
        out.isolated.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::meshgen::{MeshGenOptions, sphere_shell, structured_grid};

    #[test]
    fn grid_has_one_interior_vertex() {
        let mut mesh = structured_grid(2, 2, [0.0; 2], [2.0; 2], MeshGenOptions::default()).unwrap();
        let lone = mesh.push_vertex([5.0, 5.0, 5.0]);
        let classes = classify_vertices(&mesh).unwrap();
        assert_eq!(classes.interior, vec![4]);
        assert_eq!(classes.boundary.len(), 8);
        assert_eq!(classes.isolated, vec![lone]);
        assert!(!classes.is_closed());
    }

    #[test]
    fn sphere_is_closed() {
        let mesh = sphere_shell(1.0, 4, 6, MeshGenOptions::default()).unwrap();
        let classes = classify_vertices(&mesh).unwrap();
        assert!(classes.is_closed());
        assert_eq!(classes.interior.len(), mesh.n_vertices());
    }

    #[test]
    fn stale_mesh_is_rejected() {
        let mut mesh = structured_grid(1, 1, [0.0; 2], [1.0; 2], MeshGenOptions::default()).unwrap();
        mesh.push_face_raw([0, 1, 3], 0);
        assert!(classify_vertices(&mesh).is_err());
    }
}
