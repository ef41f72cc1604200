//! Consistency checks for [`MeshTopology`].

use serde::{Deserialize, Serialize};

use super::adjacency::AdjacencyMaps;
use super::entity::Edge;
use super::mesh::MeshTopology;
use crate::debug_invariants::{DebugInvariants, violation};
use crate::mesh_error::SurfMeshError;

/// Behavior for non-manifold detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonManifoldHandling {
    /// Skip non-manifold detection.
    Ignore,
    /// Log a warning on non-manifold edges.
    Warn,
    /// Return an error on non-manifold edges.
    Error,
}

/// Optional validation toggles for mesh checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// How to handle edges with more than two incident faces.
    pub non_manifold: NonManifoldHandling,
    /// Reject faces whose corners are collinear.
    pub check_geometry: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            non_manifold: NonManifoldHandling::Warn,
            check_geometry: true,
        }
    }
}

impl ValidationOptions {
    /// Enable all checks and fail on non-manifold edges.
    pub fn strict() -> Self {
        Self {
            non_manifold: NonManifoldHandling::Error,
            check_geometry: true,
        }
    }
}

impl MeshTopology {
    /// Walk the whole mesh and report the first broken invariant.
    ///
    /// Checks normal count, canonical sorted distinct faces with in-range
    /// vertices and the mesh token, edges equal to the face-induced set, and,
    /// when the maps claim to be current, that they mirror faces and edges.
    pub fn validate_with(&self, options: &ValidationOptions) -> Result<(), SurfMeshError> {
        let n = self.vertices.len();
        if !self.normals.is_empty() && self.normals.len() != n {
            return Err(SurfMeshError::LengthMismatch {
                what: "normals",
                expected: n,
                found: self.normals.len(),
            });
        }

        for w in self.faces.windows(2) {
            if w[0] >= w[1] {
                return Err(violation(format!(
                    "faces {:?} and {:?} are not strictly ascending",
                    w[0].vertices(),
                    w[1].vertices()
                )));
            }
        }
        for f in &self.faces {
            let v = f.vertices();
            if let Some(&bad) = v.iter().find(|&&x| x as usize >= n) {
                return Err(SurfMeshError::VertexOutOfRange { vertex: bad, len: n });
            }
            if f.is_degenerate() {
                return Err(violation(format!("face {v:?} repeats a vertex")));
            }
            if v[0] > v[1] || v[0] > v[2] {
                return Err(violation(format!("face {v:?} is not canonically rotated")));
            }
            if f.token() != self.token {
                return Err(violation(format!(
                    "face {v:?} belongs to {} instead of {}",
                    f.token(),
                    self.token
                )));
            }
            if options.check_geometry && self.is_flat(f) {
                return Err(violation(format!("face {v:?} has collinear corners")));
            }
        }

        let mut induced: Vec<Edge> = self.faces.iter().flat_map(|f| f.edges()).collect();
        induced.sort_unstable();
        induced.dedup();
        if induced != self.edges {
            return Err(violation(format!(
                "edge set has {} edges, faces induce {}",
                self.edges.len(),
                induced.len()
            )));
        }

        if self.is_current() {
            let rebuilt = AdjacencyMaps::build(n, &self.faces, self.adjacency.generation);
            if rebuilt != self.adjacency {
                return Err(violation("adjacency maps do not mirror the faces"));
            }
            self.check_manifold(options.non_manifold)?;
        }
        Ok(())
    }

    fn check_manifold(&self, handling: NonManifoldHandling) -> Result<(), SurfMeshError> {
        if handling == NonManifoldHandling::Ignore {
            return Ok(());
        }
        for e in &self.edges {
            let count = self.adjacency.edge_faces(e).map_or(0, <[_]>::len);
            if count > 2 {
                match handling {
                    NonManifoldHandling::Warn => {
                        log::warn!(
                            "Non-manifold edge detected: ({}, {}) incident_faces={count}",
                            e.src(),
                            e.dst()
                        );
                    }
                    NonManifoldHandling::Error => {
                        return Err(SurfMeshError::NonManifoldEdge {
                            src: e.src(),
                            dst: e.dst(),
                            faces: count,
                        });
                    }
                    NonManifoldHandling::Ignore => {}
                }
            }
        }
        Ok(())
    }
}

impl DebugInvariants for MeshTopology {
    const KIND: &'static str = "MeshTopology";

    fn validate_invariants(&self) -> Result<(), SurfMeshError> {
        self.validate_with(&ValidationOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tent() -> MeshTopology {
        // three faces hinged on edge (0, 1)
        MeshTopology::from_parts(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 1.0, 0.0],
                [0.5, -1.0, 0.0],
                [0.5, 0.0, 1.0],
            ],
            [[0, 1, 2], [1, 0, 3], [0, 1, 4]],
        )
    }

    #[test]
    fn well_formed_mesh_passes() {
        let mesh = tent();
        assert!(mesh.validate_invariants().is_ok());
        mesh.debug_assert_invariants();
    }

    #[test]
    fn strict_mode_rejects_non_manifold() {
        let mesh = tent();
        assert_eq!(
            mesh.validate_with(&ValidationOptions::strict()),
            Err(SurfMeshError::NonManifoldEdge {
                src: 0,
                dst: 1,
                faces: 3
            })
        );
    }

    #[test]
    fn corrupted_edges_are_reported() {
        let mut mesh = tent();
        mesh.edges.pop();
        assert!(matches!(
            mesh.validate_invariants(),
            Err(SurfMeshError::InvariantViolation(_))
        ));
    }

    #[test]
    fn corrupted_maps_are_reported() {
        let mut mesh = tent();
        mesh.adjacency.vertex_faces[2].clear();
        assert!(matches!(
            mesh.validate_invariants(),
            Err(SurfMeshError::InvariantViolation(_))
        ));
    }

    #[test]
    fn stale_maps_are_not_compared() {
        let mut mesh = tent();
        mesh.push_face_raw([2, 3, 4], 0);
        // edges were not derived for the raw face
        assert!(mesh.validate_invariants().is_err());
        mesh.rebuild_adjacency();
        assert!(mesh.validate_invariants().is_ok());
        assert!(mesh.has_face([2, 3, 4]));
        assert!(!mesh.has_face([2, 4, 3]));
    }

    #[test]
    fn options_roundtrip_through_json() {
        let opts = ValidationOptions::strict();
        let s = serde_json::to_string(&opts).unwrap();
        assert_eq!(serde_json::from_str::<ValidationOptions>(&s).unwrap(), opts);
    }
}
