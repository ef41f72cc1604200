//! Local and global topology edits: edge split, edge collapse, vertex welding.

use serde::{Deserialize, Serialize};

use super::cache::InvalidateCache;
use super::entity::{Face, VertexId};
use super::mesh::MeshTopology;
use crate::geometry::vector::{Point3, add, midpoint, normalize_or_zero};
use crate::mesh_error::SurfMeshError;
use crate::spatial::{NOT_FOUND, PointTree, TreeOptions};

/// Parameters of [`MeshTopology::unify_with`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnifyOptions {
    /// Vertices closer than this are merged.
    pub threshold: f64,
    /// Only consider vertices on an edge with fewer than two faces.
    pub boundary_only: bool,
    /// Spatial index parameters for the candidate search.
    pub tree: TreeOptions,
}

impl Default for UnifyOptions {
    fn default() -> Self {
        Self {
            threshold: 1e-9,
            boundary_only: false,
            tree: TreeOptions::default(),
        }
    }
}

/// Outcome of [`MeshTopology::cleanup`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub merged_vertices: usize,
    pub removed_vertices: usize,
    pub removed_faces: usize,
}

impl MeshTopology {
    /// Split edge `(a, b)` at its midpoint. Returns the new vertex.
    pub fn split_edge(&mut self, a: VertexId, b: VertexId) -> Result<VertexId, SurfMeshError> {
        let p = midpoint(self.vertex(a)?, self.vertex(b)?);
        self.split_edge_at(a, b, p)
    }

    /// Split edge `(a, b)` at `p`, e.g. a point evaluated on an underlying curve.
    ///
    /// Each of the one or two incident faces is replaced by two faces through
    /// the new vertex, wound like the face they replace. The new vertex gets
    /// the average of the endpoint normals when normals are stored.
    pub fn split_edge_at(
        &mut self,
        a: VertexId,
        b: VertexId,
        p: Point3,
    ) -> Result<VertexId, SurfMeshError> {
        self.ensure_current()?;
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        let edge = self.edge_key(a, b);
        let incident = self
            .adjacency
            .edge_faces(&edge)
            .ok_or(SurfMeshError::UnknownEdge {
                src: edge.src(),
                dst: edge.dst(),
            })?
            .to_vec();
        if incident.len() > 2 {
            return Err(SurfMeshError::NonManifoldEdge {
                src: edge.src(),
                dst: edge.dst(),
                faces: incident.len(),
            });
        }

        let normal = self.averaged_normal(a, b);
        let m = self.push_vertex_untracked(p, normal);
        for face in incident {
            let reference = self.raw_normal(&face);
            self.detach(&face);
            for from in [a, b] {
                let v = face.vertices().map(|x| if x == from { m } else { x });
                self.attach_oriented(Face::with_tag(v, face.tag()), reference);
            }
        }
        self.touch_surgical();
        log::trace!("split edge ({a}, {b}) at vertex {m}");
        Ok(m)
    }

    /// Merge `a` and `b` into a new vertex at their midpoint.
    ///
    /// Every face touching either endpoint is re-inserted with both ids
    /// replaced; faces that become degenerate disappear and flipped faces
    /// are turned back. `a` and `b` stay in the vertex array without faces
    /// until the next compaction.
    ///
    /// Collapses that would glue the surface onto itself are rejected with
    /// [`SurfMeshError::CollapseNonManifold`] before anything changes: the
    /// endpoints may only share the neighbours opposite the edge, those two
    /// neighbours may not be joined by an edge of their own, and an interior
    /// edge may not join two boundary vertices.
    pub fn collapse_edge(&mut self, a: VertexId, b: VertexId) -> Result<VertexId, SurfMeshError> {
        self.ensure_current()?;
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        let edge = self.edge_key(a, b);
        let incident = self
            .adjacency
            .edge_faces(&edge)
            .ok_or(SurfMeshError::UnknownEdge {
                src: edge.src(),
                dst: edge.dst(),
            })?
            .to_vec();
        if incident.len() > 2 {
            return Err(SurfMeshError::NonManifoldEdge {
                src: edge.src(),
                dst: edge.dst(),
                faces: incident.len(),
            });
        }

        let na = self.neighbors_of(a);
        let shared: Vec<VertexId> = self
            .neighbors_of(b)
            .into_iter()
            .filter(|v| na.binary_search(v).is_ok())
            .collect();
        let mut opposite: Vec<VertexId> = incident.iter().filter_map(|f| f.opposite(&edge)).collect();
        opposite.sort_unstable();
        opposite.dedup();
        let pinches = incident.len() == 2 && self.on_boundary(a) && self.on_boundary(b);
        // the two apexes must not already be joined, or the fan folds onto itself
        let folds = match opposite[..] {
            [c, d] => self.edges.binary_search(&self.edge_key(c, d)).is_ok(),
            _ => false,
        };
        if shared != opposite || pinches || folds {
            return Err(SurfMeshError::CollapseNonManifold {
                src: edge.src(),
                dst: edge.dst(),
            });
        }

        let p = midpoint(self.vertices[a as usize], self.vertices[b as usize]);
        let normal = self.averaged_normal(a, b);
        let m = self.push_vertex_untracked(p, normal);

        let mut touched: Vec<Face> = self.adjacency.vertex_faces(a).to_vec();
        touched.extend_from_slice(self.adjacency.vertex_faces(b));
        touched.sort_unstable();
        touched.dedup();
        let references: Vec<Point3> = touched.iter().map(|f| self.raw_normal(f)).collect();
        for face in &touched {
            self.detach(face);
        }
        let mut dropped = 0;
        for (face, reference) in touched.iter().zip(references) {
            let v = face
                .vertices()
                .map(|x| if x == a || x == b { m } else { x });
            if !self.attach_oriented(Face::with_tag(v, face.tag()), reference) {
                dropped += 1;
            }
        }
        self.touch_surgical();
        log::debug!("collapsed edge ({a}, {b}) into vertex {m}, {dropped} faces dropped");
        Ok(m)
    }

    /// Weld vertices closer than `threshold`; see [`unify_with`](Self::unify_with).
    pub fn unify(&mut self, threshold: f64, boundary_only: bool) -> usize {
        self.unify_with(&UnifyOptions {
            threshold,
            boundary_only,
            ..UnifyOptions::default()
        })
    }

    /// Weld near-coincident vertices. Returns the number of merged vertices.
    ///
    /// A transient [`PointTree`] over the candidates groups every vertex with
    /// the earliest candidate within the threshold. Faces are redirected to
    /// the survivors, faces that collapse are dropped, merged vertices are
    /// compacted away through [`rename`](Self::rename) and normals are
    /// cleared. Nothing changes when no pair is close enough.
    pub fn unify_with(&mut self, options: &UnifyOptions) -> usize {
        self.refresh_cache();
        let candidates: Vec<VertexId> = if options.boundary_only {
            self.boundary_vertex_ids()
        } else {
            (0..self.vertices.len() as VertexId).collect()
        };

        let representative = {
            let tree = PointTree::from_members(&self.vertices, candidates, options.tree);
            tree.repldup(options.threshold).to_original()
        };
        let survivor: Vec<VertexId> = representative
            .iter()
            .enumerate()
            .map(|(v, &r)| if r == NOT_FOUND { v as VertexId } else { r })
            .collect();
        let merged = survivor
            .iter()
            .enumerate()
            .filter(|&(v, &r)| v as VertexId != r)
            .count();
        if merged == 0 {
            return 0;
        }

        let token = self.token;
        let faces_before = self.faces.len();
        self.faces = self
            .faces
            .iter()
            .map(|f| Face::with_tag(f.vertices().map(|v| survivor[v as usize]), f.tag()).in_mesh(token))
            .filter(|f| !f.is_degenerate())
            .collect();
        let keep: Vec<VertexId> = survivor
            .iter()
            .enumerate()
            .filter(|&(v, &r)| v as VertexId == r)
            .map(|(v, _)| v as VertexId)
            .collect();
        self.normals.clear();
        if let Err(e) = self.rename(&keep) {
            log::warn!("unify: compaction failed: {e}");
            self.rebuild_adjacency();
        }
        log::debug!(
            "unify: merged {merged} vertices, {} -> {} faces",
            faces_before,
            self.faces.len()
        );
        merged
    }

    /// [`unify_with`](Self::unify_with) followed by [`fixate`](Self::fixate).
    pub fn cleanup(&mut self, options: &UnifyOptions) -> CleanupSummary {
        let vertices = self.vertices.len();
        let faces = self.faces.len();
        let merged_vertices = self.unify_with(options);
        self.fixate();
        let summary = CleanupSummary {
            merged_vertices,
            removed_vertices: vertices - self.vertices.len(),
            removed_faces: faces - self.faces.len(),
        };
        log::debug!("cleanup: {summary:?}");
        summary
    }

    /// Insert `face` wound like `reference`; drops degenerate and duplicate faces.
    fn attach_oriented(&mut self, face: Face, reference: Point3) -> bool {
        let face = face.in_mesh(self.token);
        if face.is_degenerate() || self.is_flat(&face) {
            log::debug!("dropping degenerate face {:?}", face.vertices());
            return false;
        }
        let face = self.orient_like(face, reference);
        self.attach(face)
    }

    fn averaged_normal(&self, a: VertexId, b: VertexId) -> Point3 {
        if self.normals.is_empty() {
            return [0.0; 3];
        }
        normalize_or_zero(add(self.normals[a as usize], self.normals[b as usize]))
    }
}
