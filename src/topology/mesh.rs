//! Triangulated surface storage with maintained adjacency.
//!
//! [`MeshTopology`] owns vertex coordinates, optional per-vertex normals, a
//! sorted set of canonical faces, the edges those faces induce and the
//! [`AdjacencyMaps`] mirroring them. Two kinds of mutation exist:
//!
//! - *surgical* edits (`insert_face`, `remove_face`, the edits in
//!   [`edit`](super::edit)) patch faces, edges and maps together and keep the
//!   maps current;
//! - *bypass* mutations (`push_face_raw`) only touch the face list. They
//!   advance the generation past the maps' stamp, and every query fails with
//!   [`SurfMeshError::StaleAdjacency`] until [`MeshTopology::rebuild_adjacency`]
//!   or [`MeshTopology::fixate`] runs.

use super::adjacency::{AdjacencyMaps, insert_sorted, remove_sorted};
use super::cache::InvalidateCache;
use super::entity::{Edge, Face, MeshToken, VertexId};
use crate::debug_invariants::DebugInvariants;
use crate::geometry::vector::{Point3, dot, is_degenerate_triangle, triangle_normal};
use crate::mesh_error::SurfMeshError;

#[derive(Clone, Debug, Default)]
pub struct MeshTopology {
    pub(crate) token: MeshToken,
    pub(crate) vertices: Vec<Point3>,
    pub(crate) normals: Vec<Point3>,
    pub(crate) faces: Vec<Face>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) adjacency: AdjacencyMaps,
    pub(crate) generation: u64,
}

impl MeshTopology {
    /// Empty mesh with the default token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty mesh whose faces and edges carry `token`.
    pub fn with_token(token: MeshToken) -> Self {
        MeshTopology {
            token,
            ..Self::default()
        }
    }

    /// Load raw vertices and vertex triples, then [`fixate`](Self::fixate).
    ///
    /// Invalid triples are dropped and unreferenced vertices are compacted
    /// away, so vertex ids of the result may differ from the input.
    pub fn from_parts<I>(vertices: Vec<Point3>, faces: I) -> Self
    where
        I: IntoIterator<Item = [VertexId; 3]>,
    {
        let mut mesh = MeshTopology::new();
        mesh.vertices = vertices;
        mesh.faces = faces.into_iter().map(Face::new).collect();
        mesh.generation = 1;
        mesh.fixate();
        mesh
    }

    #[inline]
    pub fn token(&self) -> MeshToken {
        self.token
    }

    /// Counter advanced by every mutation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` if the adjacency maps mirror the current faces.
    #[inline]
    pub fn is_current(&self) -> bool {
        self.adjacency.generation == self.generation
    }

    /// Fail with [`SurfMeshError::StaleAdjacency`] unless the maps are current.
    pub fn ensure_current(&self) -> Result<(), SurfMeshError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(SurfMeshError::StaleAdjacency {
                mesh: self.generation,
                maps: self.adjacency.generation,
            })
        }
    }

    /// The adjacency maps, if current.
    pub fn adjacency(&self) -> Result<&AdjacencyMaps, SurfMeshError> {
        self.ensure_current()?;
        Ok(&self.adjacency)
    }

    #[inline]
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Coordinates as one flat `[x0, y0, z0, x1, ...]` slice.
    pub fn vertices_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex(&self, v: VertexId) -> Result<Point3, SurfMeshError> {
        self.check_vertex(v)?;
        Ok(self.vertices[v as usize])
    }

    /// Mutable coordinates.
    ///
    /// Moving vertices keeps topology and adjacency valid, but normals and
    /// any [`PointTree`](crate::spatial::PointTree) built over the old
    /// coordinates are not updated.
    pub fn vertices_mut(&mut self) -> &mut [Point3] {
        self.touch_surgical();
        &mut self.vertices
    }

    /// Per-vertex normals; empty when none are stored.
    #[inline]
    pub fn normals(&self) -> &[Point3] {
        &self.normals
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Replace the normals; one per vertex.
    pub fn set_normals(&mut self, normals: Vec<Point3>) -> Result<(), SurfMeshError> {
        if normals.len() != self.vertices.len() {
            return Err(SurfMeshError::LengthMismatch {
                what: "normals",
                expected: self.vertices.len(),
                found: normals.len(),
            });
        }
        self.normals = normals;
        self.touch_surgical();
        Ok(())
    }

    pub fn clear_normals(&mut self) {
        self.normals.clear();
        self.touch_surgical();
    }

    /// Faces in canonical sorted order.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Edges in canonical sorted order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_face(&self, v: [VertexId; 3]) -> bool {
        self.faces.binary_search(&self.face_key(v)).is_ok()
    }

    /// Append a vertex. Adjacency is extended in place and stays current.
    pub fn push_vertex(&mut self, p: Point3) -> VertexId {
        let v = self.push_vertex_untracked(p, [0.0; 3]);
        self.touch_surgical();
        v
    }

    /// Append a face without updating edges or adjacency.
    ///
    /// The maps become stale; call [`rebuild_adjacency`](Self::rebuild_adjacency)
    /// or [`fixate`](Self::fixate) once the bulk load is done.
    pub fn push_face_raw(&mut self, v: [VertexId; 3], tag: i32) {
        self.faces.push(Face::with_tag(v, tag).in_mesh(self.token));
        self.generation += 1;
    }

    /// Re-derive edges and maps from the face list.
    ///
    /// Faces referencing unknown or repeated vertices are dropped and
    /// duplicates are merged; vertex numbering is left alone.
    pub fn rebuild_adjacency(&mut self) {
        let dropped = self.normalize_faces();
        if dropped > 0 {
            log::debug!("rebuild_adjacency: dropped {dropped} invalid or duplicate faces");
        }
        self.rebuild_maps();
    }

    /// Bring the mesh into canonical form.
    ///
    /// Drops faces with repeated vertices or a vanishing normal, merges
    /// duplicates, compacts the vertex array to referenced vertices and
    /// rebuilds all adjacency in one pass. Applying it twice changes nothing.
    pub fn fixate(&mut self) {
        let faces_before = self.faces.len();
        let vertices_before = self.vertices.len();
        self.normalize_faces();
        let verts = &self.vertices;
        self.faces.retain(|f| {
            let [a, b, c] = f.vertices();
            !is_degenerate_triangle(verts[a as usize], verts[b as usize], verts[c as usize])
        });

        let mut referenced = vec![false; self.vertices.len()];
        for f in &self.faces {
            for v in f.vertices() {
                referenced[v as usize] = true;
            }
        }
        let keep: Vec<VertexId> = (0..self.vertices.len() as VertexId)
            .filter(|&v| referenced[v as usize])
            .collect();
        if keep.len() < self.vertices.len() {
            self.remap_vertices(&keep);
        }
        self.rebuild_maps();

        log::debug!(
            "fixate: {} -> {} faces, {} -> {} vertices",
            faces_before,
            self.faces.len(),
            vertices_before,
            self.vertices.len()
        );
        crate::debug_invariants!(self.validate_invariants(), "after fixate");
    }

    /// Compact vertices (and normals) to exactly `keep`.
    ///
    /// `keep` must be strictly ascending and in range. Vertex `keep[i]`
    /// becomes vertex `i`; faces referencing a vertex outside `keep` are
    /// dropped. Adjacency is rebuilt.
    pub fn rename(&mut self, keep: &[VertexId]) -> Result<(), SurfMeshError> {
        if let Some(w) = keep.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SurfMeshError::InvalidRenumbering(format!(
                "ids must be strictly ascending, found {} before {}",
                w[0], w[1]
            )));
        }
        if let Some(&last) = keep.last() {
            if last as usize >= self.vertices.len() {
                return Err(SurfMeshError::InvalidRenumbering(format!(
                    "id {last} out of range for {} vertices",
                    self.vertices.len()
                )));
            }
        }
        let before = self.faces.len();
        self.remap_vertices(keep);
        self.rebuild_maps();
        log::debug!(
            "rename: kept {} vertices, dropped {} faces",
            keep.len(),
            before - self.faces.len()
        );
        Ok(())
    }

    /// Insert one face, patching edges and maps.
    ///
    /// Returns `Ok(false)` without changing anything if the face is
    /// degenerate or already present.
    pub fn insert_face(&mut self, v: [VertexId; 3], tag: i32) -> Result<bool, SurfMeshError> {
        self.ensure_current()?;
        for x in v {
            self.check_vertex(x)?;
        }
        let face = Face::with_tag(v, tag).in_mesh(self.token);
        if face.is_degenerate() || self.is_flat(&face) {
            return Ok(false);
        }
        let inserted = self.attach(face);
        if inserted {
            self.touch_surgical();
        }
        Ok(inserted)
    }

    /// Remove the face with vertices `v` (same winding), patching edges and maps.
    pub fn remove_face(&mut self, v: [VertexId; 3]) -> Result<Option<Face>, SurfMeshError> {
        self.ensure_current()?;
        let removed = self.detach(&self.face_key(v));
        if removed.is_some() {
            self.touch_surgical();
        }
        Ok(removed)
    }

    pub(crate) fn check_vertex(&self, v: VertexId) -> Result<(), SurfMeshError> {
        if (v as usize) < self.vertices.len() {
            Ok(())
        } else {
            Err(SurfMeshError::VertexOutOfRange {
                vertex: v,
                len: self.vertices.len(),
            })
        }
    }

    pub(crate) fn face_key(&self, v: [VertexId; 3]) -> Face {
        Face::new(v).in_mesh(self.token)
    }

    pub(crate) fn edge_key(&self, a: VertexId, b: VertexId) -> Edge {
        Edge::with_token(self.token, a, b)
    }

    /// Area-scaled normal from the face winding.
    pub(crate) fn raw_normal(&self, face: &Face) -> Point3 {
        let [a, b, c] = face.vertices();
        triangle_normal(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    pub(crate) fn is_flat(&self, face: &Face) -> bool {
        let [a, b, c] = face.vertices();
        is_degenerate_triangle(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        )
    }

    /// `face`, or its reverse if that one points along `reference`.
    pub(crate) fn orient_like(&self, face: Face, reference: Point3) -> Face {
        if dot(self.raw_normal(&face), reference) < 0.0 {
            face.reversed()
        } else {
            face
        }
    }

    /// Append a vertex and its normal slot without advancing the generation.
    pub(crate) fn push_vertex_untracked(&mut self, p: Point3, normal: Point3) -> VertexId {
        let v = self.vertices.len() as VertexId;
        self.vertices.push(p);
        if !self.normals.is_empty() {
            self.normals.push(normal);
        }
        self.adjacency.push_vertex();
        v
    }

    /// Add `face` to faces, edges and maps. `false` if it already exists.
    pub(crate) fn attach(&mut self, face: Face) -> bool {
        if !insert_sorted(&mut self.faces, face) {
            return false;
        }
        for e in self.adjacency.attach_face(face) {
            insert_sorted(&mut self.edges, e);
        }
        true
    }

    /// Remove `face` from faces, edges and maps.
    pub(crate) fn detach(&mut self, face: &Face) -> Option<Face> {
        let pos = self.faces.binary_search(face).ok()?;
        let removed = self.faces.remove(pos);
        for e in self.adjacency.detach_face(&removed) {
            remove_sorted(&mut self.edges, &e);
        }
        Some(removed)
    }

    /// Advance the generation and keep current maps current.
    pub(crate) fn touch_surgical(&mut self) {
        let was_current = self.is_current();
        self.generation += 1;
        if was_current {
            self.adjacency.generation = self.generation;
        }
    }

    /// Re-token, drop faces with unknown or repeated vertices, sort and merge.
    /// Returns the number of faces removed.
    fn normalize_faces(&mut self) -> usize {
        let before = self.faces.len();
        let n = self.vertices.len();
        let token = self.token;
        self.faces.retain(|f| {
            !f.is_degenerate() && f.vertices().iter().all(|&v| (v as usize) < n)
        });
        for f in &mut self.faces {
            *f = f.in_mesh(token);
        }
        self.faces.sort();
        self.faces.dedup();
        before - self.faces.len()
    }

    /// Renumber through the ascending `keep` list, dropping faces that lose a vertex.
    fn remap_vertices(&mut self, keep: &[VertexId]) {
        let token = self.token;
        self.faces = self
            .faces
            .iter()
            .filter_map(|f| {
                let [a, b, c] = f.vertices();
                let map = |v: VertexId| keep.binary_search(&v).ok().map(|i| i as VertexId);
                Some(Face::with_tag([map(a)?, map(b)?, map(c)?], f.tag()).in_mesh(token))
            })
            .collect();
        self.faces.sort();
        self.faces.dedup();

        self.vertices = keep.iter().map(|&v| self.vertices[v as usize]).collect();
        if !self.normals.is_empty() {
            self.normals = keep.iter().map(|&v| self.normals[v as usize]).collect();
        }
    }

    /// Derive edges from faces and rebuild maps at a fresh generation.
    fn rebuild_maps(&mut self) {
        self.edges = self.faces.iter().flat_map(|f| f.edges()).collect();
        self.edges.sort_unstable();
        self.edges.dedup();
        self.generation += 1;
        self.adjacency = AdjacencyMaps::build(self.vertices.len(), &self.faces, self.generation);
    }
}

impl InvalidateCache for MeshTopology {
    fn invalidate_cache(&mut self) {
        self.generation += 1;
    }

    fn cache_is_current(&self) -> bool {
        self.is_current()
    }

    fn rebuild_cache(&mut self) {
        self.rebuild_adjacency();
    }
}
