//! Derived vertex/edge/face adjacency of a [`MeshTopology`](super::MeshTopology).
//!
//! The maps are a pure cache over the face set. They are stamped with the
//! mesh generation they mirror; the mesh refuses to serve them once a bypass
//! mutation has advanced its generation past that stamp.

use hashbrown::HashMap;

use super::entity::{Edge, Face, VertexId};

/// Vertex→faces, vertex→edges and edge→faces maps.
///
/// All lists are kept sorted so lookups and patches are binary searches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdjacencyMaps {
    pub(crate) vertex_faces: Vec<Vec<Face>>,
    pub(crate) vertex_edges: Vec<Vec<Edge>>,
    pub(crate) edge_faces: HashMap<Edge, Vec<Face>>,
    pub(crate) generation: u64,
}

impl AdjacencyMaps {
    /// Build all three maps in one pass over `faces`.
    pub fn build(n_vertices: usize, faces: &[Face], generation: u64) -> Self {
        let mut maps = AdjacencyMaps {
            vertex_faces: vec![Vec::new(); n_vertices],
            vertex_edges: vec![Vec::new(); n_vertices],
            edge_faces: HashMap::with_capacity(faces.len() * 3 / 2),
            generation,
        };
        for face in faces {
            for v in face.vertices() {
                maps.vertex_faces[v as usize].push(*face);
            }
            for e in face.edges() {
                maps.edge_faces.entry(e).or_default().push(*face);
            }
        }
        for (e, faces) in maps.edge_faces.iter_mut() {
            faces.sort_unstable();
            maps.vertex_edges[e.src() as usize].push(*e);
            maps.vertex_edges[e.dst() as usize].push(*e);
        }
        for list in &mut maps.vertex_faces {
            list.sort_unstable();
        }
        for list in &mut maps.vertex_edges {
            list.sort_unstable();
        }
        maps
    }

    /// Mesh generation these maps mirror.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Faces incident to `v`, empty for unknown vertices.
    pub fn vertex_faces(&self, v: VertexId) -> &[Face] {
        self.vertex_faces
            .get(v as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Edges incident to `v`, empty for unknown vertices.
    pub fn vertex_edges(&self, v: VertexId) -> &[Edge] {
        self.vertex_edges
            .get(v as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Faces sharing `edge`, or `None` if the edge is not present.
    pub fn edge_faces(&self, edge: &Edge) -> Option<&[Face]> {
        self.edge_faces.get(edge).map(Vec::as_slice)
    }

    pub(crate) fn push_vertex(&mut self) {
        self.vertex_faces.push(Vec::new());
        self.vertex_edges.push(Vec::new());
    }

    /// Register `face`; returns the edges it created.
    pub(crate) fn attach_face(&mut self, face: Face) -> Vec<Edge> {
        for v in face.vertices() {
            insert_sorted(&mut self.vertex_faces[v as usize], face);
        }
        let mut created = Vec::new();
        for e in face.edges() {
            let faces = self.edge_faces.entry(e).or_default();
            if faces.is_empty() {
                created.push(e);
                insert_sorted(&mut self.vertex_edges[e.src() as usize], e);
                insert_sorted(&mut self.vertex_edges[e.dst() as usize], e);
            }
            insert_sorted(faces, face);
        }
        created
    }

    /// Unregister `face`; returns the edges left without faces.
    pub(crate) fn detach_face(&mut self, face: &Face) -> Vec<Edge> {
        for v in face.vertices() {
            remove_sorted(&mut self.vertex_faces[v as usize], face);
        }
        let mut orphaned = Vec::new();
        for e in face.edges() {
            let now_empty = match self.edge_faces.get_mut(&e) {
                Some(faces) => {
                    remove_sorted(faces, face);
                    faces.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.edge_faces.remove(&e);
                remove_sorted(&mut self.vertex_edges[e.src() as usize], &e);
                remove_sorted(&mut self.vertex_edges[e.dst() as usize], &e);
                orphaned.push(e);
            }
        }
        orphaned
    }
}

/// Insert `x` into the sorted `list` unless already present.
pub(crate) fn insert_sorted<T: Ord>(list: &mut Vec<T>, x: T) -> bool {
    match list.binary_search(&x) {
        Ok(_) => false,
        Err(pos) => {
            list.insert(pos, x);
            true
        }
    }
}

/// Remove `x` from the sorted `list` if present.
pub(crate) fn remove_sorted<T: Ord>(list: &mut Vec<T>, x: &T) -> bool {
    match list.binary_search(x) {
        Ok(pos) => {
            list.remove(pos);
            true
        }
        Err(_) => false,
    }
}
