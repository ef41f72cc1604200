//! Read-only adjacency and differential-geometry queries.
//!
//! All queries that read the adjacency maps fail with
//! [`SurfMeshError::StaleAdjacency`] after a bypass mutation.

use super::entity::{Edge, Face, VertexId};
use super::mesh::MeshTopology;
use crate::geometry::vector::{
    Point3, add, cross, distance, dot, norm, normalize_or_zero, scale, sub, triangle_normal,
};
use crate::mesh_error::SurfMeshError;

/// Face-area-weighted 1-ring of a vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualCell {
    /// Area-weighted mean of the incident face centroids.
    pub barycenter: Point3,
    /// One third of the incident face areas.
    pub area: f64,
}

/// Sparse per-vertex gradient operator in CSR layout.
///
/// Row `v` maps scalar vertex values to the gradient at `v`:
/// `grad[v] = sum(weights[k] * values[columns[k]])` for `k` in
/// `offsets[v]..offsets[v + 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GradientOperator {
    pub offsets: Vec<usize>,
    pub columns: Vec<VertexId>,
    pub weights: Vec<Point3>,
}

impl GradientOperator {
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn row(&self, v: VertexId) -> (&[VertexId], &[Point3]) {
        let (lo, hi) = (self.offsets[v as usize], self.offsets[v as usize + 1]);
        (&self.columns[lo..hi], &self.weights[lo..hi])
    }

    /// Gradient of the scalar field `values` at every vertex.
    pub fn apply(&self, values: &[f64]) -> Result<Vec<Point3>, SurfMeshError> {
        if values.len() != self.n_rows() {
            return Err(SurfMeshError::LengthMismatch {
                what: "scalar field",
                expected: self.n_rows(),
                found: values.len(),
            });
        }
        Ok(self
            .offsets
            .windows(2)
            .map(|w| {
                (w[0]..w[1]).fold([0.0; 3], |acc, k| {
                    add(acc, scale(self.weights[k], values[self.columns[k] as usize]))
                })
            })
            .collect())
    }
}

impl MeshTopology {
    pub fn vertex_faces(&self, v: VertexId) -> Result<&[Face], SurfMeshError> {
        self.ensure_current()?;
        self.check_vertex(v)?;
        Ok(self.adjacency.vertex_faces(v))
    }

    pub fn vertex_edges(&self, v: VertexId) -> Result<&[Edge], SurfMeshError> {
        self.ensure_current()?;
        self.check_vertex(v)?;
        Ok(self.adjacency.vertex_edges(v))
    }

    /// Vertices sharing an edge with `v`, ascending.
    pub fn vertex_neighbors(&self, v: VertexId) -> Result<Vec<VertexId>, SurfMeshError> {
        self.ensure_current()?;
        self.check_vertex(v)?;
        Ok(self.neighbors_of(v))
    }

    /// Number of edges at `v`.
    pub fn vertex_degree(&self, v: VertexId) -> Result<usize, SurfMeshError> {
        Ok(self.vertex_edges(v)?.len())
    }

    /// Faces sharing edge `(a, b)`.
    pub fn edge_faces(&self, a: VertexId, b: VertexId) -> Result<&[Face], SurfMeshError> {
        self.ensure_current()?;
        let edge = self.edge_key(a, b);
        self.adjacency
            .edge_faces(&edge)
            .ok_or(SurfMeshError::UnknownEdge {
                src: edge.src(),
                dst: edge.dst(),
            })
    }

    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Result<Option<Edge>, SurfMeshError> {
        self.ensure_current()?;
        let edge = self.edge_key(a, b);
        Ok(self.edges.binary_search(&edge).ok().map(|i| self.edges[i]))
    }

    /// Edges with fewer than two incident faces.
    pub fn boundary_edges(&self) -> Result<Vec<Edge>, SurfMeshError> {
        self.ensure_current()?;
        Ok(self
            .edges
            .iter()
            .filter(|e| self.adjacency.edge_faces(e).map_or(0, <[Face]>::len) < 2)
            .copied()
            .collect())
    }

    /// Vertices on a boundary edge, ascending.
    pub fn boundary_vertices(&self) -> Result<Vec<VertexId>, SurfMeshError> {
        self.ensure_current()?;
        Ok(self.boundary_vertex_ids())
    }

    pub fn is_boundary_vertex(&self, v: VertexId) -> Result<bool, SurfMeshError> {
        self.ensure_current()?;
        self.check_vertex(v)?;
        Ok(self.on_boundary(v))
    }

    /// Unit normal of `face` from its winding.
    pub fn face_normal(&self, face: &Face) -> Result<Point3, SurfMeshError> {
        self.check_face(face)?;
        Ok(normalize_or_zero(self.raw_normal(face)))
    }

    pub fn face_area(&self, face: &Face) -> Result<f64, SurfMeshError> {
        self.check_face(face)?;
        Ok(0.5 * norm(self.raw_normal(face)))
    }

    /// Sum of all face areas.
    pub fn total_area(&self) -> f64 {
        let n = self.vertices.len();
        self.faces
            .iter()
            .filter(|f| f.vertices().iter().all(|&v| (v as usize) < n))
            .map(|f| 0.5 * norm(self.raw_normal(f)))
            .sum()
    }

    /// Barycenter and area of the dual cell around `v`.
    ///
    /// A vertex without area around it reports its own position and zero area.
    pub fn dual_cell(&self, v: VertexId) -> Result<DualCell, SurfMeshError> {
        let faces = self.vertex_faces(v)?;
        let mut weighted = [0.0; 3];
        let mut total = 0.0;
        for f in faces {
            let area = 0.5 * norm(self.raw_normal(f));
            let [a, b, c] = f.vertices().map(|x| self.vertices[x as usize]);
            let centroid = scale(add(add(a, b), c), 1.0 / 3.0);
            weighted = add(weighted, scale(centroid, area));
            total += area;
        }
        if total > 0.0 {
            Ok(DualCell {
                barycenter: scale(weighted, 1.0 / total),
                area: total / 3.0,
            })
        } else {
            Ok(DualCell {
                barycenter: self.vertices[v as usize],
                area: 0.0,
            })
        }
    }

    /// Angle in `[0, pi]` between the normals of the two faces at `(a, b)`.
    ///
    /// Zero for coplanar, consistently wound faces.
    pub fn dihedral_angle(&self, a: VertexId, b: VertexId) -> Result<f64, SurfMeshError> {
        let faces = self.edge_faces(a, b)?;
        let [f, g] = faces else {
            return Err(SurfMeshError::NotTwoFaces {
                src: a.min(b),
                dst: a.max(b),
                found: faces.len(),
            });
        };
        let n1 = normalize_or_zero(self.raw_normal(f));
        let n2 = normalize_or_zero(self.raw_normal(g));
        if n1 == [0.0; 3] || n2 == [0.0; 3] {
            return Ok(0.0);
        }
        Ok(dot(n1, n2).clamp(-1.0, 1.0).acos())
    }

    /// Mean normal variation per unit length over the neighbours of `v`.
    ///
    /// Estimates the magnitude of the curvature from stored normals; a unit
    /// sphere with exact normals yields 1. Zero for isolated vertices.
    pub fn curvature(&self, v: VertexId) -> Result<f64, SurfMeshError> {
        self.ensure_current()?;
        self.check_vertex(v)?;
        if self.normals.is_empty() {
            return Err(SurfMeshError::MissingNormals);
        }
        let p = self.vertices[v as usize];
        let n = self.normals[v as usize];
        let mut sum = 0.0;
        let mut count = 0usize;
        for w in self.neighbors_of(v) {
            let len = distance(p, self.vertices[w as usize]);
            if len > 0.0 {
                sum += norm(sub(self.normals[w as usize], n)) / len;
                count += 1;
            }
        }
        Ok(if count == 0 { 0.0 } else { sum / count as f64 })
    }

    /// Sparse gradient row of `v`: `(neighbour, weight)` pairs, ascending.
    ///
    /// Each incident face contributes its exact linear gradient, weighted by
    /// face area. Linear fields are therefore reproduced exactly on planar
    /// patches, and the weights of a row sum to zero.
    pub fn gradient_row(&self, v: VertexId) -> Result<Vec<(VertexId, Point3)>, SurfMeshError> {
        let faces = self.vertex_faces(v)?;
        let mut row: Vec<(VertexId, Point3)> = Vec::with_capacity(faces.len() + 1);
        let mut total = 0.0;
        for f in faces {
            let ids = f.vertices();
            let p = ids.map(|x| self.vertices[x as usize]);
            let raw = triangle_normal(p[0], p[1], p[2]);
            let area = 0.5 * norm(raw);
            if area == 0.0 {
                continue;
            }
            let unit = scale(raw, 1.0 / (2.0 * area));
            total += area;
            for i in 0..3 {
                // area * grad(phi_i) = n x e_i / 2, e_i opposite to corner i
                let e = sub(p[(i + 2) % 3], p[(i + 1) % 3]);
                let w = scale(cross(unit, e), 0.5);
                match row.binary_search_by_key(&ids[i], |&(c, _)| c) {
                    Ok(k) => row[k].1 = add(row[k].1, w),
                    Err(k) => row.insert(k, (ids[i], w)),
                }
            }
        }
        if total == 0.0 {
            return Ok(Vec::new());
        }
        for entry in &mut row {
            entry.1 = scale(entry.1, 1.0 / total);
        }
        Ok(row)
    }

    /// Assemble [`gradient_row`](Self::gradient_row) for every vertex.
    pub fn gradient_operator(&self) -> Result<GradientOperator, SurfMeshError> {
        self.ensure_current()?;
        let mut op = GradientOperator {
            offsets: Vec::with_capacity(self.vertices.len() + 1),
            columns: Vec::new(),
            weights: Vec::new(),
        };
        op.offsets.push(0);
        for v in 0..self.vertices.len() as VertexId {
            for (c, w) in self.gradient_row(v)? {
                op.columns.push(c);
                op.weights.push(w);
            }
            op.offsets.push(op.columns.len());
        }
        Ok(op)
    }

    pub(crate) fn neighbors_of(&self, v: VertexId) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = self
            .adjacency
            .vertex_edges(v)
            .iter()
            .filter_map(|e| e.opposite(v))
            .collect();
        out.sort_unstable();
        out
    }

    pub(crate) fn on_boundary(&self, v: VertexId) -> bool {
        self.adjacency
            .vertex_edges(v)
            .iter()
            .any(|e| self.adjacency.edge_faces(e).map_or(0, <[Face]>::len) < 2)
    }

    pub(crate) fn boundary_vertex_ids(&self) -> Vec<VertexId> {
        (0..self.vertices.len() as VertexId)
            .filter(|&v| self.on_boundary(v))
            .collect()
    }

    fn check_face(&self, face: &Face) -> Result<(), SurfMeshError> {
        for v in face.vertices() {
            self.check_vertex(v)?;
        }
        Ok(())
    }
}
