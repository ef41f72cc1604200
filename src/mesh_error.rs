//! SurfMeshError: Unified error type for surf-mesh public APIs
//!
//! Every fallible operation of the spatial index and the mesh topology
//! returns this error. Querying an empty [`PointTree`](crate::spatial::PointTree)
//! is the one precondition that is asserted instead of reported.

use thiserror::Error;

use crate::topology::entity::VertexId;

/// Unified error type for surf-mesh operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfMeshError {
    /// A vertex id does not address a stored vertex.
    #[error("vertex {vertex} out of range (mesh has {len} vertices)")]
    VertexOutOfRange { vertex: VertexId, len: usize },
    /// A point index does not address the point array of a spatial index.
    #[error("point index {index} out of range (index holds {len} points)")]
    IndexOutOfRange { index: usize, len: usize },
    /// The edge is not part of the current edge set.
    #[error("unknown edge ({src}, {dst})")]
    UnknownEdge { src: VertexId, dst: VertexId },
    /// The face is not part of the current face set.
    #[error("unknown face {0:?}")]
    UnknownFace([VertexId; 3]),
    /// The edge is shared by more than two faces.
    #[error("non-manifold edge ({src}, {dst}) has {faces} incident faces")]
    NonManifoldEdge {
        src: VertexId,
        dst: VertexId,
        faces: usize,
    },
    /// The operation needs exactly two faces across the edge.
    #[error("edge ({src}, {dst}) has {found} incident faces, expected 2")]
    NotTwoFaces {
        src: VertexId,
        dst: VertexId,
        found: usize,
    },
    /// Collapsing the edge would fold the surface onto itself.
    #[error("collapsing edge ({src}, {dst}) would create non-manifold topology")]
    CollapseNonManifold { src: VertexId, dst: VertexId },
    /// Adjacency maps do not mirror the current faces; call `rebuild_adjacency`.
    #[error("adjacency maps are stale (mesh generation {mesh}, maps built at {maps})")]
    StaleAdjacency { mesh: u64, maps: u64 },
    /// The operation needs per-vertex normals but none are stored.
    #[error("mesh has no vertex normals")]
    MissingNormals,
    /// A per-vertex array does not match the vertex count.
    #[error("{what} length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A compaction list is unsorted, duplicated or out of range.
    #[error("invalid renumbering: {0}")]
    InvalidRenumbering(String),
    /// A packed buffer does not follow the vertex/face layout.
    #[error("invalid packed layout: {0}")]
    InvalidLayout(String),
    /// A diagnostic consistency check failed.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Geometric input that cannot be processed (NaN, empty grids, ...).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
