#![cfg_attr(docsrs, feature(doc_cfg))]
//! # surf-mesh
//!
//! surf-mesh is the geometric indexing and surface-topology kernel of a
//! CAD/CFD preprocessing toolchain. It provides a dynamic bounding-box tree
//! over 3-D point sets and a triangulated surface with maintained
//! vertex/edge/face adjacency, on which geometry evaluators, file codecs and
//! remeshing passes are built.
//!
//! ## Features
//! - [`spatial::PointTree`]: exact nearest-point and radius queries,
//!   density-adaptive neighbourhoods, incremental insert/erase and
//!   near-duplicate clustering
//! - [`topology::MeshTopology`]: canonical faces and edges, bulk
//!   canonicalization (`fixate`), surgical edits (edge split and collapse,
//!   vertex welding) and read-only differential-geometry queries
//! - Grid triangulation and a packed vertex/face layout for codecs
//!
//! ## Staleness
//!
//! Adjacency maps are stamped with the mesh generation they mirror. Bulk
//! loads through `push_face_raw` leave them stale; every query and edit then
//! fails with [`SurfMeshError::StaleAdjacency`](mesh_error::SurfMeshError)
//! until `rebuild_adjacency` or `fixate` runs.
//!
//! ## Invariant checks
//!
//! `debug_invariants!` consistency passes run in debug builds. Enable the
//! `check-invariants` (or `strict-invariants`) feature to keep them in
//! release builds.
//!
//! ```rust
//! use surf_mesh::prelude::*;
//!
//! let mut mesh = structured_grid(3, 3, [0.0; 2], [3.0; 2], MeshGenOptions::default())?;
//! assert_eq!((mesh.n_vertices(), mesh.n_faces()), (16, 18));
//! assert_eq!(mesh.unify(1e-9, false), 0);
//!
//! let tree = PointTree::build(mesh.vertices());
//! assert_eq!(tree.nearest([1.1, 0.9, 0.0]), 5);
//! # Ok::<(), SurfMeshError>(())
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod spatial;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::meshgen::{MeshGenOptions, sphere_shell, structured_grid, triangulate_grid};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{BoundingBox, Point3};
    pub use crate::mesh_error::SurfMeshError;
    pub use crate::spatial::{Deduplication, NeighborhoodOptions, PointTree, TreeOptions};
    pub use crate::topology::{
        Edge, Face, InvalidateCache, MeshToken, MeshTopology, UnifyOptions, ValidationOptions,
        VertexId,
    };
}
