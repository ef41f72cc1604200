//! Triangulated surface topology.
//!
//! [`MeshTopology`] stores vertices, optional normals and canonical faces,
//! derives the induced edge set and keeps vertex/edge/face adjacency
//! ([`AdjacencyMaps`]) in step with every surgical edit:
//! - [`entity`]: vertex ids, canonical [`Edge`]s and [`Face`]s, [`MeshToken`]
//! - [`mesh`]: storage, bulk load, `fixate`, `rename`, face insertion/removal
//! - [`edit`]: edge split and collapse, vertex welding (`unify`), `cleanup`
//! - [`normals`] and [`query`]: normals, 1-ring queries, dual cells,
//!   dihedral angles, curvature and the discrete gradient
//! - [`validation`]: diagnostic consistency checks

pub mod adjacency;
pub mod cache;
pub mod edit;
pub mod entity;
pub mod mesh;
pub mod normals;
pub mod query;
pub mod validation;

pub use adjacency::AdjacencyMaps;
pub use cache::InvalidateCache;
pub use edit::{CleanupSummary, UnifyOptions};
pub use entity::{Edge, Face, MeshToken, VertexId};
pub use mesh::MeshTopology;
pub use query::{DualCell, GradientOperator};
pub use validation::{NonManifoldHandling, ValidationOptions};
