//! Mesh generators and whole-mesh classifications built on [`MeshTopology`](crate::topology::MeshTopology).

pub mod boundary;
pub mod meshgen;

pub use boundary::{BoundaryClassification, classify_vertices};
pub use meshgen::{MeshGenOptions, sphere_shell, structured_grid, triangulate_grid};
