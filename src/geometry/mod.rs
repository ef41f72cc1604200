//! Geometry primitives shared by the spatial index and the mesh.
//!
//! Points are plain `[f64; 3]` arrays manipulated through the free functions
//! in [`vector`]; [`bounds`] provides the axis-aligned box used as the
//! bounding volume of every tree node.

pub mod bounds;
pub mod vector;

pub use bounds::BoundingBox;
pub use vector::Point3;
