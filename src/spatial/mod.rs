//! Dynamic spatial index over 3-D point sets.
//!
//! [`PointTree`] is a binary bounding-box tree built by recursive median
//! splits along the longest box axis. It answers exact nearest-point and
//! radius queries by branch-and-bound, supports incremental insertion and
//! erasure, and clusters near-duplicate points ([`PointTree::repldup`]).
//!
//! ```rust
//! use surf_mesh::spatial::PointTree;
//!
//! let pts = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
//! let tree = PointTree::build(&pts);
//! assert_eq!(tree.nearest([0.9, 0.1, 0.0]), 1);
//! assert_eq!(tree.find_within([0.0, 0.0, 0.0], 1.5), vec![0, 1, 2]);
//! ```

pub mod dedup;
pub(crate) mod node;
pub mod options;
pub mod query;
pub mod tree;
mod validation;

pub use dedup::{Deduplication, NOT_FOUND};
pub use options::{NeighborhoodOptions, TreeOptions};
pub use tree::PointTree;
