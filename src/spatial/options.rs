//! Tuning knobs for [`PointTree`](super::PointTree) construction and queries.

use serde::{Deserialize, Serialize};

/// Construction options for a point tree.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeOptions {
    /// Leaves hold at most this many indices unless their box is degenerate.
    pub leaf_threshold: usize,
    /// Boxes whose diagonal is at or below this length are never split.
    pub min_diagonal: f64,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            leaf_threshold: 8,
            min_diagonal: f64::EPSILON,
        }
    }
}

impl TreeOptions {
    /// Leaf threshold clamped to at least one, so splits always make progress.
    #[inline]
    pub(crate) fn threshold(&self) -> usize {
        self.leaf_threshold.max(1)
    }
}

/// Radius search parameters for [`PointTree::neighborhood_with`](super::PointTree::neighborhood_with).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodOptions {
    /// Maximum number of radius adjustments.
    pub max_iterations: usize,
    /// Smallest factor applied when the radius must change.
    pub min_growth: f64,
    /// Largest factor applied in a single adjustment.
    pub max_growth: f64,
}

impl Default for NeighborhoodOptions {
    fn default() -> Self {
        Self {
            max_iterations: 16,
            min_growth: 1.25,
            max_growth: 4.0,
        }
    }
}
