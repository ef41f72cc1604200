//! Nearest-point and radius queries on [`PointTree`].

use super::node::NodeId;
use super::options::NeighborhoodOptions;
use super::tree::{PointTree, nearer_child};
use crate::geometry::vector::{Point3, distance, distance_sq};
use crate::mesh_error::SurfMeshError;

#[derive(Clone, Copy, Debug)]
struct Best {
    index: u32,
    dist_sq: f64,
}

impl Best {
    #[inline]
    fn offer(&mut self, index: u32, dist_sq: f64) {
        if dist_sq < self.dist_sq || (dist_sq == self.dist_sq && index < self.index) {
            self.index = index;
            self.dist_sq = dist_sq;
        }
    }
}

impl<S: AsRef<[Point3]>> PointTree<S> {
    /// Index of the indexed point closest to `p`.
    ///
    /// Ties are resolved towards the smaller index, so the result matches a
    /// linear scan exactly.
    ///
    /// # Panics
    /// Panics if the tree is empty or `p` has a non-finite coordinate.
    pub fn nearest(&self, p: Point3) -> u32 {
        assert!(!self.is_empty(), "nearest() called on an empty PointTree");
        assert!(
            p.iter().all(|x| x.is_finite()),
            "nearest() called with non-finite point {p:?}"
        );
        let mut best = Best {
            index: u32::MAX,
            dist_sq: f64::INFINITY,
        };
        self.nearest_in(self.root, p, None, &mut best);
        best.index
    }

    /// Index of the indexed point closest to point `idx`, excluding `idx` itself.
    ///
    /// Returns `Ok(None)` when `idx` is the only indexed point.
    ///
    /// # Panics
    /// Panics if the tree is empty.
    pub fn nearest_other(&self, idx: u32) -> Result<Option<u32>, SurfMeshError> {
        assert!(!self.is_empty(), "nearest_other() called on an empty PointTree");
        let len = self.points().len();
        if idx as usize >= len {
            return Err(SurfMeshError::IndexOutOfRange {
                index: idx as usize,
                len,
            });
        }
        let mut best = Best {
            index: u32::MAX,
            dist_sq: f64::INFINITY,
        };
        self.nearest_in(self.root, self.point(idx), Some(idx), &mut best);
        Ok((best.index != u32::MAX).then_some(best.index))
    }

    fn nearest_in(&self, id: NodeId, p: Point3, exclude: Option<u32>, best: &mut Best) {
        let node = self.arena.get(id);
        match node.children {
            None => {
                let pts = self.points();
                for &i in &node.members {
                    if Some(i) == exclude {
                        continue;
                    }
                    best.offer(i, distance_sq(pts[i as usize], p));
                }
            }
            Some([left, right]) => {
                let dl = self.arena.get(left).bounds.distance_sq(p);
                let dr = self.arena.get(right).bounds.distance_sq(p);
                let ((first, d_first), (second, d_second)) = if dl <= dr {
                    ((left, dl), (right, dr))
                } else {
                    ((right, dr), (left, dl))
                };
                if d_first <= best.dist_sq {
                    self.nearest_in(first, p, exclude, best);
                }
                // equal distance may still hold a smaller index
                if d_second <= best.dist_sq {
                    self.nearest_in(second, p, exclude, best);
                }
            }
        }
    }

    /// Append every indexed point strictly closer than `radius` to `p` to `out`.
    ///
    /// The appended indices are in ascending order. Returns how many were added.
    pub fn find(&self, p: Point3, radius: f64, out: &mut Vec<u32>) -> usize {
        let start = out.len();
        if radius > 0.0 && !self.is_empty() {
            self.find_in(self.root, p, radius, out);
        }
        out[start..].sort_unstable();
        out.len() - start
    }

    /// Indices of all indexed points strictly closer than `radius` to `p`.
    pub fn find_within(&self, p: Point3, radius: f64) -> Vec<u32> {
        let mut out = Vec::new();
        self.find(p, radius, &mut out);
        out
    }

    fn find_in(&self, id: NodeId, p: Point3, radius: f64, out: &mut Vec<u32>) {
        let node = self.arena.get(id);
        if !(node.bounds.distance(p) < radius) {
            return;
        }
        match node.children {
            None => {
                let pts = self.points();
                out.extend(
                    node.members
                        .iter()
                        .copied()
                        .filter(|&i| distance(pts[i as usize], p) < radius),
                );
            }
            Some([left, right]) => {
                self.find_in(left, p, radius, out);
                self.find_in(right, p, radius, out);
            }
        }
    }

    /// Collect between `n_min` and `n_max` points around `p` with default options.
    pub fn neighborhood(&self, p: Point3, n_min: usize, n_max: usize, out: &mut Vec<u32>) -> usize {
        self.neighborhood_with(p, n_min, n_max, &NeighborhoodOptions::default(), out)
    }

    /// Adaptive radius search around `p`.
    ///
    /// Starts from a radius estimated from the point density of the leaf
    /// reached by descending towards `p` and rescales it until the number of hits lies in `[n_min, n_max]` or the
    /// iteration budget runs out. The result of the last search is left in
    /// `out` (replacing anything appended earlier by this call) and its size
    /// returned; it may lie outside the requested range.
    ///
    /// # Panics
    /// Panics if the tree is empty or `p` has a non-finite coordinate.
    pub fn neighborhood_with(
        &self,
        p: Point3,
        n_min: usize,
        n_max: usize,
        options: &NeighborhoodOptions,
        out: &mut Vec<u32>,
    ) -> usize {
        assert!(!self.is_empty(), "neighborhood() called on an empty PointTree");
        assert!(
            p.iter().all(|x| x.is_finite()),
            "neighborhood() called with non-finite point {p:?}"
        );
        let n = self.len();
        let n_max = n_max.max(n_min).max(1);
        let n_min = n_min.min(n);
        let target = (0.5 * (n_min + n_max.min(n)) as f64).max(1.0);

        let (mut radius, inv_dim) = self.seed_radius(p, target);
        if !(radius > 0.0) {
            radius = f64::MIN_POSITIVE;
        }

        let start = out.len();
        let mut count = 0;
        for _ in 0..options.max_iterations.max(1) {
            out.truncate(start);
            count = self.find(p, radius, out);
            if count >= n_min && count <= n_max {
                break;
            }
            let ratio = (target / count.max(1) as f64).powf(inv_dim);
            let factor = if count < n_min {
                ratio.clamp(options.min_growth, options.max_growth)
            } else {
                ratio.clamp(1.0 / options.max_growth, 1.0 / options.min_growth)
            };
            radius *= factor;
        }
        count
    }
}

impl<S: AsRef<[Point3]>> PointTree<S> {
    /// Initial radius expected to hold `target` points around `p`, with the
    /// reciprocal of the dimension used for rescaling.
    ///
    /// The leaf on the nearer-child path towards `p` holds its members within
    /// half its diagonal; that local density is extrapolated to `target`.
    /// Leaves too small to measure fall back to the density of the root box.
    fn seed_radius(&self, p: Point3, target: f64) -> (f64, f64) {
        let mut id = self.root;
        while let Some([left, right]) = self.arena.get(id).children {
            id = nearer_child(&self.arena, left, right, p);
        }
        let leaf = self.arena.get(id);
        let leaf_diag = leaf.bounds.diagonal();
        let measurable = leaf.members.len() >= 2 && leaf_diag > self.options.min_diagonal;
        let (bounds, count, reach) = if measurable {
            (leaf.bounds, leaf.members.len(), 0.5 * leaf_diag)
        } else {
            let root = self.bounds();
            (root, self.len(), root.diagonal())
        };
        let dim = effective_dimension(bounds.extent(), bounds.diagonal());
        let inv_dim = 1.0 / dim as f64;
        let radius = reach * (target / count as f64).powf(inv_dim) + bounds.distance(p);
        (radius, inv_dim)
    }
}

/// Number of box axes with non-negligible extent, at least one.
fn effective_dimension(extent: Point3, diag: f64) -> usize {
    let tol = 1e-9 * diag;
    extent.iter().filter(|&&e| e > tol).count().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<Point3> {
        let mut pts = Vec::new();
        for i in 0..n {
            for j in 0..n {
                pts.push([i as f64, j as f64, 0.0]);
            }
        }
        pts
    }

    #[test]
    fn nearest_on_grid() {
        let pts = grid(10);
        let tree = PointTree::build(&pts);
        assert_eq!(tree.nearest([3.2, 4.4, 0.3]), 34);
        assert_eq!(tree.nearest([-5.0, -5.0, 0.0]), 0);
    }

    #[test]
    fn nearest_prefers_lower_index_on_ties() {
        let pts = vec![[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let tree = PointTree::build(&pts);
        assert_eq!(tree.nearest([0.0; 3]), 0);
        assert_eq!(tree.nearest_other(0).unwrap(), Some(2));
    }

    #[test]
    fn nearest_other_single_point() {
        let pts = vec![[0.0; 3]];
        let tree = PointTree::build(&pts);
        assert_eq!(tree.nearest_other(0).unwrap(), None);
        assert!(tree.nearest_other(5).is_err());
    }

    #[test]
    #[should_panic(expected = "empty PointTree")]
    fn nearest_on_empty_tree_panics() {
        let pts: Vec<Point3> = Vec::new();
        PointTree::build(&pts).nearest([0.0; 3]);
    }

    #[test]
    #[should_panic(expected = "non-finite point")]
    fn nearest_rejects_nan_query() {
        let pts = grid(3);
        PointTree::build(&pts).nearest([f64::NAN, 0.0, 0.0]);
    }

    #[test]
    fn find_is_strict() {
        let pts = grid(5);
        let tree = PointTree::build(&pts);
        assert_eq!(tree.find_within([0.0; 3], 1.0), vec![0]);
        assert_eq!(tree.find_within([0.0; 3], 1.0 + 1e-12), vec![0, 1, 5]);
        assert!(tree.find_within([0.0; 3], 0.0).is_empty());
    }

    #[test]
    fn neighborhood_hits_requested_range() {
        let pts = grid(20);
        let tree = PointTree::build(&pts);
        let mut out = Vec::new();
        let count = tree.neighborhood([10.0, 10.0, 0.0], 8, 30, &mut out);
        assert_eq!(count, out.len());
        assert!((8..=30).contains(&count), "got {count}");
    }

    #[test]
    fn neighborhood_far_away_still_converges() {
        let pts = grid(10);
        let tree = PointTree::build(&pts);
        let mut out = vec![999];
        let count = tree.neighborhood([100.0, 100.0, 0.0], 1, 200, &mut out);
        assert!(count >= 1);
        assert_eq!(out[0], 999);
        assert_eq!(out.len(), count + 1);
    }
}
