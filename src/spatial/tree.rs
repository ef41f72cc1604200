//! Construction and incremental maintenance of [`PointTree`].

use super::node::{IndexNode, NodeArena, NodeId};
use super::options::TreeOptions;
use crate::geometry::bounds::BoundingBox;
use crate::geometry::vector::{Point3, distance_sq};
use crate::mesh_error::SurfMeshError;

/// Binary bounding-box tree over a point array.
///
/// The tree stores point *indices*; the coordinates live in `S`, which is
/// either borrowed (`&[Point3]`, `&Vec<Point3>`) or owned (`Vec<Point3>`).
/// Only an owned array can grow through [`PointTree::insert`].
///
/// Coordinates must not change while a tree refers to them; build a new tree
/// instead. Trees are meant to be short-lived snapshots.
#[derive(Clone, Debug)]
pub struct PointTree<S = Vec<Point3>> {
    pub(crate) points: S,
    pub(crate) arena: NodeArena,
    pub(crate) root: NodeId,
    pub(crate) options: TreeOptions,
}

impl<S: AsRef<[Point3]>> PointTree<S> {
    /// Index every point of `points` with default options.
    pub fn build(points: S) -> Self {
        Self::build_with(points, TreeOptions::default())
    }

    /// Index every point of `points`.
    pub fn build_with(points: S, options: TreeOptions) -> Self {
        let n = points.as_ref().len();
        let members: Vec<u32> = (0..n as u32).collect();
        Self::from_members(points, members, options)
    }

    /// Index only the listed points; the rest of the array is ignored by queries.
    pub fn from_indices(
        points: S,
        indices: &[u32],
        options: TreeOptions,
    ) -> Result<Self, SurfMeshError> {
        let len = points.as_ref().len();
        let mut members = indices.to_vec();
        members.sort_unstable();
        members.dedup();
        if let Some(&bad) = members.iter().find(|&&i| i as usize >= len) {
            return Err(SurfMeshError::IndexOutOfRange {
                index: bad as usize,
                len,
            });
        }
        Ok(Self::from_members(points, members, options))
    }

    pub(crate) fn from_members(points: S, members: Vec<u32>, options: TreeOptions) -> Self {
        let mut arena = NodeArena::default();
        let root = arena.alloc(IndexNode::leaf(0, members));
        subdivide(&mut arena, points.as_ref(), root, &options);
        log::trace!(
            "built point tree over {} points with {} nodes",
            arena.get(root).members.len(),
            arena.live()
        );
        Self {
            points,
            arena,
            root,
            options,
        }
    }

    /// Number of indexed points.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.get(self.root).members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole point array, including points that were erased from the index.
    #[inline]
    pub fn points(&self) -> &[Point3] {
        self.points.as_ref()
    }

    #[inline]
    pub fn point(&self, idx: u32) -> Point3 {
        self.points.as_ref()[idx as usize]
    }

    #[inline]
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Box of the root node. May be larger than the current points after erasures.
    pub fn bounds(&self) -> BoundingBox {
        self.arena.get(self.root).bounds
    }

    /// Number of levels below the root of the deepest leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.arena.get(id);
            match node.children {
                Some(children) => stack.extend(children),
                None => deepest = deepest.max(node.level as usize),
            }
        }
        deepest
    }

    /// Number of leaves currently in the tree.
    pub fn leaf_count(&self) -> usize {
        let mut leaves = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match self.arena.get(id).children {
                Some(children) => stack.extend(children),
                None => leaves += 1,
            }
        }
        leaves
    }

    /// `true` if `idx` is currently indexed.
    pub fn contains(&self, idx: u32) -> bool {
        let root = self.arena.get(self.root);
        if root.sorted {
            root.members.binary_search(&idx).is_ok()
        } else {
            root.members.contains(&idx)
        }
    }

    /// Indexed point indices in ascending order.
    pub fn indices(&self) -> Vec<u32> {
        let mut members = self.arena.get(self.root).members.clone();
        if !self.arena.get(self.root).sorted {
            members.sort_unstable();
        }
        members
    }

    /// Remove `idx` from the index. The coordinate stays in the point array.
    ///
    /// Returns `false` if `idx` was not indexed. Boxes are left as they are;
    /// an internal node left with at most `leaf_threshold` members drops its
    /// children and becomes a leaf again.
    pub fn erase(&mut self, idx: u32) -> bool {
        let mut id = self.root;
        if !self.arena.remove_member(id, idx) {
            return false;
        }
        let threshold = self.options.threshold();
        loop {
            let node = self.arena.get(id);
            let Some([left, right]) = node.children else {
                break;
            };
            if node.members.len() <= threshold {
                log::trace!("demoting node at level {} to a leaf", node.level);
                self.arena.demote(id);
                break;
            }
            id = if self.arena.remove_member(left, idx) {
                left
            } else if self.arena.remove_member(right, idx) {
                right
            } else {
                debug_assert!(false, "index {idx} missing from both children");
                break;
            };
        }
        true
    }
}

impl PointTree<Vec<Point3>> {
    /// Append `p` to the point array and thread it into the tree.
    ///
    /// The index descends into the child whose box is nearer to `p`, growing
    /// every box on the way. An overflowing leaf is split in place. The tree
    /// is not rebalanced, so long runs of sorted insertions degrade queries.
    pub fn insert(&mut self, p: Point3) -> u32 {
        let idx = self.points.len() as u32;
        self.points.push(p);
        let pts = self.points.as_slice();
        let threshold = self.options.threshold();

        let mut id = self.root;
        loop {
            let node = self.arena.get_mut(id);
            node.bounds.enclose(p);
            node.members.push(idx);
            node.sorted = false;
            let children = node.children;
            match children {
                Some([left, right]) => {
                    id = nearer_child(&self.arena, left, right, p);
                }
                None => {
                    if node.members.len() > threshold
                        && node.bounds.diagonal() > self.options.min_diagonal
                    {
                        subdivide(&mut self.arena, pts, id, &self.options);
                    }
                    break;
                }
            }
        }
        idx
    }

    /// Give back the point array.
    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }
}

pub(crate) fn nearer_child(arena: &NodeArena, left: NodeId, right: NodeId, p: Point3) -> NodeId {
    let lb = &arena.get(left).bounds;
    let rb = &arena.get(right).bounds;
    let dl = lb.distance_sq(p);
    let dr = rb.distance_sq(p);
    if dl < dr {
        left
    } else if dr < dl {
        right
    } else if distance_sq(lb.center(), p) <= distance_sq(rb.center(), p) {
        left
    } else {
        right
    }
}

/// Recompute the box of `id` and split it along its longest axis at the median.
///
/// The node keeps its full member list; the children receive the two halves.
/// An existing box is only ever grown, never replaced by a tighter one.
fn subdivide(arena: &mut NodeArena, pts: &[Point3], id: NodeId, options: &TreeOptions) {
    let node = arena.get_mut(id);
    let mut bounds = BoundingBox::from_points(node.members.iter().map(|&i| &pts[i as usize]));
    bounds.enclose_box(&node.bounds);
    node.bounds = bounds;

    if node.members.len() <= options.threshold() || bounds.diagonal() <= options.min_diagonal {
        node.children = None;
        return;
    }

    let axis = bounds.longest_axis();
    let mid = node.members.len() / 2;
    node.members.select_nth_unstable_by(mid, |&a, &b| {
        pts[a as usize][axis].total_cmp(&pts[b as usize][axis])
    });
    node.sorted = false;
    let left_members = node.members[..mid].to_vec();
    let right_members = node.members[mid..].to_vec();
    let level = node.level + 1;

    let left = arena.alloc(IndexNode::leaf(level, left_members));
    let right = arena.alloc(IndexNode::leaf(level, right_members));
    arena.get_mut(id).children = Some([left, right]);
    subdivide(arena, pts, left, options);
    subdivide(arena, pts, right, options);
}
