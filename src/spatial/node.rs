//! Arena storage for point-tree nodes.
//!
//! Nodes refer to their children by arena index. Demoted subtrees are
//! returned to a free list and reused by later splits.

use crate::geometry::bounds::BoundingBox;

pub(crate) type NodeId = u32;

#[derive(Clone, Debug)]
pub(crate) struct IndexNode {
    /// Depth below the root (root is 0).
    pub level: u32,
    /// Every point index stored in this subtree.
    pub members: Vec<u32>,
    /// Encloses everything ever inserted below this node; never shrinks on erase.
    pub bounds: BoundingBox,
    /// `members` is in ascending order.
    pub sorted: bool,
    pub children: Option<[NodeId; 2]>,
}

impl IndexNode {
    pub fn leaf(level: u32, members: Vec<u32>) -> Self {
        Self {
            level,
            members,
            bounds: BoundingBox::empty(),
            sorted: false,
            children: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<IndexNode>,
    free: Vec<NodeId>,
}

impl NodeArena {
    pub fn alloc(&mut self, node: IndexNode) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id as usize] = node;
                id
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as NodeId
            }
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &IndexNode {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut IndexNode {
        &mut self.nodes[id as usize]
    }

    /// Number of nodes reachable from the tree (allocated minus freed).
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Remove `idx` from the members of `id`, sorting them first if needed.
    pub fn remove_member(&mut self, id: NodeId, idx: u32) -> bool {
        let node = self.get_mut(id);
        if !node.sorted {
            node.members.sort_unstable();
            node.sorted = true;
        }
        match node.members.binary_search(&idx) {
            Ok(pos) => {
                node.members.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Turn `id` back into a leaf and free all of its descendants.
    pub fn demote(&mut self, id: NodeId) {
        let mut stack: Vec<NodeId> = self.get_mut(id).children.take().into_iter().flatten().collect();
        while let Some(child) = stack.pop() {
            let node = self.get_mut(child);
            if let Some(grand) = node.children.take() {
                stack.extend(grand);
            }
            node.members = Vec::new();
            self.free.push(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demote_recycles_subtree() {
        let mut arena = NodeArena::default();
        let root = arena.alloc(IndexNode::leaf(0, vec![0, 1, 2]));
        let l = arena.alloc(IndexNode::leaf(1, vec![0]));
        let r = arena.alloc(IndexNode::leaf(1, vec![1, 2]));
        let rl = arena.alloc(IndexNode::leaf(2, vec![1]));
        let rr = arena.alloc(IndexNode::leaf(2, vec![2]));
        arena.get_mut(root).children = Some([l, r]);
        arena.get_mut(r).children = Some([rl, rr]);
        assert_eq!(arena.live(), 5);

        arena.demote(root);
        assert!(arena.get(root).children.is_none());
        assert_eq!(arena.live(), 1);
        let reused = arena.alloc(IndexNode::leaf(1, vec![]));
        assert!(reused != root && (reused as usize) < 5);
    }

    #[test]
    fn remove_member_sorts_lazily() {
        let mut arena = NodeArena::default();
        let id = arena.alloc(IndexNode::leaf(0, vec![5, 1, 3]));
        assert!(!arena.get(id).sorted);
        assert!(arena.remove_member(id, 3));
        assert!(arena.get(id).sorted);
        assert_eq!(arena.get(id).members, vec![1, 5]);
        assert!(!arena.remove_member(id, 3));
    }
}
