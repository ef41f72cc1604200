//! Structural checks for [`PointTree`].

use super::tree::PointTree;
use crate::debug_invariants::{DebugInvariants, violation};
use crate::geometry::vector::Point3;
use crate::mesh_error::SurfMeshError;

impl<S: AsRef<[Point3]>> DebugInvariants for PointTree<S> {
    const KIND: &'static str = "PointTree";

    /// Every member is in range and inside its node's box, children split
    /// their parent's members exactly, levels increase by one per step and
    /// nodes flagged as sorted really are.
    fn validate_invariants(&self) -> Result<(), SurfMeshError> {
        let pts = self.points();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.arena.get(id);
            if node.sorted && node.members.windows(2).any(|w| w[0] >= w[1]) {
                return Err(violation(format!(
                    "node at level {} is flagged sorted but is not",
                    node.level
                )));
            }
            for &m in &node.members {
                let p = pts.get(m as usize).ok_or(SurfMeshError::IndexOutOfRange {
                    index: m as usize,
                    len: pts.len(),
                })?;
                if !node.bounds.contains(*p) {
                    return Err(violation(format!(
                        "point {m} lies outside its node box at level {}",
                        node.level
                    )));
                }
            }
            let Some([left, right]) = node.children else {
                continue;
            };
            let (l, r) = (self.arena.get(left), self.arena.get(right));
            if l.level != node.level + 1 || r.level != node.level + 1 {
                return Err(violation(format!(
                    "children of a level {} node have levels {} and {}",
                    node.level, l.level, r.level
                )));
            }
            let mut parent = node.members.clone();
            let mut split = [l.members.as_slice(), r.members.as_slice()].concat();
            parent.sort_unstable();
            split.sort_unstable();
            if parent != split {
                return Err(violation(format!(
                    "children of a level {} node do not partition its {} members",
                    node.level,
                    node.members.len()
                )));
            }
            stack.extend([left, right]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn random_edits_keep_tree_consistent() {
        let mut rng = SmallRng::seed_from_u64(7);
        let pts: Vec<Point3> = (0..200).map(|_| rng.r#gen::<[f64; 3]>()).collect();
        let mut tree = PointTree::build(pts);
        assert!(tree.validate_invariants().is_ok());
        for i in 0..100 {
            if i % 3 == 0 {
                tree.erase(rng.gen_range(0..tree.points().len() as u32));
            } else {
                tree.insert(rng.r#gen::<[f64; 3]>());
            }
        }
        tree.debug_assert_invariants();
        assert!(tree.validate_invariants().is_ok());
    }

    #[test]
    fn corrupted_partition_is_reported() {
        let pts: Vec<Point3> = (0..40).map(|i| [i as f64, 0.0, 0.0]).collect();
        let mut tree = PointTree::build(&pts);
        let root = tree.root;
        let [left, _] = tree.arena.get(root).children.unwrap();
        tree.arena.get_mut(left).members.pop();
        assert!(matches!(
            tree.validate_invariants(),
            Err(SurfMeshError::InvariantViolation(_))
        ));
    }
}
