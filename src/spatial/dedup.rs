//! Duplicate-point clustering on top of radius queries.

use itertools::Itertools;

use super::tree::PointTree;
use crate::geometry::vector::Point3;

/// Marker for points that are not part of a [`Deduplication`].
pub const NOT_FOUND: u32 = u32::MAX;

/// Result of [`PointTree::repldup`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deduplication {
    /// For every point of the array, the compacted index of its representative,
    /// or [`NOT_FOUND`] for points that were not indexed.
    pub replacement: Vec<u32>,
    /// Original indices of the representatives, in ascending order.
    pub kept: Vec<u32>,
}

impl Deduplication {
    /// Number of surviving points.
    #[inline]
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Original index of the point that replaces `idx`.
    pub fn representative(&self, idx: u32) -> Option<u32> {
        match self.replacement.get(idx as usize) {
            Some(&r) if r != NOT_FOUND => Some(self.kept[r as usize]),
            _ => None,
        }
    }

    /// `(duplicate, representative)` pairs in original numbering.
    pub fn duplicates(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.replacement
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r != NOT_FOUND)
            .map(|(i, &r)| (i as u32, self.kept[r as usize]))
            .filter(|&(i, rep)| i != rep)
    }

    /// Original-numbering map: every indexed point to its representative.
    pub fn to_original(&self) -> Vec<u32> {
        (0..self.replacement.len() as u32)
            .map(|i| self.representative(i).unwrap_or(NOT_FOUND))
            .collect_vec()
    }
}

impl<S: AsRef<[Point3]>> PointTree<S> {
    /// Cluster points closer than `threshold`.
    ///
    /// Single forward pass in index order: every point not yet claimed
    /// becomes a representative and claims all later points within
    /// `threshold` of it. Clusters therefore always resolve to their
    /// earliest index, which is not a globally optimal clustering.
    pub fn repldup(&self, threshold: f64) -> Deduplication {
        let n = self.points().len();
        let mut replacement = vec![NOT_FOUND; n];
        let mut kept = Vec::new();
        let mut hits = Vec::new();

        for i in self.indices() {
            if replacement[i as usize] != NOT_FOUND {
                continue;
            }
            let new = kept.len() as u32;
            kept.push(i);
            replacement[i as usize] = new;

            hits.clear();
            self.find(self.point(i), threshold, &mut hits);
            for &j in &hits {
                if j > i && replacement[j as usize] == NOT_FOUND {
                    replacement[j as usize] = new;
                }
            }
        }

        log::debug!(
            "repldup: {} of {} indexed points kept (threshold {threshold:e})",
            kept.len(),
            self.len()
        );
        Deduplication { replacement, kept }
    }
}
