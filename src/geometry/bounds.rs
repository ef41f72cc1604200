//! Axis-aligned bounding boxes.
//!
//! A [`BoundingBox`] may be empty; the empty box has inverted corners so that
//! enclosing the first point yields a degenerate box around that point.

use serde::{Deserialize, Serialize};

use super::vector::{Point3, distance_sq, norm, sub};

/// Axis-aligned box with corners `lo <= hi` (componentwise) unless empty.
///
/// Serialized as `[lo, hi]`, or as none for the empty box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "Option<[Point3; 2]>", from = "Option<[Point3; 2]>")]
pub struct BoundingBox {
    lo: Point3,
    hi: Point3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<BoundingBox> for Option<[Point3; 2]> {
    fn from(bb: BoundingBox) -> Self {
        (!bb.is_empty()).then_some([bb.lo, bb.hi])
    }
}

impl From<Option<[Point3; 2]>> for BoundingBox {
    fn from(corners: Option<[Point3; 2]>) -> Self {
        match corners {
            Some([a, b]) => BoundingBox::new(a, b),
            None => BoundingBox::empty(),
        }
    }
}

impl BoundingBox {
    /// An empty box that encloses nothing.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            lo: [f64::INFINITY; 3],
            hi: [f64::NEG_INFINITY; 3],
        }
    }

    /// Box with the given corners; corners are reordered componentwise.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            lo: [a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])],
            hi: [a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])],
        }
    }

    /// Smallest box enclosing all `points`.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut bb = Self::empty();
        for p in points {
            bb.enclose(*p);
        }
        bb
    }

    #[inline]
    pub fn lo(&self) -> Point3 {
        self.lo
    }

    #[inline]
    pub fn hi(&self) -> Point3 {
        self.hi
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lo[0] > self.hi[0] || self.lo[1] > self.hi[1] || self.lo[2] > self.hi[2]
    }

    /// Grow the box to contain `p`.
    #[inline]
    pub fn enclose(&mut self, p: Point3) {
        for k in 0..3 {
            self.lo[k] = self.lo[k].min(p[k]);
            self.hi[k] = self.hi[k].max(p[k]);
        }
    }

    /// Grow the box to contain `other`.
    pub fn enclose_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.enclose(other.lo);
        self.enclose(other.hi);
    }

    /// Edge lengths along x, y and z (zero for an empty box).
    pub fn extent(&self) -> Point3 {
        if self.is_empty() {
            return [0.0; 3];
        }
        sub(self.hi, self.lo)
    }

    /// Length of the space diagonal (zero for an empty box).
    pub fn diagonal(&self) -> f64 {
        norm(self.extent())
    }

    /// Axis of largest extent, ties resolved towards x.
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e[0] >= e[1] && e[0] >= e[2] {
            0
        } else if e[1] >= e[2] {
            1
        } else {
            2
        }
    }

    pub fn center(&self) -> Point3 {
        [
            0.5 * (self.lo[0] + self.hi[0]),
            0.5 * (self.lo[1] + self.hi[1]),
            0.5 * (self.lo[2] + self.hi[2]),
        ]
    }

    /// Volume of the box (zero for empty or flat boxes).
    pub fn volume(&self) -> f64 {
        let e = self.extent();
        e[0] * e[1] * e[2]
    }

    pub fn contains(&self, p: Point3) -> bool {
        (0..3).all(|k| self.lo[k] <= p[k] && p[k] <= self.hi[k])
    }

    /// Squared distance from `p` to the box; 0 inside, infinite for an empty box.
    ///
    /// This is a lower bound for the distance from `p` to anything enclosed.
    #[inline]
    pub fn distance_sq(&self, p: Point3) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        let mut clamped = p;
        for k in 0..3 {
            clamped[k] = p[k].clamp(self.lo[k], self.hi[k]);
        }
        distance_sq(p, clamped)
    }

    #[inline]
    pub fn distance(&self, p: Point3) -> f64 {
        self.distance_sq(p).sqrt()
    }
}
