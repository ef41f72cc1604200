//! Vertex ids, edges and faces of a triangulated surface.
//!
//! Edges and faces are stored in canonical form so that structurally equal
//! entities compare equal:
//! - an [`Edge`] keeps its endpoints as `(min, max)`;
//! - a [`Face`] is rotated so its smallest vertex id comes first, which keeps
//!   the winding (and therefore the normal direction) intact.
//!
//! Both carry a [`MeshToken`] naming the mesh they belong to. The token is a
//! plain value used for identity only; ordering compares the token first and
//! then the vertex ids.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable vertex address inside one mesh.
pub type VertexId = u32;

/// Opaque identity of a mesh, chosen by its owner.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct MeshToken(u32);

impl MeshToken {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        MeshToken(raw)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MeshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh#{}", self.0)
    }
}

/// Unordered vertex pair, stored as `(min, max)`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Edge {
    token: MeshToken,
    src: VertexId,
    dst: VertexId,
}

impl Edge {
    /// Canonical edge between `a` and `b` with the default token.
    #[inline]
    pub fn new(a: VertexId, b: VertexId) -> Self {
        Self::with_token(MeshToken::default(), a, b)
    }

    #[inline]
    pub fn with_token(token: MeshToken, a: VertexId, b: VertexId) -> Self {
        Edge {
            token,
            src: a.min(b),
            dst: a.max(b),
        }
    }

    /// Smaller endpoint.
    #[inline]
    pub fn src(&self) -> VertexId {
        self.src
    }

    /// Larger endpoint.
    #[inline]
    pub fn dst(&self) -> VertexId {
        self.dst
    }

    #[inline]
    pub fn vertices(&self) -> [VertexId; 2] {
        [self.src, self.dst]
    }

    #[inline]
    pub fn token(&self) -> MeshToken {
        self.token
    }

    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.src == v || self.dst == v
    }

    /// The other endpoint, if `v` is one of them.
    pub fn opposite(&self, v: VertexId) -> Option<VertexId> {
        if v == self.src {
            Some(self.dst)
        } else if v == self.dst {
            Some(self.src)
        } else {
            None
        }
    }
}

/// Rotate `v` so the smallest id comes first, keeping the cyclic order.
#[inline]
pub fn canonical_rotation(v: [VertexId; 3]) -> [VertexId; 3] {
    if v[0] <= v[1] && v[0] <= v[2] {
        v
    } else if v[1] <= v[2] {
        [v[1], v[2], v[0]]
    } else {
        [v[2], v[0], v[1]]
    }
}

/// Triangle with canonical vertex order, an integer tag and a mesh token.
///
/// Equality, hashing and ordering ignore the tag.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Face {
    token: MeshToken,
    v: [VertexId; 3],
    tag: i32,
}

impl Face {
    /// Canonical face with tag 0 and the default token.
    #[inline]
    pub fn new(v: [VertexId; 3]) -> Self {
        Self::with_tag(v, 0)
    }

    #[inline]
    pub fn with_tag(v: [VertexId; 3], tag: i32) -> Self {
        Face {
            token: MeshToken::default(),
            v: canonical_rotation(v),
            tag,
        }
    }

    /// Same face, owned by the mesh named `token`.
    #[inline]
    pub fn in_mesh(self, token: MeshToken) -> Self {
        Face { token, ..self }
    }

    #[inline]
    pub fn vertices(&self) -> [VertexId; 3] {
        self.v
    }

    #[inline]
    pub fn tag(&self) -> i32 {
        self.tag
    }

    #[inline]
    pub fn set_tag(&mut self, tag: i32) {
        self.tag = tag;
    }

    #[inline]
    pub fn token(&self) -> MeshToken {
        self.token
    }

    /// `true` if a vertex id repeats.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.v[0] == self.v[1] || self.v[1] == self.v[2] || self.v[0] == self.v[2]
    }

    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.v.contains(&v)
    }

    /// The three edges `(v0,v1)`, `(v1,v2)`, `(v2,v0)` in canonical form.
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.v;
        [
            Edge::with_token(self.token, a, b),
            Edge::with_token(self.token, b, c),
            Edge::with_token(self.token, c, a),
        ]
    }

    /// Vertex opposite to `edge`, if the face contains both of its endpoints.
    pub fn opposite(&self, edge: &Edge) -> Option<VertexId> {
        if !(self.contains(edge.src()) && self.contains(edge.dst())) {
            return None;
        }
        self.v.iter().copied().find(|&x| !edge.contains(x))
    }

    /// The other two vertices in winding order, starting after `v`.
    pub fn others(&self, v: VertexId) -> Option<[VertexId; 2]> {
        let pos = self.v.iter().position(|&x| x == v)?;
        Some([self.v[(pos + 1) % 3], self.v[(pos + 2) % 3]])
    }

    /// Same vertices with opposite winding.
    pub fn reversed(&self) -> Self {
        Face {
            v: [self.v[0], self.v[2], self.v[1]],
            ..*self
        }
    }
}

impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token && self.v == other.v
    }
}

impl Eq for Face {}

impl Hash for Face {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
        self.v.hash(state);
    }
}

impl PartialOrd for Face {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Face {
    fn cmp(&self, other: &Self) -> Ordering {
        self.token
            .cmp(&other.token)
            .then_with(|| self.v.cmp(&other.v))
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(MeshToken, u32);
    assert_eq_size!(Edge, [u32; 3]);
}
