use core::fmt;

use crate::utils::types::VertexIdx;

/// An undirected edge between two vertices, the key of the [`EdgeMap`](super::edge_map::EdgeMap).
///
/// The pair is canonicalized on construction, i.e. `Edge::new(a, b) == Edge::new(b, a)`,
/// so equality and hashing never depend on the order a call site passes its endpoints in.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone, Debug)]
pub struct Edge {
    a: VertexIdx,
    b: VertexIdx,
}

impl Edge {
    pub const fn new(a: VertexIdx, b: VertexIdx) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// The smaller endpoint.
    pub const fn a(&self) -> VertexIdx {
        self.a
    }

    /// The larger endpoint.
    pub const fn b(&self) -> VertexIdx {
        self.b
    }

    pub const fn vertices(&self) -> [VertexIdx; 2] {
        [self.a, self.b]
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({}, {})", self.a, self.b)
    }
}
