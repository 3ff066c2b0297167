use anyhow::Result as HowResult;

use crate::utils::types::VertexIdx;

/// Neighbors of a vertex on the hull front.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub struct FrontNode {
    pub left: VertexIdx,
    pub right: VertexIdx,
}

/// The boundary of the region swept so far, a cyclic doubly linked list addressed by vertex index.
///
/// Walking `right` traverses the boundary clockwise, walking `left` counter-clockwise.
/// Slots of vertices that were never inserted, or that got enclosed, hold stale links.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HullFront {
    nodes: Vec<FrontNode>,
}

impl HullFront {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            nodes: vec![FrontNode::default(); num_vertices],
        }
    }

    /// Link `a` and `b` into the degenerate two-node cycle the sweep starts from.
    pub fn seed_pair(&mut self, a: VertexIdx, b: VertexIdx) {
        self.nodes[a] = FrontNode { left: b, right: b };
        self.nodes[b] = FrontNode { left: a, right: a };
    }

    pub fn left(&self, v: VertexIdx) -> VertexIdx {
        self.nodes[v].left
    }

    pub fn right(&self, v: VertexIdx) -> VertexIdx {
        self.nodes[v].right
    }

    pub fn set_left(&mut self, v: VertexIdx, left: VertexIdx) {
        self.nodes[v].left = left;
    }

    pub fn set_right(&mut self, v: VertexIdx, right: VertexIdx) {
        self.nodes[v].right = right;
    }

    /// Link `v` in between `left` and `right`, dropping whatever lay between them.
    pub fn splice(&mut self, v: VertexIdx, left: VertexIdx, right: VertexIdx) {
        self.nodes[v] = FrontNode { left, right };
        self.nodes[right].left = v;
        self.nodes[left].right = v;
    }

    /// The vertices of the cycle through `start`, counter-clockwise.
    ///
    /// ## Errors
    /// Returns an error if the `left` links do not lead back to `start`.
    pub fn cycle(&self, start: VertexIdx) -> HowResult<Vec<VertexIdx>> {
        let mut cycle = vec![start];
        let mut current = self.left(start);

        while current != start {
            if cycle.len() >= self.nodes.len() {
                return Err(anyhow::Error::msg(format!(
                    "Hull front does not close at vertex {start}"
                )));
            }
            cycle.push(current);
            current = self.left(current);
        }

        Ok(cycle)
    }

    /// Check if `left` and `right` links are inverse to each other along the cycle through `start`.
    pub fn is_sound(&self, start: VertexIdx) -> bool {
        match self.cycle(start) {
            Ok(cycle) => cycle.iter().all(|&v| self.right(self.left(v)) == v),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
