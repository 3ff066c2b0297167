use core::cmp::Ordering;

use super::types::{Vertex2, VertexIdx};

/// Sweep order of the vertices: ascending by x, ties broken by ascending y.
///
/// Returns the permutation, i.e. `order[k]` is the index into `vertices` of the `k`-th vertex swept.
/// The sort is stable, so exact duplicates keep their input order.
pub fn sort_along_x_axis(vertices: &[Vertex2]) -> Vec<VertexIdx> {
    let mut order: Vec<VertexIdx> = (0..vertices.len()).collect();
    order.sort_by(|&i, &j| sweep_cmp(&vertices[i], &vertices[j]));
    order
}

/// Lexicographic `(x, y)` comparison, total on finite coordinates.
pub fn sweep_cmp(a: &Vertex2, b: &Vertex2) -> Ordering {
    a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1]))
}

/// Finds the first pair of coincident vertices along `order`.
///
/// Duplicates are adjacent in sweep order, so one linear pass suffices.
pub fn find_duplicate(vertices: &[Vertex2], order: &[VertexIdx]) -> Option<(VertexIdx, VertexIdx)> {
    order
        .windows(2)
        .find(|pair| vertices[pair[0]] == vertices[pair[1]])
        .map(|pair| (pair[0], pair[1]))
}
