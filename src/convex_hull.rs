use std::collections::HashSet;

use crate::{trids::edge_map::EdgeMap, utils::types::VertexIdx};

/// Collect the vertices of the convex hull from a triangulation.
///
/// An inner edge borders two triangles, so every edge with fewer apexes lies on the hull and so do
/// both of its endpoints.
pub fn build_convex_hull(edges: &EdgeMap) -> HashSet<VertexIdx> {
    edges
        .iter()
        .filter(|(_, apexes)| apexes.len() != 2)
        .flat_map(|(edge, _)| edge.vertices())
        .collect()
}
