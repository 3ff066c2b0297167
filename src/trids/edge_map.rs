use std::collections::{HashMap, hash_map};

use anyhow::Result as HowResult;

use super::{apex_set::ApexSet, edge::Edge};
use crate::utils::types::TriangleIdxs;

/// A 2D triangulation data structure.
///
/// Every edge of the triangulation is mapped to the apexes of its incident triangles:
///
/// ```ignore
///        c
///       / \
///      /   \
///     a --- b      {a, b} -> {c, d}
///      \   /
///       \ /
///        d
/// ```
///
/// Triangles are not stored explicitly, each one is the triple of an edge and one of its apexes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    edges: HashMap<Edge, ApexSet>,
}

impl EdgeMap {
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    pub fn with_capacity(num_vertices: usize) -> Self {
        // a planar triangulation has less than 3n edges
        Self {
            edges: HashMap::with_capacity(3 * num_vertices),
        }
    }

    /// The apexes of `edge`, inserting an empty set if the edge is not yet present.
    pub fn entry(&mut self, edge: Edge) -> &mut ApexSet {
        self.edges.entry(edge).or_default()
    }

    /// The apexes of `edge`.
    ///
    /// ## Errors
    /// Returns an error if `edge` is not part of the triangulation.
    pub fn apexes(&self, edge: Edge) -> HowResult<&ApexSet> {
        self.edges
            .get(&edge)
            .ok_or_else(|| anyhow::Error::msg(format!("{edge} is not part of the triangulation")))
    }

    pub fn get(&self, edge: &Edge) -> Option<&ApexSet> {
        self.edges.get(edge)
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.edges.contains_key(edge)
    }

    /// Removes `edge` and returns its apexes.
    pub fn remove(&mut self, edge: &Edge) -> Option<ApexSet> {
        self.edges.remove(edge)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Edge, ApexSet> {
        self.edges.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// The number of edges with a single incident triangle.
    pub fn num_hull_edges(&self) -> usize {
        self.edges.values().filter(|apexes| apexes.len() == 1).count()
    }

    /// The number of edges with two incident triangles.
    pub fn num_inner_edges(&self) -> usize {
        self.edges.values().filter(|apexes| apexes.len() == 2).count()
    }

    /// The number of triangles; each triangle is seen from each of its three edges.
    pub fn num_tris(&self) -> usize {
        self.edges.values().map(ApexSet::len).sum::<usize>() / 3
    }

    /// All triangles as ascending index triples, each reported once.
    ///
    /// A triangle `a < b < c` is reported from its edge `(a, b)`, the only one where the apex
    /// is larger than both endpoints.
    pub fn tris(&self) -> Vec<TriangleIdxs> {
        let mut tris: Vec<TriangleIdxs> = self
            .edges
            .iter()
            .flat_map(|(edge, apexes)| {
                apexes
                    .iter()
                    .filter(move |&c| c > edge.b())
                    .map(move |c| [edge.a(), edge.b(), c])
            })
            .collect();
        tris.sort_unstable();
        tris
    }
}

impl<'a> IntoIterator for &'a EdgeMap {
    type Item = (&'a Edge, &'a ApexSet);
    type IntoIter = hash_map::Iter<'a, Edge, ApexSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
