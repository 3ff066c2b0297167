use core::fmt;
use std::collections::HashSet;

use anyhow::Result as HowResult;
use log::error;
use nalgebra::Matrix3;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    builder::DelaunayBuilder,
    convex_hull::build_convex_hull,
    predicates::orient_2d,
    trids::{apex_set::ApexSet, edge::Edge, edge_map::EdgeMap, hull_front::HullFront},
    utils::{
        convexity::is_convex,
        types::{Edge2, InputIdx, Triangle2, TriangleIdxs, Vertex2, VertexIdx},
    },
};

/// A 2D Delaunay triangulation, computed by a sweep along the x-axis.
///
/// Vertex indices refer to the vertices in sweep order, i.e. sorted by x and then by y.
/// Use [`Triangulation::input_index`] to get back to the position in the input.
///
/// ```
/// use sweepline::Triangulation;
///
/// let vertices = vec![
///     [0.0, 0.0],
///     [-0.5, 1.0],
///     [0.0, 2.5],
///     [2.0, 3.0],
///     [4.0, 2.5],
///     [5.0, 1.5],
///     [4.5, 0.5],
///     [2.5, -0.5],
///     [1.5, 1.5],
///     [3.0, 1.0],
/// ];
///
/// let triangulation = Triangulation::create(vertices).unwrap();
///
/// assert!(triangulation.is_sound().unwrap());
/// assert_eq!(triangulation.par_is_delaunay(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Triangulation {
    epsilon: f64,
    vertices: Vec<Vertex2>,
    input_indices: Vec<InputIdx>,
    edges: EdgeMap,
    hull: HullFront,
}

/// Read-only view on the two parts a [`Triangulation`] consists of.
#[derive(Debug, Clone, Copy)]
pub struct TriangulationView<'a> {
    pub edges: &'a EdgeMap,
    pub vertices: &'a [Vertex2],
}

/// Create a [`Triangulation`] from a slice of vertices, with an optional epsilon.
///
/// ## Example
/// ```
/// # use sweepline::triangulation;
/// let triangulation = triangulation!(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
/// assert_eq!(triangulation.num_tris(), 1);
/// // with epsilon
/// let triangulation = triangulation!(&[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]], epsilon = 1e-12).unwrap();
/// assert_eq!(triangulation.epsilon(), 1e-12);
/// ```
#[macro_export]
macro_rules! triangulation {
    ($vertices:expr) => {{
        $crate::Triangulation::create($vertices.to_vec())
    }};
    ($vertices:expr, epsilon = $epsilon:expr) => {{
        $crate::Triangulation::create_with_epsilon($vertices.to_vec(), $epsilon)
    }};
}

impl Triangulation {
    pub(crate) const fn from_parts(
        epsilon: f64,
        vertices: Vec<Vertex2>,
        input_indices: Vec<InputIdx>,
        edges: EdgeMap,
        hull: HullFront,
    ) -> Self {
        Self {
            epsilon,
            vertices,
            input_indices,
            edges,
            hull,
        }
    }

    /// Triangulate `vertices` with the default epsilon.
    ///
    /// Flips are decided up to [`DEFAULT_EPSILON`](crate::DEFAULT_EPSILON), so edges whose
    /// in-circle determinant lies within that tolerance are kept. Over many insertions these
    /// near-violations can add up, and [`Triangulation::is_delaunay`] may report a few edges
    /// exceeding the tolerance slightly. Use [`Triangulation::create_with_epsilon`] with a smaller
    /// epsilon, e.g. `1e-15`, for a strict result.
    ///
    /// ## Errors
    /// See [`DelaunayBuilder::build`].
    pub fn create(vertices: Vec<Vertex2>) -> HowResult<Self> {
        DelaunayBuilder::new(vertices, None).build()
    }

    /// Triangulate `vertices`, treating orientations and in-circle tests within `epsilon` as
    /// degenerate.
    ///
    /// ## Errors
    /// See [`DelaunayBuilder::build`].
    pub fn create_with_epsilon(vertices: Vec<Vertex2>, epsilon: f64) -> HowResult<Self> {
        DelaunayBuilder::new(vertices, Some(epsilon)).build()
    }

    #[must_use]
    pub fn get(&self) -> TriangulationView<'_> {
        TriangulationView {
            edges: &self.edges,
            vertices: &self.vertices,
        }
    }

    /// Get the edge map, i.e. every edge with the apexes of its incident triangles.
    #[must_use]
    pub const fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    /// Get the vertices, in sweep order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex2] {
        &self.vertices
    }

    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The position of vertex `v` in the input.
    #[must_use]
    pub fn input_index(&self, v: VertexIdx) -> InputIdx {
        self.input_indices[v]
    }

    #[must_use]
    pub fn input_indices(&self) -> &[InputIdx] {
        &self.input_indices
    }

    /// Get the hull front as the sweep left it.
    #[must_use]
    pub const fn hull_front(&self) -> &HullFront {
        &self.hull
    }

    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.num_edges()
    }

    #[must_use]
    pub fn num_tris(&self) -> usize {
        self.edges.num_tris()
    }

    /// The number of edges on the convex hull.
    #[must_use]
    pub fn num_hull_edges(&self) -> usize {
        self.edges.num_hull_edges()
    }

    /// All triangles as vertex index triples, each in counter-clockwise order.
    #[must_use]
    pub fn tris(&self) -> Vec<TriangleIdxs> {
        self.edges
            .tris()
            .into_iter()
            .map(|[a, b, c]| {
                if orient_2d(&self.vertices[a], &self.vertices[b], &self.vertices[c]) < 0.0 {
                    [a, c, b]
                } else {
                    [a, b, c]
                }
            })
            .collect()
    }

    /// All triangles by their coordinates, each in counter-clockwise order.
    #[must_use]
    pub fn tri_vertices(&self) -> Vec<Triangle2> {
        self.tris()
            .into_iter()
            .map(|tri| tri.map(|v| self.vertices[v]))
            .collect()
    }

    /// All edges by their coordinates.
    #[must_use]
    pub fn edge_vertices(&self) -> Vec<Edge2> {
        let mut edges: Vec<&Edge> = self.edges.edges().collect();
        edges.sort_unstable();
        edges
            .into_iter()
            .map(|e| e.vertices().map(|v| self.vertices[v]))
            .collect()
    }

    /// The vertices on the convex hull, unordered.
    #[must_use]
    pub fn convex_hull(&self) -> HashSet<VertexIdx> {
        build_convex_hull(&self.edges)
    }

    /// The vertices on the convex hull in counter-clockwise order, starting with vertex `0`.
    ///
    /// ## Errors
    /// Returns an error if the hull front is broken.
    pub fn convex_hull_ordered(&self) -> HowResult<Vec<VertexIdx>> {
        if self.edges.is_empty() {
            return Ok(Vec::new());
        }

        // the last vertex swept has the largest x, so it stays on the front
        let mut cycle = self.hull.cycle(self.vertices.len() - 1)?;

        if let Some(first) = cycle.iter().enumerate().min_by_key(|(_, v)| **v).map(|(i, _)| i) {
            cycle.rotate_left(first);
        }

        Ok(cycle)
    }

    /// Check if consecutive vertices of the ordered hull only turn left, or continue straight.
    pub fn is_hull_convex(&self) -> HowResult<bool> {
        let hull = self.convex_hull_ordered()?;
        let k = hull.len();

        for idx in 0..k {
            let v0 = self.vertices[hull[idx]];
            let v1 = self.vertices[hull[(idx + 1) % k]];
            let v2 = self.vertices[hull[(idx + 2) % k]];

            if !is_convex(v0, v1, v2) {
                error!("Hull turns right at vertex {}", hull[(idx + 1) % k]);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Check the combinatorial consistency of the triangulation:
    /// - every edge has one or two apexes,
    /// - every apex forms a triangle with the edge, i.e. the two other edges exist and see the
    ///   opposite vertex as apex,
    /// - Euler's formula for planar triangulations holds, with `h` hull vertices there are
    ///   `3n - 3 - h` edges, `h` of them on the hull, and `2n - 2 - h` triangles,
    /// - the hull front is a closed cycle through exactly the hull vertices,
    /// - the hull is convex.
    pub fn is_sound(&self) -> HowResult<bool> {
        let n = self.vertices.len();

        if n < 3 {
            if !self.edges.is_empty() {
                error!("{} edges for only {n} vertices", self.edges.num_edges());
                return Ok(false);
            }
            return Ok(true);
        }

        for (edge, apexes) in &self.edges {
            if apexes.is_empty() {
                error!("{edge} has no incident triangle");
                return Ok(false);
            }

            let [a, b] = edge.vertices();
            for c in apexes.iter() {
                let closes = |from: VertexIdx, opposite: VertexIdx| {
                    self.edges
                        .get(&Edge::new(from, c))
                        .is_some_and(|s| s.contains(opposite))
                };
                if !closes(a, b) || !closes(b, a) {
                    error!("Triangle ({a}, {b}, {c}) is not closed");
                    return Ok(false);
                }
            }
        }

        let hull = self.convex_hull();
        let h = hull.len();
        if self.num_edges() != 3 * n - 3 - h
            || self.num_tris() != 2 * n - 2 - h
            || self.num_hull_edges() != h
        {
            error!(
                "{} edges ({} on the hull) and {} triangles for {n} vertices, {h} on the hull",
                self.num_edges(),
                self.num_hull_edges(),
                self.num_tris()
            );
            return Ok(false);
        }

        if !self.hull.is_sound(n - 1) {
            error!("Hull front links are not inverse to each other");
            return Ok(false);
        }
        let front: HashSet<VertexIdx> = self.hull.cycle(n - 1)?.into_iter().collect();
        if front != hull {
            error!("Hull front and hull edges disagree");
            return Ok(false);
        }

        self.is_hull_convex()
    }

    /// Check if the triangulation is Delaunay, i.e. every inner edge is locally Delaunay.
    ///
    /// In-circle tests use a determinant independent of the flip criterion of the sweep. As
    /// during construction, violations within epsilon are tolerated.
    ///
    /// Returns if the triangulation is Delaunay and the fraction of inner edges that are.
    pub fn is_delaunay(&self) -> HowResult<(bool, f64)> {
        let inner_edges = self.inner_edges()?;

        let mut delaunay = true;
        let mut num_violated_edges = 0;

        for &(edge, c, d) in &inner_edges {
            if !self.is_locally_delaunay(edge, c, d) {
                error!("{edge} with apexes {c} and {d} is not locally Delaunay");
                delaunay = false;
                num_violated_edges += 1;
            }
        }

        Ok((
            delaunay,
            fraction_valid(num_violated_edges, inner_edges.len()),
        ))
    }

    /// Checks the Delaunay property in a parallel manner using `rayon`s `par_iter()`.
    ///
    /// Returns the fraction of inner edges that are locally Delaunay, where an inconsistent edge
    /// map counts as not Delaunay at all.
    #[must_use]
    pub fn par_is_delaunay(&self) -> f64 {
        let Ok(inner_edges) = self.inner_edges() else {
            return 0.0;
        };

        let num_violated_edges = inner_edges
            .par_iter()
            .filter(|&&(edge, c, d)| !self.is_locally_delaunay(edge, c, d))
            .count();

        fraction_valid(num_violated_edges, inner_edges.len())
    }

    /// Every edge with two incident triangles, along with both apexes.
    fn inner_edges(&self) -> HowResult<Vec<(Edge, VertexIdx, VertexIdx)>> {
        let mut inner_edges = Vec::with_capacity(self.edges.num_inner_edges());

        for (&edge, apexes) in &self.edges {
            match *apexes {
                ApexSet::Two(c, d) => inner_edges.push((edge, c, d)),
                ApexSet::One(_) => {}
                ApexSet::Empty => {
                    return Err(anyhow::Error::msg(format!(
                        "{edge} has no incident triangle"
                    )));
                }
            }
        }

        Ok(inner_edges)
    }

    /// Check that `d` does not lie inside the circumcircle of the triangle `(edge, c)`.
    ///
    /// Flat triangles have no circumcircle and count as Delaunay.
    fn is_locally_delaunay(&self, edge: Edge, c: VertexIdx, d: VertexIdx) -> bool {
        let [a, b] = edge.vertices().map(|v| self.vertices[v]);
        let [c, d] = [self.vertices[c], self.vertices[d]];

        let orientation = orient_2d(&a, &b, &c);
        if orientation == 0.0 || orient_2d(&a, &b, &d) == 0.0 {
            return true;
        }

        let (in_circle, magnitude) = in_circle(a, b, c, d);

        // determinant rounding grows with the squared lifted coordinates
        let tolerance = self.epsilon + 16.0 * f64::EPSILON * magnitude * magnitude;

        orientation * in_circle <= tolerance
    }
}

/// The in-circle determinant of `d` w.r.t. `a, b, c`, positive if `d` is inside the
/// circumcircle of the counter-clockwise triangle `a, b, c`.
///
/// Also returns the largest lifted coordinate, i.e. squared distance to `d`.
fn in_circle(a: Vertex2, b: Vertex2, c: Vertex2, d: Vertex2) -> (f64, f64) {
    let [a, b, c] = [a, b, c].map(|p| {
        let x = p[0] - d[0];
        let y = p[1] - d[1];
        [x, y, x * x + y * y]
    });

    let m = Matrix3::new(
        a[0], a[1], a[2], //
        b[0], b[1], b[2], //
        c[0], c[1], c[2],
    );

    (m.determinant(), a[2].max(b[2]).max(c[2]))
}

fn fraction_valid(num_violated: usize, num_total: usize) -> f64 {
    if num_total == 0 {
        1.0
    } else {
        1.0 - num_violated as f64 / num_total as f64
    }
}

impl fmt::Display for Triangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Triangulation: {} vertices, {} edges, {} triangles, {} hull edges",
            self.num_vertices(),
            self.num_edges(),
            self.num_tris(),
            self.num_hull_edges()
        )
    }
}
