use core::iter;

use anyhow::{Result as HowResult, bail};

use crate::{
    Triangulation,
    trids::{edge::Edge, edge_map::EdgeMap, hull_front::HullFront},
    utils::{
        point_order::{find_duplicate, sort_along_x_axis},
        types::{InputIdx, Vertex2, VertexIdx},
        vector::{cross, cross_at, vector},
    },
};

/// Tolerance of the orientation and in-circle tests, if none is given.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Largest absolute coordinate accepted as input.
///
/// The in-circle test multiplies four coordinate differences, which stays finite below this.
pub const MAX_COORDINATE: f64 = 1e76;

/// Builds a 2D Delaunay triangulation by sweeping a line along the x-axis.
///
/// The vertices are sorted by x (ties by y) and inserted one after another. Each new vertex
/// lies outside of everything triangulated so far, so it only has to be connected to the part of
/// the hull front it can see. Every new triangle is legalized by edge flips, which are driven by
/// an explicit stack instead of recursion.
///
/// The builder is consumed by [`DelaunayBuilder::build`], i.e. every builder runs exactly once.
///
/// ```
/// use sweepline::DelaunayBuilder;
///
/// let vertices = vec![[0.0, 0.0], [2.0, 0.0], [1.0, 2.0], [1.0, 0.5]];
///
/// let triangulation = DelaunayBuilder::new(vertices, Some(1e-9)).build().unwrap();
///
/// assert_eq!(triangulation.num_tris(), 3);
/// assert_eq!(triangulation.convex_hull().len(), 3);
/// ```
#[derive(Debug)]
pub struct DelaunayBuilder {
    epsilon: f64,
    vertices: Vec<Vertex2>,
    /// `input_indices[v]` is the position of the sorted vertex `v` in the input
    input_indices: Vec<InputIdx>,
    edges: EdgeMap,
    hull: HullFront,
    /// Edges `(left, right)` still to legalize against the vertex currently inserted
    flip_stack: Vec<(VertexIdx, VertexIdx)>,

    #[cfg(feature = "timing")]
    time_sorting: u128,
    #[cfg(feature = "timing")]
    time_inserting: u128,
    #[cfg(feature = "timing")]
    time_flipping: u128,
}

impl DelaunayBuilder {
    pub fn new(vertices: Vec<Vertex2>, epsilon: Option<f64>) -> Self {
        let n = vertices.len();
        Self {
            epsilon: epsilon.unwrap_or(DEFAULT_EPSILON),
            vertices,
            input_indices: Vec::with_capacity(n),
            edges: EdgeMap::with_capacity(n),
            hull: HullFront::new(n),
            flip_stack: Vec::new(),
            #[cfg(feature = "timing")]
            time_sorting: 0,
            #[cfg(feature = "timing")]
            time_inserting: 0,
            #[cfg(feature = "timing")]
            time_flipping: 0,
        }
    }

    /// Triangulate the vertices.
    ///
    /// Less than three vertices result in an empty triangulation.
    ///
    /// ## Errors
    /// Returns an error if
    /// - epsilon is negative or not finite,
    /// - a coordinate is not finite or larger than [`MAX_COORDINATE`] in absolute value,
    /// - two vertices coincide,
    /// - all vertices are aligned, or
    /// - the flips break the triangulation, which only happens on numerically degenerate input.
    ///
    /// Aligned means within epsilon: if every vertex `v` has `|cross(v0 - v, v1 - v)| <= epsilon`
    /// for the first two vertices `v0`, `v1` in sweep order, the input counts as aligned even if
    /// it is not exactly collinear. Very flat inputs need a smaller epsilon.
    pub fn build(mut self) -> HowResult<Triangulation> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            bail!("Epsilon has to be finite and non-negative, got {}", self.epsilon);
        }

        self.sort_vertices()?;

        let n = self.vertices.len();
        if n < 3 {
            log::debug!("{n} vertices, nothing to triangulate");
            return Ok(self.finish());
        }

        #[cfg(feature = "timing")]
        let now = std::time::Instant::now();

        let first_to_add = self.seed()?;
        for i in first_to_add..n {
            self.add_point(i)?;
        }

        #[cfg(feature = "timing")]
        {
            self.time_inserting = now.elapsed().as_micros();
            log::trace!("Sorting computed in {} μs", self.time_sorting);
            log::trace!("Insertions computed in {} μs", self.time_inserting);
            log::trace!("Flips computed in {} μs", self.time_flipping);
        }

        log::debug!(
            "Triangulated {} vertices into {} triangles, {} edges",
            n,
            self.edges.num_tris(),
            self.edges.num_edges()
        );

        Ok(self.finish())
    }

    fn finish(self) -> Triangulation {
        Triangulation::from_parts(
            self.epsilon,
            self.vertices,
            self.input_indices,
            self.edges,
            self.hull,
        )
    }

    /// Validate the input and bring it into sweep order.
    fn sort_vertices(&mut self) -> HowResult<()> {
        #[cfg(feature = "timing")]
        let now = std::time::Instant::now();

        if let Some((idx, v)) = self
            .vertices
            .iter()
            .enumerate()
            .find(|(_, v)| !v[0].is_finite() || !v[1].is_finite())
        {
            bail!("Vertex {idx} has a non-finite coordinate: [{}, {}]", v[0], v[1]);
        }

        if let Some((idx, v)) = self
            .vertices
            .iter()
            .enumerate()
            .find(|(_, v)| v[0].abs() > MAX_COORDINATE || v[1].abs() > MAX_COORDINATE)
        {
            bail!(
                "Vertex {idx} exceeds the coordinate range of +-{MAX_COORDINATE:e}: [{}, {}]",
                v[0],
                v[1]
            );
        }

        // -0.0 and 0.0 have to compare equal in sweep order
        for v in &mut self.vertices {
            v[0] += 0.0;
            v[1] += 0.0;
        }

        let order = sort_along_x_axis(&self.vertices);

        if let Some((i, j)) = find_duplicate(&self.vertices, &order) {
            let [x, y] = self.vertices[i];
            bail!("Vertices {i} and {j} coincide at [{x}, {y}]");
        }

        self.vertices = order.iter().map(|&idx| self.vertices[idx]).collect();
        self.input_indices = order;

        #[cfg(feature = "timing")]
        {
            self.time_sorting = now.elapsed().as_micros();
        }

        Ok(())
    }

    /// Set up the initial hull front and return the first vertex still to insert.
    fn seed(&mut self) -> HowResult<VertexIdx> {
        let [v0, v1] = [self.vertices[0], self.vertices[1]];

        let first_off_line = (2..self.vertices.len())
            .find(|&k| cross_at(self.vertices[k], v0, v1).abs() > self.epsilon)
            .ok_or_else(|| {
                anyhow::Error::msg("All points are aligned, i.e. could not find 3 non-aligned points !")
            })?;

        if first_off_line == 2 {
            // The pair 0, 1 forms a degenerate front. Registering 2 as apex of their edge makes
            // the insertion of 2 see a finished "triangle" and just add its two edges.
            self.hull.seed_pair(0, 1);
            self.edges.entry(Edge::new(0, 1)).insert(2)?;
            Ok(2)
        } else {
            self.seed_fan(first_off_line)?;
            Ok(first_off_line + 1)
        }
    }

    /// Connect the aligned vertices `0..k` to `k`.
    ///
    /// A line intersects a circle at most twice, so no triangle of the fan has another vertex of
    /// the line in its circumcircle and the fan needs no flips.
    fn seed_fan(&mut self, k: VertexIdx) -> HowResult<()> {
        log::trace!("The first {k} vertices are aligned, seeding with a fan from vertex {k}");

        for j in 0..k - 1 {
            self.edges.entry(Edge::new(j, j + 1)).insert(k)?;
            self.edges.entry(Edge::new(j, k)).insert(j + 1)?;
            self.edges.entry(Edge::new(j + 1, k)).insert(j)?;
        }

        // the front has to run clockwise along `right`
        let side = cross_at(self.vertices[k], self.vertices[0], self.vertices[1]);
        let front: Vec<VertexIdx> = if side < 0.0 {
            iter::once(k).chain(0..k).collect()
        } else {
            iter::once(k).chain((0..k).rev()).collect()
        };

        for (idx, &v) in front.iter().enumerate() {
            let next = front[(idx + 1) % front.len()];
            self.hull.set_right(v, next);
            self.hull.set_left(next, v);
        }

        Ok(())
    }

    /// Cross product of `a - vertices[origin]` and `b - vertices[origin]`.
    fn cross(&self, origin: VertexIdx, a: VertexIdx, b: VertexIdx) -> f64 {
        cross_at(self.vertices[origin], self.vertices[a], self.vertices[b])
    }

    /// Insert vertex `i`, which has to lie to the right of all vertices inserted before.
    ///
    /// Walks the hull front from `i - 1` in both directions. Every front edge visible from `i`
    /// (with nearly aligned edges counting as visible) becomes the base of a new triangle with
    /// apex `i`. Then `i` replaces the visible part of the front.
    pub(crate) fn add_point(&mut self, i: VertexIdx) -> HowResult<()> {
        let start = i - 1;

        let mut hull_pt = start;
        let mut next_hull_pt = self.hull.right(hull_pt);
        while self.cross(i, hull_pt, next_hull_pt) > -self.epsilon {
            self.fix_triangulation(hull_pt, next_hull_pt, i)?;

            hull_pt = next_hull_pt;
            next_hull_pt = self.hull.right(hull_pt);
            if hull_pt == start {
                bail!("Vertex {i} sees the whole hull front walking right");
            }
        }
        let right = hull_pt;

        hull_pt = start;
        next_hull_pt = self.hull.left(hull_pt);
        while self.cross(i, hull_pt, next_hull_pt) < self.epsilon {
            self.fix_triangulation(next_hull_pt, hull_pt, i)?;

            hull_pt = next_hull_pt;
            next_hull_pt = self.hull.left(hull_pt);
            if hull_pt == start {
                bail!("Vertex {i} sees the whole hull front walking left");
            }
        }
        let left = hull_pt;

        self.hull.splice(i, left, right);

        Ok(())
    }

    /// Add the triangle `(left, right, outer)` and restore the Delaunay property around it.
    ///
    /// `outer` is the vertex currently inserted and `(left, right)` an edge of the front it sees.
    /// If the quad formed with the triangle behind the edge is not Delaunay, the edge is flipped
    /// and the two edges now facing `outer` are checked in turn.
    pub(crate) fn fix_triangulation(
        &mut self,
        left: VertexIdx,
        right: VertexIdx,
        outer: VertexIdx,
    ) -> HowResult<()> {
        #[cfg(feature = "timing")]
        let now = std::time::Instant::now();

        self.flip_stack.clear();
        self.flip_stack.push((left, right));

        while let Some((left, right)) = self.flip_stack.pop() {
            let edge = Edge::new(left, right);
            let apexes = self.edges.apexes(edge)?;

            // All vertices but `outer` were inserted before it and have smaller indices. So the
            // minimum is the apex behind the edge, or `outer` itself if there is none yet.
            let max_apex = apexes.max()?;
            if max_apex > outer {
                bail!("Apex {max_apex} of {edge} was inserted after vertex {outer}");
            }
            let inner = apexes.min()?;

            if self.check_delaunay_condition(left, right, outer, inner) {
                self.edges.entry(Edge::new(right, outer)).insert(left)?;
                self.edges.entry(Edge::new(left, outer)).insert(right)?;
                self.edges.entry(edge).insert(outer)?;
                continue;
            }

            // flip (left, right) to (outer, inner)
            self.edges
                .entry(Edge::new(right, outer))
                .replace(left, inner)?;
            self.edges
                .entry(Edge::new(left, outer))
                .replace(right, inner)?;
            self.edges
                .entry(Edge::new(inner, left))
                .replace(right, outer)?;
            self.edges
                .entry(Edge::new(inner, right))
                .replace(left, outer)?;
            self.edges.remove(&edge);

            self.flip_stack.push((left, inner));
            self.flip_stack.push((inner, right));
        }

        #[cfg(feature = "timing")]
        {
            self.time_flipping += now.elapsed().as_micros();
        }

        Ok(())
    }

    /// Check if the edge `(left, right)` is legal in the quad `left, outer, right, inner`,
    /// i.e. `inner` is not inside the circumcircle of `left, right, outer` (up to epsilon).
    ///
    /// A missing triangle behind the edge (`outer == inner`) and a non-convex quad, which cannot
    /// be flipped, count as legal.
    pub(crate) fn check_delaunay_condition(
        &self,
        left: VertexIdx,
        right: VertexIdx,
        outer: VertexIdx,
        inner: VertexIdx,
    ) -> bool {
        if outer == inner {
            return true;
        }

        let l = vector(self.vertices[left]);
        let r = vector(self.vertices[right]);
        let t = vector(self.vertices[outer]);
        let b = vector(self.vertices[inner]);

        if cross(&(l - t), &(b - t)) < 0.0 || cross(&(r - t), &(b - t)) > 0.0 {
            return true;
        }

        // Compare the angles at `outer` and `inner`: the edge is legal iff they sum up to at most
        // pi. sa, sb are the cosines and sc, sd the sines of the angles, scaled by the lengths.
        let sa = (t - r).dot(&(t - l));
        let sb = (b - r).dot(&(b - l));
        if sa > -self.epsilon && sb > -self.epsilon {
            return true;
        }
        if !(sa < 0.0 && sb < 0.0) {
            let sc = cross(&(t - r), &(t - l)).abs();
            let sd = cross(&(b - r), &(b - l)).abs();
            if sc * sb + sa * sd > -self.epsilon {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trids::apex_set::ApexSet;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sorted_builder(vertices: Vec<Vertex2>) -> DelaunayBuilder {
        let mut builder = DelaunayBuilder::new(vertices, None);
        builder.sort_vertices().unwrap();
        builder
    }

    #[test]
    fn test_sort_vertices() {
        let mut builder = DelaunayBuilder::new(vec![[1.0, 0.0], [0.0, 2.0], [0.0, -1.0]], None);
        builder.sort_vertices().unwrap();

        assert_eq!(builder.vertices, vec![[0.0, -1.0], [0.0, 2.0], [1.0, 0.0]]);
        assert_eq!(builder.input_indices, vec![2, 1, 0]);
    }

    #[test]
    fn test_sort_vertices_normalizes_negative_zero() {
        let mut builder = DelaunayBuilder::new(vec![[0.0, 1.0], [-0.0, 0.0]], None);
        builder.sort_vertices().unwrap();

        assert_eq!(builder.input_indices, vec![1, 0]);
        assert!(builder.vertices[0][0].is_sign_positive());
    }

    #[test]
    fn test_reject_invalid_vertices() {
        init_logger();

        let duplicate = DelaunayBuilder::new(vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]], None);
        assert!(duplicate.build().is_err());

        let negative_zero = DelaunayBuilder::new(vec![[0.0, 0.0], [1.0, 1.0], [-0.0, 0.0]], None);
        assert!(negative_zero.build().is_err());

        let nan = DelaunayBuilder::new(vec![[0.0, 0.0], [1.0, f64::NAN], [2.0, 0.0]], None);
        assert!(nan.build().is_err());

        let inf = DelaunayBuilder::new(vec![[f64::INFINITY, 0.0], [1.0, 1.0], [2.0, 0.0]], None);
        assert!(inf.build().is_err());
    }

    #[test]
    fn test_reject_invalid_epsilon() {
        let vertices = vec![[0.0, 0.0], [2.0, 0.0], [1.0, 2.0], [1.0, 0.5]];

        for epsilon in [-1.0, -1e-3, f64::NAN, f64::INFINITY] {
            let err = DelaunayBuilder::new(vertices.clone(), Some(epsilon))
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("Epsilon"), "{epsilon}: {err}");
        }

        assert!(DelaunayBuilder::new(vertices, Some(0.0)).build().is_ok());
    }

    #[test]
    fn test_reject_huge_coordinates() {
        let huge = DelaunayBuilder::new(
            vec![[1e200, 0.0], [-1e200, 1.0], [0.0, 1e200], [3.0, -1e200], [1.0, 1.0]],
            None,
        );
        let err = huge.build().unwrap_err();
        assert!(err.to_string().contains("coordinate range"));

        // the same shape as the doc example, scaled up to just below the limit
        let s = 1e70;
        let large = DelaunayBuilder::new(
            vec![[0.0, 0.0], [2.0 * s, 0.0], [s, 2.0 * s], [s, 0.5 * s]],
            None,
        )
        .build()
        .unwrap();
        assert_eq!(large.num_tris(), 3);
        assert!(large.is_sound().unwrap());
    }

    #[test]
    fn test_aligned_within_epsilon() {
        // a flat quad whose height is below the default epsilon
        let flat = vec![[0.0, 0.0], [1.0, 1e-10], [2.0, 1e-10], [3.0, 0.0]];

        let err = DelaunayBuilder::new(flat.clone(), None).build().unwrap_err();
        assert!(err.to_string().contains("aligned"));

        let t = DelaunayBuilder::new(flat, Some(1e-15)).build().unwrap();
        assert_eq!(t.num_tris(), 2);
        assert_eq!(t.num_edges(), 5);
        assert!(t.is_sound().unwrap());
    }

    #[test]
    fn test_reject_aligned_vertices() {
        let aligned = DelaunayBuilder::new(vec![[0.0, 0.0], [2.0, 2.0], [1.0, 1.0], [3.0, 3.0]], None);
        let err = aligned.build().unwrap_err();

        assert!(err.to_string().contains("aligned"));
    }

    #[test]
    fn test_check_delaunay_condition() {
        // left, right, outer, inner
        let builder = sorted_builder(vec![[0.0, 0.0], [1.0, -1.0], [1.0, 1.0], [2.0, 0.0]]);

        // a square is co-circular, both diagonals are fine
        assert!(builder.check_delaunay_condition(2, 1, 3, 0));
        assert!(builder.check_delaunay_condition(0, 3, 2, 1));

        // no triangle behind the edge
        assert!(builder.check_delaunay_condition(1, 2, 3, 3));

        // 2 is deep inside the circle through 0, 1, 3
        let builder = sorted_builder(vec![[0.0, 0.0], [1.0, -1.0], [1.0, 0.2], [2.0, 0.0]]);
        assert!(!builder.check_delaunay_condition(3, 0, 1, 2));
        assert!(builder.check_delaunay_condition(2, 1, 3, 0));
    }

    #[test]
    fn test_check_delaunay_condition_non_convex() {
        // 2 lies in the circumcircle of 0, 1, 3, but the quad 3, 0, 1, 2 is not convex
        let builder = sorted_builder(vec![[0.0, 0.0], [2.0, 2.0], [2.5, -0.3], [3.0, 0.0]]);

        assert!(builder.check_delaunay_condition(3, 1, 0, 2));
    }

    #[test]
    fn test_seed_pair() {
        let mut builder = sorted_builder(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);

        assert_eq!(builder.seed().unwrap(), 2);
        assert_eq!(builder.hull.cycle(0).unwrap(), vec![0, 1]);
        assert_eq!(builder.edges.apexes(Edge::new(0, 1)).unwrap(), &ApexSet::One(2));

        builder.add_point(2).unwrap();
        assert_eq!(builder.edges.num_edges(), 3);
        assert_eq!(builder.edges.num_tris(), 1);
        assert!(builder.hull.is_sound(2));
    }

    #[test]
    fn test_seed_fan() {
        // 0, 1, 2 are aligned on x = 0, 3 is the first vertex off the line
        let mut builder =
            sorted_builder(vec![[0.0, 0.0], [0.0, 1.0], [0.0, 2.0], [1.0, 1.5], [2.0, 0.0]]);

        assert_eq!(builder.seed().unwrap(), 4);
        assert_eq!(builder.edges.num_tris(), 2);
        assert_eq!(builder.edges.apexes(Edge::new(1, 3)).unwrap(), &ApexSet::Two(0, 2));
        assert_eq!(builder.edges.apexes(Edge::new(0, 1)).unwrap(), &ApexSet::One(3));

        // counter-clockwise: 3 -> 2 -> 1 -> 0
        assert_eq!(builder.hull.cycle(3).unwrap(), vec![3, 2, 1, 0]);
        assert!(builder.hull.is_sound(3));

        builder.add_point(4).unwrap();
        assert_eq!(builder.edges.num_tris(), 3);
        assert!(builder.hull.is_sound(4));
    }

    #[test]
    fn test_flip_stack_legalizes() {
        init_logger();

        // 3 lies inside the circumcircle of 0, 1, 2, so the edge (1, 2) has to be flipped
        let mut builder = sorted_builder(vec![[0.0, 0.0], [1.0, -1.0], [1.0, 1.0], [1.1, 0.0]]);
        let first = builder.seed().unwrap();
        for i in first..4 {
            builder.add_point(i).unwrap();
        }

        assert!(!builder.edges.contains(&Edge::new(1, 2)));
        assert_eq!(builder.edges.apexes(Edge::new(0, 3)).unwrap().len(), 2);
        assert_eq!(builder.edges.num_edges(), 5);
        assert!(builder.flip_stack.is_empty());
    }
}
