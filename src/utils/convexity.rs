use core::cmp;

use crate::predicates::orient_2d;

use super::types::Vertex2;

/// Checks if the boundary turn `v0 -> v1 -> v2` is convex for a counter-clockwise walk.
///
/// Collinear turns count as convex if `v1` lies between `v0` and `v2`.
pub fn is_convex(v0: Vertex2, v1: Vertex2, v2: Vertex2) -> bool {
    let sign = orient_2d(&v0, &v1, &v2);

    match sign.partial_cmp(&0.0) {
        Some(cmp::Ordering::Greater) => true,
        Some(cmp::Ordering::Less) | None => false,
        Some(cmp::Ordering::Equal) => {
            let v1_v0 = [v1[0] - v0[0], v1[1] - v0[1]];
            let v1_v2 = [v1[0] - v2[0], v1[1] - v2[1]];
            let dot_prod = v1_v0[0] * v1_v2[0] + v1_v0[1] * v1_v2[1];

            dot_prod < 0.
        }
    }
}
