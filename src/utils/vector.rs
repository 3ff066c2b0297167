use nalgebra::Vector2 as NaVector2;

use super::types::Vertex2;

/// The vector primitive of the sweep; `+`, `-` and unary `-` come from [nalgebra].
pub type Vector2 = NaVector2<f64>;

/// Lift a stored vertex into a [Vector2].
#[inline]
pub fn vector(v: Vertex2) -> Vector2 {
    Vector2::new(v[0], v[1])
}

/// Signed cross product `u.x * v.y - u.y * v.x`.
///
/// Positive iff `v` is counter-clockwise from `u`.
#[inline]
pub fn cross(u: &Vector2, v: &Vector2) -> f64 {
    u.perp(v)
}

/// Cross product of `a - origin` and `b - origin`.
#[inline]
pub fn cross_at(origin: Vertex2, a: Vertex2, b: Vertex2) -> f64 {
    let o = vector(origin);
    cross(&(vector(a) - o), &(vector(b) - o))
}
