//! Exact geometric predicates.
//!
//! With feature `geogram` (default): uses [geogram_predicates] (FFI to C++ geogram).
//!
//! With feature `wasm`: uses pure-Rust [robust].
//!
//! The sweep itself runs on the epsilon-filtered cross products of [crate::utils::vector];
//! these exact predicates are only consulted when inspecting a finished triangulation.

use crate::utils::types::Vertex2;

// Exactly one of geogram or wasm must be enabled.
#[cfg(not(any(feature = "geogram", feature = "wasm")))]
compile_error!(
    "Exactly one of features 'geogram' or 'wasm' must be enabled. Use default (geogram) or --no-default-features --features 'std,wasm' for WASM."
);

#[cfg(all(feature = "geogram", feature = "wasm"))]
compile_error!(
    "Features 'geogram' and 'wasm' are mutually exclusive. For WASM use --no-default-features --features 'std,wasm'."
);

#[cfg(all(feature = "geogram", not(feature = "wasm")))]
mod imp {
    use super::*;
    use geogram_predicates as gp;

    #[inline]
    pub fn orient_2d(a: &Vertex2, b: &Vertex2, c: &Vertex2) -> f64 {
        let r = gp::orient_2d(a, b, c);
        if r > 0i16 {
            1.0
        } else if r < 0i16 {
            -1.0
        } else {
            0.0
        }
    }
}

#[cfg(all(feature = "wasm", not(feature = "geogram")))]
mod imp {
    use super::*;
    use robust::{Coord, orient2d};

    /// Normalize predicate result to sign: -1.0, 0.0, or 1.0 so that `==` compares signs.
    #[inline]
    fn sign_f64(x: f64) -> f64 {
        if x > 0.0 {
            1.0
        } else if x < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    #[inline]
    fn coord2(p: &Vertex2) -> Coord<f64> {
        Coord { x: p[0], y: p[1] }
    }

    #[inline]
    pub fn orient_2d(a: &Vertex2, b: &Vertex2, c: &Vertex2) -> f64 {
        sign_f64(orient2d(coord2(a), coord2(b), coord2(c)))
    }
}

/// Sign of the orientation of `a, b, c`: `1.0` counter-clockwise, `-1.0` clockwise, `0.0` collinear.
pub use imp::orient_2d;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient_2d() {
        assert_eq!(orient_2d(&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0]), 1.0);
        assert_eq!(orient_2d(&[0.0, 0.0], &[0.0, 1.0], &[1.0, 0.0]), -1.0);
        assert_eq!(orient_2d(&[0.0, 0.0], &[1.0, 1.0], &[2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_orient_2d_is_exact() {
        // c sits one ulp above the line through a and b
        let a = [0.5, 0.5];
        let b = [12.0, 12.0];
        let c = [24.0, 24.000000000000004];

        assert_eq!(orient_2d(&a, &b, &c), 1.0);
    }
}
