//! # sweepline
//!
//! 2D Delaunay triangulation and convex hull via an incremental sweep-line algorithm.
//!
//! The vertices are swept along the x-axis. Each one is connected to the part of the hull front
//! it sees, and the new triangles are legalized by edge flips. The convex hull falls out of the
//! finished triangulation as the edges with a single incident triangle.
#![forbid(unsafe_code)]
#![deny(unused, clippy::incompatible_msrv)]
#![warn(clippy::all, clippy::missing_const_for_fn)]

pub use builder::{DEFAULT_EPSILON, DelaunayBuilder, MAX_COORDINATE};
pub use convex_hull::build_convex_hull;
pub use triangulation::{Triangulation, TriangulationView};
pub use trids::{
    apex_set::ApexSet,
    edge::Edge,
    edge_map::EdgeMap,
    hull_front::{FrontNode, HullFront},
};
pub use utils::types::{InputIdx, Vertex2, VertexIdx};

pub mod builder;
pub mod convex_hull;
mod predicates;
pub mod triangulation;
mod trids;
mod utils;
#[cfg(feature = "wasm")]
pub mod wasm;
