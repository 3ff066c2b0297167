//! utils for sweepline tests
#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::all, clippy::missing_const_for_fn)]

use rand::{SeedableRng, distr::Uniform, prelude::Distribution, rngs::StdRng};
use rand_distr::Normal;
use std::ops::RangeInclusive;

pub type Vertex2 = [f64; 2];

/// Samples `n` vertices in 2D space from the [Uniform] distribution.
///
/// If no range is specified, the unit-square centered around the origin is used, `[-0.5, 0.5]`.
pub fn sample_vertices_2d(n: usize, range: Option<RangeInclusive<f64>>) -> Vec<Vertex2> {
    sample_uniform(&mut rand::rng(), n, range)
}

/// Same as [sample_vertices_2d], but reproducible for a given `seed`.
pub fn sample_vertices_2d_seeded(
    n: usize,
    range: Option<RangeInclusive<f64>>,
    seed: u64,
) -> Vec<Vertex2> {
    sample_uniform(&mut StdRng::seed_from_u64(seed), n, range)
}

fn sample_uniform<R: rand::Rng>(
    rng: &mut R,
    n: usize,
    range: Option<RangeInclusive<f64>>,
) -> Vec<Vertex2> {
    let range = range.unwrap_or(-0.5..=0.5);
    let uniform = Uniform::try_from(range).expect("Expected range with a greater start then end");

    let mut vertices: Vec<Vertex2> = Vec::with_capacity(n);
    for _ in 0..n {
        let x = uniform.sample(rng);
        let y = uniform.sample(rng);
        vertices.push([x, y]);
    }

    vertices
}

/// Samples `n` vertices around `num_clusters` centers, each coordinate drawn from a [Normal] distribution.
///
/// The centers are sampled uniformly from `[-0.5, 0.5]`, the default spread is `σ = 0.01`.
pub fn sample_clustered_vertices_2d(
    n: usize,
    num_clusters: usize,
    std_dev: Option<f64>,
) -> Vec<Vertex2> {
    let mut rng = rand::rng();
    let centers = sample_uniform(&mut rng, num_clusters.max(1), None);
    let normal = Normal::new(0.0, std_dev.unwrap_or(0.01)).unwrap();

    let mut vertices: Vec<Vertex2> = Vec::with_capacity(n);
    for i in 0..n {
        let [cx, cy] = centers[i % centers.len()];
        let x = cx + normal.sample(&mut rng);
        let y = cy + normal.sample(&mut rng);
        vertices.push([x, y]);
    }

    vertices
}

/// Vertices of a regular `rows x cols` grid with spacing `1.0`, starting at the origin.
pub fn grid_vertices_2d(rows: usize, cols: usize) -> Vec<Vertex2> {
    let mut vertices: Vec<Vertex2> = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            vertices.push([c as f64, r as f64]);
        }
    }

    vertices
}
