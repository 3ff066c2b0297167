//! WASM bindings for the sweep-line Delaunay triangulation.
//!
//! Provides a single function `triangulate` that takes flat vertex coordinates and an optional
//! epsilon, and returns the vertices in sweep order together with edges, triangles and the convex
//! hull as indices into them.

use wasm_bindgen::prelude::*;

use crate::{triangulation::Triangulation, utils::types::Vertex2};

/// 2D Delaunay triangulation.
///
/// # Arguments
/// * `vertices` - Flat array of 2D coordinates: [x1, y1, x2, y2, ...]
/// * `epsilon` - Optional tolerance of the geometric tests (pass `null` or omit for the default).
///
/// # Returns
/// A JavaScript object with:
/// * `vertices` - Array of `{ x, y, input }` in sweep order, `input` is the position in `vertices`
/// * `edges` - Array of `[a, b]`
/// * `triangles` - Array of `[a, b, c]`, counter-clockwise
/// * `hull` - Array of vertex indices, counter-clockwise
#[wasm_bindgen(js_name = triangulate)]
pub fn triangulate_2d(vertices: &[f64], epsilon: Option<f64>) -> Result<JsValue, JsValue> {
    let vertices_2d = parse_vertices_2d(vertices)?;

    let built = match epsilon {
        Some(epsilon) => Triangulation::create_with_epsilon(vertices_2d, epsilon),
        None => Triangulation::create(vertices_2d),
    };
    let t = built.map_err(|e| JsValue::from_str(&format!("triangulate failed: {e}")))?;

    let vertices_js = js_sys::Array::new();
    for (idx, v) in t.vertices().iter().enumerate() {
        vertices_js.push(&vertex2_to_js(v, t.input_index(idx))?);
    }

    let mut edges: Vec<_> = t.edges().edges().copied().collect();
    edges.sort_unstable();
    let edges_js = js_sys::Array::new();
    for edge in edges {
        edges_js.push(&indices_to_js(&edge.vertices()));
    }

    let triangles_js = js_sys::Array::new();
    for tri in t.tris() {
        triangles_js.push(&indices_to_js(&tri));
    }

    let hull = t
        .convex_hull_ordered()
        .map_err(|e| JsValue::from_str(&format!("convex hull failed: {e}")))?;

    let result = js_sys::Object::new();
    js_sys::Reflect::set(&result, &"vertices".into(), &vertices_js)?;
    js_sys::Reflect::set(&result, &"edges".into(), &edges_js)?;
    js_sys::Reflect::set(&result, &"triangles".into(), &triangles_js)?;
    js_sys::Reflect::set(&result, &"hull".into(), &indices_to_js(&hull))?;
    Ok(result.into())
}

fn parse_vertices_2d(flat: &[f64]) -> Result<Vec<Vertex2>, JsValue> {
    if flat.len() % 2 != 0 {
        return Err(JsValue::from_str(
            "Vertices must have even length (pairs of x, y)",
        ));
    }
    Ok(flat.chunks_exact(2).map(|c| [c[0], c[1]]).collect())
}

/// [x, y] -> { x, y, input }
fn vertex2_to_js(v: &Vertex2, input: usize) -> Result<JsValue, JsValue> {
    let obj = js_sys::Object::new();
    js_sys::Reflect::set(&obj, &"x".into(), &v[0].into())?;
    js_sys::Reflect::set(&obj, &"y".into(), &v[1].into())?;
    js_sys::Reflect::set(&obj, &"input".into(), &(input as f64).into())?;
    Ok(obj.into())
}

fn indices_to_js(idxs: &[usize]) -> JsValue {
    idxs.iter()
        .map(|&idx| JsValue::from_f64(idx as f64))
        .collect::<js_sys::Array>()
        .into()
}
