#![no_main]

use libfuzzer_sys::fuzz_target;
use sweepline::Triangulation;

fuzz_target!(|vertices: Vec<[f64; 2]>| {
    // rejected input is fine, everything accepted has to be sound
    if let Ok(triangulation) = Triangulation::create(vertices) {
        assert!(triangulation.is_sound().unwrap_or(false));
        assert_eq!(
            triangulation.convex_hull().len(),
            triangulation.convex_hull_ordered().map_or(0, |hull| hull.len())
        );
    }
});
