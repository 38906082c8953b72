//! Importance-guided vertex removal for contour loops.

use hashbrown::HashSet;
use tracing::warn;

use crate::contour::ContourLoop;

/// Reduces a closed loop to `target` points.
///
/// Every vertex except the walk anchor at index 0 is scored with the
/// absolute dot product of its two incident edge vectors
/// `(p[i] - p[i-1])` and `(p[i] - p[i+1])`; the `len - target`
/// lowest-scoring vertices are removed, preserving the relative order of
/// survivors.
///
/// A `target` below 3 or at/above the current point count returns the loop
/// unchanged with a logged warning; decimation never fails.
pub fn decimate_loop(source: &ContourLoop, target: usize) -> ContourLoop {
    if target < 3 {
        warn!(target, "refusing to decimate below a polygon");
        return source.clone();
    }
    let len = source.len();
    if len <= target {
        warn!(len, target, "loop is already at or below the target size");
        return source.clone();
    }

    let mut scored: Vec<(usize, f32)> = Vec::with_capacity(len - 1);
    for i in 1..len {
        let point = source.point(i);
        let edge_a = point - source.point_wrapped(i as isize - 1);
        let edge_b = point - source.point_wrapped(i as isize + 1);
        scored.push((i, edge_a.dot(edge_b).abs()));
    }
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    let doomed: HashSet<usize> = scored[..len - target].iter().map(|&(i, _)| i).collect();
    let survivors = source
        .points()
        .iter()
        .enumerate()
        .filter(|(i, _)| !doomed.contains(i))
        .map(|(_, &p)| p)
        .collect();
    ContourLoop::from_points(survivors)
}
