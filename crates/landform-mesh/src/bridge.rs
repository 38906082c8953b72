//! Triangulation of the ruled surface between consecutive stack levels.
//!
//! Two loops of differing density are bridged by walking an independent
//! pivot index along each, tracking the cumulative perimeter distance
//! ("stretch") traveled on both. Each step unrolls the next candidate quad
//! into stretch space and applies the Delaunay angle-sum criterion to pick
//! the diagonal: the two angles opposite the candidate diagonal summing to
//! at most 180 degrees prefer the lower-loop advance. One triangle is
//! emitted per step; a pivot that reaches its loop's end is clamped until
//! the other catches up.

use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;
use landform_contour::wrap_index;
use tracing::warn;

use crate::land_mesh::LandMesh;
use crate::loop_stack::LoopStack;

/// Triangulates all consecutive level pairs of the stack into one mesh.
///
/// Returns `None` if `kill` was raised mid-triangulation (the only stage
/// that honors the kill flag); the partially built mesh is discarded.
/// Degenerate levels (empty loops) skip their bridge with a warning instead
/// of failing.
pub fn triangulate_stack(stack: &LoopStack, kill: &AtomicBool) -> Option<LandMesh> {
    let mut mesh = LandMesh {
        positions: stack.mesh_points(),
        indices: Vec::new(),
    };
    if stack.levels.len() < 2 {
        warn!(levels = stack.levels.len(), "nothing to bridge");
        return Some(mesh);
    }

    let height_step = stack.level_height;
    // Offset of the lower level's first vertex in the flat point buffer.
    let mut index_carry = 0_usize;

    for pair in 0..stack.levels.len() - 1 {
        let lower = &stack.levels[pair];
        let upper = &stack.levels[pair + 1];
        if lower.is_empty() || upper.is_empty() {
            warn!(pair, "degenerate level, skipping bridge");
            index_carry += lower.len();
            continue;
        }

        let lower_len = lower.len();
        let upper_len = upper.len();
        let mut lower_pivot = 0_usize;
        let mut lower_stretch = 0.0_f32;
        let mut upper_pivot = 0_usize;
        let mut upper_stretch = 0.0_f32;

        loop {
            if kill.load(Ordering::Relaxed) {
                warn!(pair, "triangulation aborted by kill flag");
                return None;
            }

            let lower_delta = if lower_pivot >= lower_len {
                0.0
            } else {
                lower
                    .point(lower_pivot)
                    .distance(lower.point_wrapped(lower_pivot as isize + 1))
            };
            let upper_delta = if upper_pivot >= upper_len {
                0.0
            } else {
                upper
                    .point(upper_pivot)
                    .distance(upper.point_wrapped(upper_pivot as isize + 1))
            };

            // Candidate quad unrolled into stretch space.
            let quad = [
                Vec2::new(lower_stretch, 0.0) * 5.0,
                Vec2::new(lower_stretch + lower_delta, 0.0) * 5.0,
                Vec2::new(upper_stretch, height_step) * 5.0,
                Vec2::new(upper_stretch + upper_delta, height_step) * 5.0,
            ];
            let alpha = (quad[1] - quad[0]).angle_between(quad[2] - quad[0]).abs();
            let gamma = (quad[1] - quad[3]).angle_between(quad[2] - quad[3]).abs();

            let mut connect_lower = alpha + gamma <= std::f32::consts::PI;
            if upper_pivot == upper_len {
                connect_lower = true;
            }
            if lower_pivot == lower_len {
                connect_lower = false;
            }

            let triangle = if connect_lower {
                let tri = [
                    wrap_index(lower_pivot as isize + 1, lower_len) + index_carry,
                    wrap_index(upper_pivot as isize, upper_len) + lower_len + index_carry,
                    wrap_index(lower_pivot as isize, lower_len) + index_carry,
                ];
                if lower_pivot < lower_len {
                    lower_pivot += 1;
                    lower_stretch += lower_delta;
                }
                tri
            } else {
                let tri = [
                    wrap_index(lower_pivot as isize, lower_len) + index_carry,
                    wrap_index(upper_pivot as isize + 1, upper_len) + lower_len + index_carry,
                    wrap_index(upper_pivot as isize, upper_len) + lower_len + index_carry,
                ];
                if upper_pivot < upper_len {
                    upper_pivot += 1;
                    upper_stretch += upper_delta;
                }
                tri
            };
            mesh.indices.extend(triangle.map(|i| i as u32));

            if upper_pivot >= upper_len && lower_pivot >= lower_len {
                index_carry += lower_len;
                break;
            }
        }
    }

    Some(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use landform_contour::ContourLoop;

    fn circle(count: usize, radius: f32) -> ContourLoop {
        let points = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * std::f32::consts::TAU;
                Vec2::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();
        ContourLoop::from_points(points)
    }

    fn stack(levels: Vec<ContourLoop>) -> LoopStack {
        LoopStack {
            levels,
            level_height: 1.0,
        }
    }

    #[test]
    fn test_triangle_count_is_sum_of_pair_lengths() {
        let s = stack(vec![circle(12, 10.0), circle(8, 9.0), circle(5, 8.0)]);
        let mesh = triangulate_stack(&s, &AtomicBool::new(false)).unwrap();

        // Each pointer advance emits exactly one triangle.
        let expected = (12 + 8) + (8 + 5);
        assert_eq!(mesh.triangle_count(), expected);
        assert_eq!(mesh.vertex_count(), 12 + 8 + 5);
    }

    #[test]
    fn test_all_indices_reference_existing_vertices() {
        let s = stack(vec![circle(16, 10.0), circle(7, 9.0), circle(11, 8.0)]);
        let mesh = triangulate_stack(&s, &AtomicBool::new(false)).unwrap();
        assert!(mesh.indices_in_range());
        assert!(mesh.triangle_count() > 0);
    }

    #[test]
    fn test_equal_density_levels_bridge_as_rectangles() {
        // Two identical squares: the unrolled quads are rectangles, whose
        // opposite angles sum to exactly 180, preferring the lower advance.
        let square = ContourLoop::from_points(vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]);
        let s = stack(vec![square.clone(), square]);
        let mesh = triangulate_stack(&s, &AtomicBool::new(false)).unwrap();

        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(
            &mesh.indices[0..3],
            &[1, 4, 0],
            "first step connects the lower edge to the upper start"
        );
    }

    #[test]
    fn test_index_carry_spans_level_pairs() {
        let s = stack(vec![circle(6, 10.0), circle(4, 9.0), circle(3, 8.0)]);
        let mesh = triangulate_stack(&s, &AtomicBool::new(false)).unwrap();

        // Triangles of the second pair may only reference vertices of the
        // second and third levels.
        let second_pair_start = (6 + 4) * 3;
        for &index in &mesh.indices[second_pair_start..] {
            assert!(
                (6..6 + 4 + 3).contains(&(index as usize)),
                "index {index} escaped the second level pair"
            );
        }
    }

    #[test]
    fn test_kill_flag_aborts_triangulation() {
        let s = stack(vec![circle(64, 10.0), circle(32, 9.0)]);
        let killed = AtomicBool::new(true);
        assert!(triangulate_stack(&s, &killed).is_none());
    }

    #[test]
    fn test_single_level_stack_yields_points_only() {
        let s = stack(vec![circle(8, 10.0)]);
        let mesh = triangulate_stack(&s, &AtomicBool::new(false)).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_empty_level_skips_its_bridge() {
        let s = stack(vec![circle(8, 10.0), ContourLoop::new(), circle(6, 8.0)]);
        let mesh = triangulate_stack(&s, &AtomicBool::new(false)).unwrap();
        assert_eq!(mesh.triangle_count(), 0, "both pairs touch the empty level");
        assert!(mesh.indices_in_range());
    }

    #[test]
    fn test_bridged_mesh_heights_match_levels() {
        let s = stack(vec![circle(6, 10.0), circle(4, 9.0)]);
        let mesh = triangulate_stack(&s, &AtomicBool::new(false)).unwrap();
        for (i, position) in mesh.positions.iter().enumerate() {
            let expected = if i < 6 { 0.0 } else { 1.0 };
            assert_eq!(position.y, expected, "vertex {i} on wrong level");
        }
        assert!(mesh.positions.iter().any(|p| *p != Vec3::ZERO));
    }
}
