//! Boundary tracing of one cluster into a closed world-space contour loop.
//!
//! The tracer owns a 3-channel meshing snapshot and runs a three-phase state
//! machine over the cluster's bounding rectangle:
//!
//! 1. `ExpandBorders` — morphological regularization: every pixel in the
//!    padded bounds whose 8-neighborhood is partially (but not fully)
//!    occupied by the cluster is relabeled with the cluster id, thickening
//!    the mask into a well-connected border.
//! 2. `CollectEdges` — an outside-in flood search from the four sides of the
//!    bounds. Cluster pixels reached by the outside fill are recorded as
//!    edge points; non-cluster pixels extend the fill and un-record any
//!    interior false positive they touch.
//! 3. `WalkLoop` — consumes the edge set into one ordered loop by always
//!    stepping to the first unconsumed 8-neighbor in walk-priority order,
//!    projecting each pixel into world space.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use landform_cluster::ClusterMetadata;
use landform_pixel::{
    BORDER_SCAN_NEIGHBORS, CLUSTER_GROWTH_NEIGHBORS, Channel, LOOP_WALK_NEIGHBORS, PixelBuffer,
};
use tracing::{debug, warn};

use crate::contour::ContourLoop;

/// Phases of the boundary trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracerState {
    /// Regularizing the cluster mask around its boundary.
    ExpandBorders,
    /// Collecting the perimeter pixel set.
    CollectEdges,
    /// Walking the edge set into an ordered loop.
    WalkLoop,
    /// Trace finished.
    Done,
}

/// Traces one cluster's perimeter on an owned pixel snapshot.
pub struct BoundaryTracer {
    buffer: PixelBuffer,
    world_area: Vec2,
    state: TracerState,
}

impl BoundaryTracer {
    /// Creates a tracer over an owned meshing snapshot.
    ///
    /// `world_area` is the world-space footprint the full buffer represents;
    /// the produced loop is centered on the origin.
    pub fn new(snapshot: PixelBuffer, world_area: Vec2) -> Self {
        Self {
            buffer: snapshot,
            world_area,
            state: TracerState::ExpandBorders,
        }
    }

    /// Current phase, for diagnostics.
    pub fn state(&self) -> TracerState {
        self.state
    }

    /// Runs all phases and returns the traced loop.
    ///
    /// Populates `meta.edge_points` as a side effect. A cluster with no
    /// collectable edge reports an empty loop rather than failing.
    pub fn trace(&mut self, meta: &mut ClusterMetadata) -> ContourLoop {
        self.expand_borders(meta);
        self.collect_edges(meta);
        self.walk_loop(meta)
    }

    fn expand_borders(&mut self, meta: &ClusterMetadata) {
        self.state = TracerState::ExpandBorders;
        let bounds = meta.bounds;

        // Two phases: collect first, relabel after, so relabeling does not
        // feed back into the neighbor counts of the same pass.
        let padded = bounds.padded(1);
        let mut expand_indices = Vec::new();
        for y in padded.min.y..padded.max.y {
            for x in padded.min.x..padded.max.x {
                let pos = IVec2::new(x, y);
                let mut neighbor_count = 0;
                for offset in BORDER_SCAN_NEIGHBORS {
                    if let Some(index) = self.buffer.index_of(pos + offset)
                        && self.buffer.sample(index)[Channel::ClusterId.offset()] == meta.id
                    {
                        neighbor_count += 1;
                    }
                }
                if let Some(index) = self.buffer.index_of(pos)
                    && neighbor_count != 0
                    && neighbor_count != 8
                {
                    expand_indices.push(index);
                }
            }
        }

        debug!(
            cluster_id = meta.id,
            expanded = expand_indices.len(),
            "border expansion"
        );
        for index in expand_indices {
            self.buffer.write(meta.id, index, Channel::ClusterId);
        }
    }

    fn collect_edges(&mut self, meta: &mut ClusterMetadata) {
        self.state = TracerState::CollectEdges;
        let bounds = meta.bounds;

        for side in 0..2 {
            let row = if side == 0 { 0 } else { bounds.height() };
            for it in 0..=bounds.width() {
                self.search_from(bounds.min + IVec2::new(it, row), meta);
            }
        }
        for side in 0..2 {
            let column = if side == 0 { 0 } else { bounds.width() };
            for it in 0..=bounds.height() {
                self.search_from(bounds.min + IVec2::new(column, it), meta);
            }
        }
    }

    /// One bounded outside-fill starting from a side pixel of the bounds.
    fn search_from(&mut self, start: IVec2, meta: &mut ClusterMetadata) {
        let Some(start_index) = self.buffer.index_of(start) else {
            return;
        };
        let values = self.buffer.sample(start_index);
        if values[Channel::ClusterId.offset()] == meta.id {
            meta.edge_points.insert(start);
            return;
        }
        if values[Channel::Visited.offset()] != 0 {
            return;
        }

        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            let Some(current_index) = self.buffer.index_of(current) else {
                continue;
            };
            if self.buffer.sample(current_index)[Channel::Visited.offset()] != 0 {
                continue;
            }

            for offset in CLUSTER_GROWTH_NEIGHBORS {
                let neighbor = current + offset;
                if !meta.bounds.contains(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = self.buffer.index_of(neighbor) else {
                    continue;
                };
                if self.buffer.sample(neighbor_index)[Channel::ClusterId.offset()] != meta.id {
                    // Still outside: keep expanding, and retract any edge
                    // point the expansion proves to be an interior false
                    // positive.
                    queue.push_back(neighbor);
                    meta.edge_points.remove(&neighbor);
                } else {
                    meta.edge_points.insert(neighbor);
                }
            }

            self.buffer.write(u8::MAX, current_index, Channel::Visited);
        }
    }

    fn walk_loop(&mut self, meta: &ClusterMetadata) -> ContourLoop {
        self.state = TracerState::WalkLoop;
        let Some(&start) = meta.edge_points.iter().min_by_key(|p| (p.y, p.x)) else {
            warn!(cluster_id = meta.id, "no edge points collected, reporting an empty loop");
            self.state = TracerState::Done;
            return ContourLoop::new();
        };

        let mut remaining = meta.edge_points.clone();
        remaining.remove(&start);

        let mut result = ContourLoop::new();
        let mut pivot = start;
        result.push(self.to_world_space(pivot));

        'walk: loop {
            for offset in LOOP_WALK_NEIGHBORS {
                let candidate = pivot + offset;
                if remaining.remove(&candidate) {
                    pivot = candidate;
                    result.push(self.to_world_space(pivot));
                    continue 'walk;
                }
            }
            // No unconsumed neighbor left: the walk is back at (or next to)
            // its start.
            break;
        }

        self.state = TracerState::Done;
        result
    }

    /// Projects a pixel position into origin-centered world space.
    fn to_world_space(&self, pos: IVec2) -> Vec2 {
        let normalized = pos.as_vec2() / self.buffer.size().as_vec2() - Vec2::splat(0.5);
        normalized * self.world_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 3-channel snapshot with the given pixels pre-assigned to cluster 5,
    /// plus the matching metadata record.
    fn snapshot_with_cluster(size: i32, pixels: &[(i32, i32)]) -> (PixelBuffer, ClusterMetadata) {
        let mut buffer = PixelBuffer::new(IVec2::splat(size), 3);
        let mut meta = ClusterMetadata::new(5, buffer.size());
        for &(x, y) in pixels {
            let pos = IVec2::new(x, y);
            let index = buffer.index_of(pos).unwrap();
            buffer.write(5, index, Channel::ClusterId);
            meta.record_pixel(pos, 128);
        }
        (buffer, meta)
    }

    fn filled_square(size: i32, min: i32, max_exclusive: i32) -> (PixelBuffer, ClusterMetadata) {
        let mut pixels = Vec::new();
        for y in min..max_exclusive {
            for x in min..max_exclusive {
                pixels.push((x, y));
            }
        }
        snapshot_with_cluster(size, &pixels)
    }

    /// Inverse of the tracer's world projection, for checking loop pixels
    /// against the edge set.
    fn to_pixel_space(point: Vec2, size: i32, world_area: Vec2) -> IVec2 {
        let normalized = point / world_area + Vec2::splat(0.5);
        let scaled = normalized * IVec2::splat(size).as_vec2();
        IVec2::new(scaled.x.round() as i32, scaled.y.round() as i32)
    }

    #[test]
    fn test_expand_borders_thickens_single_pixel_cluster() {
        let (buffer, meta) = snapshot_with_cluster(8, &[(3, 3)]);
        let mut tracer = BoundaryTracer::new(buffer, Vec2::splat(8.0));
        tracer.expand_borders(&meta);

        // Every pixel of the 3x3 neighborhood around (3,3) now carries the id.
        for y in 2..=4 {
            for x in 2..=4 {
                let index = tracer.buffer.index_of(IVec2::new(x, y)).unwrap();
                assert_eq!(
                    tracer.buffer.sample(index)[Channel::ClusterId.offset()],
                    5,
                    "({x}, {y}) should be relabeled"
                );
            }
        }
        // The ring one step further out stays unassigned.
        let index = tracer.buffer.index_of(IVec2::new(1, 3)).unwrap();
        assert_eq!(tracer.buffer.sample(index)[Channel::ClusterId.offset()], 0);
    }

    #[test]
    fn test_collect_edges_records_square_perimeter() {
        let (buffer, mut meta) = filled_square(12, 3, 8);
        let mut tracer = BoundaryTracer::new(buffer, Vec2::splat(12.0));
        tracer.expand_borders(&meta);
        tracer.collect_edges(&mut meta);

        assert!(!meta.edge_points.is_empty());
        // The bounds' corner pixels sit on the perimeter walk.
        assert!(meta.edge_points.contains(&IVec2::new(3, 3)));
        assert!(meta.edge_points.contains(&IVec2::new(8, 8)));
        // The square's center is interior and must not be recorded.
        assert!(!meta.edge_points.contains(&IVec2::new(5, 5)));
    }

    #[test]
    fn test_outside_fill_records_concave_walls() {
        // An L-shape: a 5x5 block with its top-right 2x3 quadrant missing.
        // The missing quadrant lies inside the bounds, so edge collection
        // must flood it from the side walk and record the inner walls.
        let mut pixels = Vec::new();
        for y in 3..8 {
            for x in 3..8 {
                if !(x >= 6 && y <= 5) {
                    pixels.push((x, y));
                }
            }
        }
        let (buffer, mut meta) = snapshot_with_cluster(14, &pixels);
        let mut tracer = BoundaryTracer::new(buffer, Vec2::splat(14.0));
        tracer.expand_borders(&meta);
        tracer.collect_edges(&mut meta);

        assert!(meta.edge_points.contains(&IVec2::new(3, 3)));
        // (6,4) borders the flooded pocket and is reachable only through the
        // outside fill, never through a side walk.
        assert!(
            meta.edge_points.contains(&IVec2::new(6, 4)),
            "inner wall of the concavity must be recorded"
        );
        assert!(
            !meta.edge_points.contains(&IVec2::new(7, 3)),
            "outside territory is not an edge"
        );
        assert!(!meta.edge_points.contains(&IVec2::new(4, 4)), "interior stays unrecorded");
    }

    #[test]
    fn test_walk_produces_closed_loop_of_edge_pixels() {
        let size = 12;
        let world_area = Vec2::splat(24.0);
        let (buffer, mut meta) = filled_square(size, 3, 8);
        let mut tracer = BoundaryTracer::new(buffer, world_area);
        let traced = tracer.trace(&mut meta);

        assert_eq!(tracer.state(), TracerState::Done);
        assert!(traced.len() >= 4, "square perimeter walk yields a real loop");

        let loop_pixels: Vec<IVec2> = traced
            .points()
            .iter()
            .map(|&p| to_pixel_space(p, size, world_area))
            .collect();

        for pixel in &loop_pixels {
            assert!(
                meta.edge_points.contains(pixel),
                "loop pixel {pixel} must come from the edge set"
            );
        }
        for pair in loop_pixels.windows(2) {
            let step = pair[1] - pair[0];
            assert!(
                step.x.abs() <= 1 && step.y.abs() <= 1,
                "consecutive loop pixels must stay 8-adjacent: {} -> {}",
                pair[0],
                pair[1]
            );
        }
        let closing = loop_pixels[loop_pixels.len() - 1] - loop_pixels[0];
        assert!(
            closing.x.abs() <= 1 && closing.y.abs() <= 1,
            "walk must end 8-adjacent to its start"
        );
    }

    #[test]
    fn test_empty_edge_set_reports_empty_loop() {
        let buffer = PixelBuffer::new(IVec2::splat(8), 3);
        let meta = ClusterMetadata::new(5, buffer.size());
        let mut tracer = BoundaryTracer::new(buffer, Vec2::splat(8.0));
        let traced = tracer.walk_loop(&meta);
        assert!(traced.is_empty());
        assert_eq!(tracer.state(), TracerState::Done);
    }

    #[test]
    fn test_world_projection_is_origin_centered() {
        let size = 8;
        let (buffer, mut meta) = filled_square(size, 1, 7);
        let mut tracer = BoundaryTracer::new(buffer, Vec2::new(16.0, 16.0));
        let traced = tracer.trace(&mut meta);

        let centroid: Vec2 =
            traced.points().iter().sum::<Vec2>() / traced.len() as f32;
        assert!(
            centroid.length() < 2.5,
            "loop of a centered cluster should surround the origin, centroid {centroid}"
        );
        for &p in traced.points() {
            assert!(p.x.abs() <= 8.0 && p.y.abs() <= 8.0, "point {p} outside world area");
        }
    }
}
