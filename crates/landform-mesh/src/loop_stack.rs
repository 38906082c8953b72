//! Vertical stacks of independently decimated copies of a base loop.
//!
//! Each level simulates an eroded upper terrain band: the same perimeter at
//! a lower point density, lifted to an increasing height. Level densities
//! start around 15% of the base loop's point count and wander by a bounded
//! random delta so adjacent levels never match exactly.

use glam::Vec3;
use landform_contour::{ContourLoop, decimate_loop};
use rand::Rng;
use tracing::warn;

/// Tunables for building a loop stack.
#[derive(Clone, Debug)]
pub struct LoopStackParams {
    /// Number of stacked levels (at least 2).
    pub level_count: usize,
    /// World-space height of a full-value (255) landmass.
    pub world_height: f32,
    /// Baseline fraction of base-loop points kept per level.
    pub base_density: f32,
}

impl Default for LoopStackParams {
    fn default() -> Self {
        Self {
            level_count: 6,
            world_height: 10.0,
            base_density: 0.15,
        }
    }
}

/// Stacked decimated loops with a uniform height step between them.
#[derive(Clone, Debug)]
pub struct LoopStack {
    /// Decimated loops, index 0 at the bottom.
    pub levels: Vec<ContourLoop>,
    /// Vertical distance between consecutive levels.
    pub level_height: f32,
}

impl LoopStack {
    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Height assigned to a level.
    pub fn height_of(&self, level: usize) -> f32 {
        self.level_height * level as f32
    }

    /// Total number of points across all levels.
    pub fn total_points(&self) -> usize {
        self.levels.iter().map(ContourLoop::len).sum()
    }

    /// Flattens all levels into mesh vertex positions, lifting each level to
    /// its height. Loop x/y map to world x/z.
    pub fn mesh_points(&self) -> Vec<Vec3> {
        let mut points = Vec::with_capacity(self.total_points());
        for (level, contour) in self.levels.iter().enumerate() {
            let height = self.height_of(level);
            for &p in contour.points() {
                points.push(Vec3::new(p.x, height, p.y));
            }
        }
        points
    }
}

/// Rolls the per-level decimation deltas.
///
/// A coin flip picks a descending walk (starting in `20..30`) or an
/// ascending one (starting in `3..7`); every level steps the unclamped walk
/// by `3..10` in that direction and records the value clamped to `3..=50`.
pub fn decimation_deltas(level_count: usize, rng: &mut impl Rng) -> Vec<i32> {
    let descending = rng.random_bool(0.5);
    let mut value: i32 = if descending {
        rng.random_range(20..30)
    } else {
        rng.random_range(3..7)
    };

    let mut deltas = Vec::with_capacity(level_count);
    for _ in 0..level_count {
        let step = rng.random_range(3..10);
        value += if descending { -step } else { step };
        deltas.push(value.clamp(3, 50));
    }
    deltas
}

/// Builds the stack of decimated levels for a traced base loop.
///
/// `max_value_fraction` is the cluster's peak height as a fraction of the
/// byte range; it scales the stack's total height so short landmasses stay
/// short.
pub fn build_loop_stack(
    base: &ContourLoop,
    max_value_fraction: f32,
    params: &LoopStackParams,
    rng: &mut impl Rng,
) -> LoopStack {
    let level_count = if params.level_count < 2 {
        warn!(
            level_count = params.level_count,
            "a stack needs at least two levels to bridge"
        );
        2
    } else {
        params.level_count
    };

    let base_target = (base.len() as f32 * params.base_density) as usize;
    let levels = decimation_deltas(level_count, rng)
        .into_iter()
        .map(|delta| decimate_loop(base, base_target.saturating_add(delta as usize)))
        .collect();

    LoopStack {
        levels,
        level_height: params.world_height * max_value_fraction / (level_count - 1) as f32,
    }
}
