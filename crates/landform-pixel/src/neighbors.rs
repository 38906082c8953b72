//! Fixed neighbor-offset tables for flood fills and contour walks.
//!
//! Table order matters: search loops take the first qualifying neighbor, so
//! the ordering below is the tie-break priority.

use glam::IVec2;

/// 4-connected offsets used to grow clusters during segmentation and to
/// expand the outside fill during edge collection.
pub const CLUSTER_GROWTH_NEIGHBORS: [IVec2; 4] = [
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(1, 0),
    IVec2::new(0, -1),
];

/// 8-connected offsets in raster order, used to count same-cluster neighbors
/// during morphological border expansion.
pub const BORDER_SCAN_NEIGHBORS: [IVec2; 8] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// 8-connected offsets in rotational order, used to pick the next edge point
/// while walking a contour loop. The first unconsumed edge point in this
/// order wins.
pub const LOOP_WALK_NEIGHBORS: [IVec2; 8] = [
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
    IVec2::new(1, 0),
    IVec2::new(1, -1),
    IVec2::new(0, -1),
    IVec2::new(-1, -1),
];
