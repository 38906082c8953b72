//! Threshold-based flood-fill segmentation of active pixels into clusters.
//!
//! Repeatedly scans row-major for an active, unvisited pixel and grows a
//! cluster from it with a breadth-first 4-connected fill: an adjacent active
//! pixel joins the cluster when its height differs from the current pixel's
//! by at most the difference threshold. Cluster ids are written into the
//! `ClusterId` channel and visited flags into the `Visited` channel as
//! pixels are consumed.

use std::collections::VecDeque;

use glam::IVec2;
use landform_pixel::{CLUSTER_GROWTH_NEIGHBORS, Channel, PixelBuffer};
use tracing::{debug, warn};

use crate::metadata::{CLUSTER_ID_STEP, ClusterMetadata, FIRST_CLUSTER_ID};

/// Tunables for a segmentation run.
#[derive(Clone, Debug)]
pub struct SegmenterParams {
    /// Maximum absolute height difference between adjacent pixels of the
    /// same cluster.
    pub difference_threshold: u8,
}

impl Default for SegmenterParams {
    fn default() -> Self {
        Self {
            difference_threshold: 5,
        }
    }
}

/// Partitions the buffer's active pixels into clusters.
///
/// Expects the 4-channel capture layout: `Height` as the scalar value,
/// `Mask` as the active flag. Mutates the `ClusterId` and `Visited`
/// channels. Returns one metadata record per cluster, in discovery order.
///
/// An empty active set yields an empty list; this is not an error.
pub fn segment_clusters(buffer: &mut PixelBuffer, params: &SegmenterParams) -> Vec<ClusterMetadata> {
    let mut clusters = Vec::new();

    let Some(seed) = find_unvisited_active(buffer) else {
        debug!("no active pixels to segment");
        return clusters;
    };

    let mut queue = VecDeque::new();
    queue.push_back(seed);

    let mut current_id = FIRST_CLUSTER_ID;
    let mut current = ClusterMetadata::new(current_id, buffer.size());

    loop {
        let Some(pos) = queue.pop_front() else {
            // Fill exhausted: close out this cluster and look for the next seed.
            clusters.push(current);

            let Some(next_seed) = find_unvisited_active(buffer) else {
                break;
            };
            let next_id = current_id.wrapping_add(CLUSTER_ID_STEP);
            if next_id < current_id {
                warn!("cluster id overflowed the byte range, ids recycle from {next_id}");
            }
            current_id = next_id;
            current = ClusterMetadata::new(current_id, buffer.size());
            queue.push_back(next_seed);
            continue;
        };

        let Some(index) = buffer.index_of(pos) else {
            continue;
        };
        let pixel = buffer.sample(index);
        if pixel[Channel::Visited.offset()] != 0 {
            // Already consumed via another queue entry.
            continue;
        }

        let height = pixel[Channel::Height.offset()];
        for offset in CLUSTER_GROWTH_NEIGHBORS {
            let neighbor_pos = pos + offset;
            let Some(neighbor_index) = buffer.index_of(neighbor_pos) else {
                continue;
            };
            let neighbor = buffer.sample(neighbor_index);
            let difference =
                (i16::from(height) - i16::from(neighbor[Channel::Height.offset()])).abs();
            if difference <= i16::from(params.difference_threshold)
                && neighbor[Channel::Mask.offset()] != 0
            {
                queue.push_back(neighbor_pos);
            }
        }

        buffer.write(current_id, index, Channel::ClusterId);
        buffer.write(u8::MAX, index, Channel::Visited);
        current.record_pixel(pos, height);
    }

    clusters
}

/// Row-major scan for the first active pixel whose visited flag is unset.
fn find_unvisited_active(buffer: &PixelBuffer) -> Option<IVec2> {
    let size = buffer.size();
    for y in 0..size.y {
        for x in 0..size.x {
            let pos = IVec2::new(x, y);
            let Some(index) = buffer.index_of(pos) else {
                continue;
            };
            let values = buffer.sample(index);
            if values[Channel::Visited.offset()] == 0 && values[Channel::Mask.offset()] != 0 {
                return Some(pos);
            }
        }
    }
    None
}
