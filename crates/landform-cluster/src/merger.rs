//! Fold-in of noise fragments produced by segmentation.
//!
//! Clusters whose bounding rectangle is at or below the merge extent in
//! either axis are treated as fragments of a larger landmass. Each fragment
//! is absorbed by the first remaining cluster whose bounds contain all four
//! of the fragment's corners; a fragment with no containing host is dropped.
//! The containment scan is O(clusters x fragments), which is fine for the
//! tens of clusters a capture produces.

use tracing::debug;

use crate::metadata::ClusterMetadata;

/// Counters reported by a merge pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Fragments absorbed into a host cluster.
    pub merged: usize,
    /// Fragments with no containing host, removed from the output.
    pub dropped: usize,
}

/// Folds fragments into their enclosing clusters in place.
///
/// `min_extent` is the fragment threshold in pixels: a cluster is a fragment
/// when its bounds' width or height is `<= min_extent`. Host order is list
/// order; the first containing host wins. Dropped fragments never surface as
/// an error.
pub fn merge_small_clusters(clusters: &mut Vec<ClusterMetadata>, min_extent: i32) -> MergeOutcome {
    let mut fragments = Vec::new();
    let mut i = 0;
    while i < clusters.len() {
        let bounds = &clusters[i].bounds;
        if bounds.width() <= min_extent || bounds.height() <= min_extent {
            fragments.push(clusters.remove(i));
        } else {
            i += 1;
        }
    }

    let mut outcome = MergeOutcome::default();
    for fragment in fragments {
        match clusters
            .iter_mut()
            .find(|host| host.bounds.contains_rect(&fragment.bounds))
        {
            Some(host) => {
                host.absorb(&fragment);
                outcome.merged += 1;
            }
            None => {
                debug!(fragment_id = fragment.id, "fragment has no containing host");
                outcome.dropped += 1;
            }
        }
    }
    outcome
}
