//! Per-cluster metadata records.
//!
//! A [`ClusterMetadata`] is created during segmentation, widened by the
//! merger, and has its edge-point set populated by the boundary tracer.
//! Records are never destroyed individually; a new segmentation run discards
//! the whole list.

use glam::IVec2;
use hashbrown::HashSet;
use landform_pixel::PixelRect;

/// Cluster id value meaning "no cluster assigned".
pub const UNASSIGNED_CLUSTER_ID: u8 = 0;

/// Id assigned to the first cluster found.
pub const FIRST_CLUSTER_ID: u8 = 5;

/// Distance between consecutive cluster ids, leaving room below
/// [`FIRST_CLUSTER_ID`] for the unassigned sentinel.
pub const CLUSTER_ID_STEP: u8 = 5;

/// Aggregate description of one segmented cluster.
#[derive(Clone, Debug)]
pub struct ClusterMetadata {
    /// Assigned cluster id (multiple of 5, never 0).
    pub id: u8,
    /// Smallest height value observed in the cluster.
    pub min_value: u8,
    /// Largest height value observed in the cluster.
    pub max_value: u8,
    /// Pixel-space bounding rectangle covering all member pixels.
    pub bounds: PixelRect,
    /// Perimeter pixels, empty until populated by the boundary tracer.
    pub edge_points: HashSet<IVec2>,
}

impl ClusterMetadata {
    /// Creates an empty record for a cluster about to be flood-filled over a
    /// buffer of the given extent.
    pub fn new(id: u8, extent: IVec2) -> Self {
        Self {
            id,
            min_value: u8::MAX,
            max_value: 0,
            bounds: PixelRect::collector(extent),
            edge_points: HashSet::new(),
        }
    }

    /// Folds one member pixel into the bounds and value range.
    pub fn record_pixel(&mut self, pos: IVec2, value: u8) {
        self.bounds.include(pos);
        self.min_value = self.min_value.min(value);
        self.max_value = self.max_value.max(value);
    }

    /// Widens the value range to cover an absorbed fragment.
    ///
    /// The bounding rectangle is deliberately left untouched: the fragment
    /// already lies inside it.
    pub fn absorb(&mut self, fragment: &ClusterMetadata) {
        self.min_value = self.min_value.min(fragment.min_value);
        self.max_value = self.max_value.max(fragment.max_value);
    }

    /// The cluster's peak height as a fraction of the byte range.
    pub fn max_value_fraction(&self) -> f32 {
        f32::from(self.max_value) / f32::from(u8::MAX)
    }
}
