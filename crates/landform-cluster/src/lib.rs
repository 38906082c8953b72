//! Height-continuity segmentation of a pixel capture into landmass clusters.

pub mod debug_viz;
pub mod merger;
pub mod metadata;
pub mod segmenter;

pub use debug_viz::{DebugImage, render_cluster_map, render_height_map};
pub use merger::{MergeOutcome, merge_small_clusters};
pub use metadata::{CLUSTER_ID_STEP, ClusterMetadata, FIRST_CLUSTER_ID, UNASSIGNED_CLUSTER_ID};
pub use segmenter::{SegmenterParams, segment_clusters};
