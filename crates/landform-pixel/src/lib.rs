//! Packed multi-channel pixel storage and grid primitives for height-field processing.

pub mod buffer;
pub mod neighbors;
pub mod rect;

pub use buffer::{Channel, MAX_CHANNELS, PixelBuffer, PixelBufferError};
pub use neighbors::{BORDER_SCAN_NEIGHBORS, CLUSTER_GROWTH_NEIGHBORS, LOOP_WALK_NEIGHBORS};
pub use rect::{PixelRect, UvRect};
