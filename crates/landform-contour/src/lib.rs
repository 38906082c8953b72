//! Boundary extraction and contour simplification for segmented clusters.

pub mod contour;
pub mod decimate;
pub mod tracer;

pub use contour::{ContourLoop, wrap_index};
pub use decimate::decimate_loop;
pub use tracer::{BoundaryTracer, TracerState};
