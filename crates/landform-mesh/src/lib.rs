//! Loop-stack meshing: stacked decimated contours bridged into a terrain skin.

pub mod bridge;
pub mod job;
pub mod land_mesh;
pub mod loop_stack;
pub mod seed;

pub use bridge::triangulate_stack;
pub use job::{ClusterMeshJob, ClusterMeshResult, MeshJobOutcome, MeshJobParams};
pub use land_mesh::{LandMesh, MeshVertex, vertex_bytes};
pub use loop_stack::{LoopStack, LoopStackParams, build_loop_stack, decimation_deltas};
pub use seed::{cluster_rng, derive_cluster_seed};
