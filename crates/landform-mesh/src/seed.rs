//! Deterministic per-cluster RNG derivation.
//!
//! The level decimation deltas are randomized; deriving the generator from a
//! world seed and the cluster id keeps mesh output reproducible run-to-run
//! while still decorrelating clusters from each other.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Derives a u64 seed for one cluster from the world seed and cluster id.
///
/// Uses SipHash (via std's `DefaultHasher`) to combine the inputs into a
/// well-distributed u64.
pub fn derive_cluster_seed(world_seed: u64, cluster_id: u8) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    cluster_id.hash(&mut hasher);
    hasher.finish()
}

/// Derives a deterministic RNG for one cluster.
///
/// The returned RNG produces an identical sequence for the same
/// `(world_seed, cluster_id)` pair, regardless of thread or platform.
pub fn cluster_rng(world_seed: u64, cluster_id: u8) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_cluster_seed(world_seed, cluster_id))
}
