//! Background meshing of one cluster with cooperative completion polling.
//!
//! Each job runs on its own named worker thread and owns an immutable
//! 3-channel snapshot taken before spawn, so the source capture never needs
//! synchronization. Completion is a single-writer/single-reader result cell
//! (a bounded channel of capacity 1): the primary loop calls
//! [`ClusterMeshJob::poll`] once per tick, and mesh data is only reachable
//! through the returned result, which makes the ready transition the
//! happens-before boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use glam::Vec2;
use landform_cluster::ClusterMetadata;
use landform_contour::BoundaryTracer;
use landform_pixel::PixelBuffer;
use tracing::error;

use crate::bridge::triangulate_stack;
use crate::land_mesh::LandMesh;
use crate::loop_stack::{LoopStack, LoopStackParams, build_loop_stack};
use crate::seed::cluster_rng;

/// Parameters handed to a meshing worker.
#[derive(Clone, Debug)]
pub struct MeshJobParams {
    /// World-space footprint of the full capture.
    pub world_area: Vec2,
    /// World-space height of a full-value landmass.
    pub world_height: f32,
    /// Number of stacked levels.
    pub level_count: usize,
    /// Baseline fraction of base-loop points kept per level.
    pub base_density: f32,
    /// Seed for the per-cluster RNG derivation.
    pub world_seed: u64,
}

impl Default for MeshJobParams {
    fn default() -> Self {
        let stack = LoopStackParams::default();
        Self {
            world_area: Vec2::splat(100.0),
            world_height: stack.world_height,
            level_count: stack.level_count,
            base_density: stack.base_density,
            world_seed: 0,
        }
    }
}

/// Everything a finished job delivers back to the primary loop.
#[derive(Clone, Debug)]
pub struct ClusterMeshResult {
    /// The cluster's metadata with the edge-point set populated.
    pub metadata: ClusterMetadata,
    /// The stacked decimated loops the mesh was built from.
    pub loop_stack: LoopStack,
    /// The bridged triangle mesh.
    pub mesh: LandMesh,
    /// Worker wall time in microseconds, for profiling.
    pub build_time_us: u64,
}

/// Terminal state reported by [`ClusterMeshJob::poll`], exactly once.
#[derive(Debug)]
pub enum MeshJobOutcome {
    /// The worker finished and delivered its result.
    Finished(Box<ClusterMeshResult>),
    /// The kill flag aborted triangulation; no mesh was produced.
    Cancelled,
    /// The worker died without reporting (a logic defect in that cluster's
    /// processing). Other clusters are unaffected.
    Failed,
}

/// A per-cluster meshing job running on a dedicated worker thread.
pub struct ClusterMeshJob {
    receiver: Receiver<MeshJobOutcome>,
    kill: Arc<AtomicBool>,
    cluster_id: u8,
    settled: bool,
}

impl ClusterMeshJob {
    /// Spawns the worker.
    ///
    /// `snapshot` must be the capture's 3-channel meshing snapshot; the
    /// worker takes ownership and the caller may keep using the source
    /// buffer freely.
    pub fn spawn(
        snapshot: PixelBuffer,
        mut metadata: ClusterMetadata,
        params: MeshJobParams,
    ) -> Self {
        let (sender, receiver) = bounded(1);
        let kill = Arc::new(AtomicBool::new(false));
        let cluster_id = metadata.id;

        let worker_kill = Arc::clone(&kill);
        std::thread::Builder::new()
            .name(format!("cluster-mesh-{cluster_id}"))
            .spawn(move || {
                let start = Instant::now();

                let mut tracer = BoundaryTracer::new(snapshot, params.world_area);
                let base_loop = tracer.trace(&mut metadata);

                let mut rng = cluster_rng(params.world_seed, metadata.id);
                let stack_params = LoopStackParams {
                    level_count: params.level_count,
                    world_height: params.world_height,
                    base_density: params.base_density,
                };
                let loop_stack = build_loop_stack(
                    &base_loop,
                    metadata.max_value_fraction(),
                    &stack_params,
                    &mut rng,
                );

                let outcome = match triangulate_stack(&loop_stack, &worker_kill) {
                    Some(mesh) => MeshJobOutcome::Finished(Box::new(ClusterMeshResult {
                        metadata,
                        loop_stack,
                        mesh,
                        build_time_us: start.elapsed().as_micros() as u64,
                    })),
                    None => MeshJobOutcome::Cancelled,
                };
                let _ = sender.send(outcome);
            })
            .expect("failed to spawn cluster meshing worker");

        Self {
            receiver,
            kill,
            cluster_id,
            settled: false,
        }
    }

    /// The cluster this job is meshing.
    pub fn cluster_id(&self) -> u8 {
        self.cluster_id
    }

    /// Non-blocking completion check; call once per tick.
    ///
    /// Returns `Some` exactly once, when the worker has delivered. A worker
    /// that died without delivering reports [`MeshJobOutcome::Failed`].
    pub fn poll(&mut self) -> Option<MeshJobOutcome> {
        if self.settled {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(outcome) => {
                self.settled = true;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.settled = true;
                error!(cluster_id = self.cluster_id, "meshing worker died without a result");
                Some(MeshJobOutcome::Failed)
            }
        }
    }

    /// Returns `true` once [`ClusterMeshJob::poll`] has reported an outcome.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Requests an early abort of the triangulation stage.
    ///
    /// Tracing and decimation run to completion regardless; only the
    /// bridging inner loop observes the flag.
    pub fn kill(&self) {
        self.kill.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use landform_pixel::Channel;
    use std::time::Duration;

    /// A 3-channel snapshot holding one solid square cluster, plus its
    /// metadata.
    fn square_cluster_snapshot() -> (PixelBuffer, ClusterMetadata) {
        let mut buffer = PixelBuffer::new(IVec2::splat(24), 3);
        let mut meta = ClusterMetadata::new(5, buffer.size());
        for y in 4..20 {
            for x in 4..20 {
                let pos = IVec2::new(x, y);
                let index = buffer.index_of(pos).unwrap();
                buffer.write(5, index, Channel::ClusterId);
                buffer.write(180, index, Channel::Height);
                meta.record_pixel(pos, 180);
            }
        }
        (buffer, meta)
    }

    fn poll_to_outcome(job: &mut ClusterMeshJob) -> MeshJobOutcome {
        let deadline = Instant::now() + Duration::from_secs(30);
        loop {
            if let Some(outcome) = job.poll() {
                return outcome;
            }
            assert!(Instant::now() < deadline, "job never settled");
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_job_delivers_valid_mesh_through_poll() {
        let (snapshot, meta) = square_cluster_snapshot();
        let mut job = ClusterMeshJob::spawn(snapshot, meta, MeshJobParams::default());
        assert!(!job.is_settled());

        let outcome = poll_to_outcome(&mut job);
        let MeshJobOutcome::Finished(result) = outcome else {
            panic!("expected a finished job, got {outcome:?}");
        };
        assert!(job.is_settled());
        assert!(result.mesh.indices_in_range());
        assert!(result.mesh.triangle_count() > 0);
        assert!(
            !result.metadata.edge_points.is_empty(),
            "tracer populates the edge set"
        );
        assert_eq!(result.loop_stack.level_count(), MeshJobParams::default().level_count);

        // The result cell delivers exactly once.
        assert!(job.poll().is_none());
    }

    #[test]
    fn test_no_result_is_observable_before_ready() {
        let (snapshot, meta) = square_cluster_snapshot();
        let mut job = ClusterMeshJob::spawn(snapshot, meta, MeshJobParams::default());

        // Every pre-ready poll comes back empty; data never leaks early.
        let mut saw_result = false;
        for _ in 0..100_000 {
            match job.poll() {
                None => assert!(!saw_result),
                Some(MeshJobOutcome::Finished(result)) => {
                    assert!(result.mesh.indices_in_range());
                    saw_result = true;
                    break;
                }
                Some(other) => panic!("unexpected outcome {other:?}"),
            }
        }
        if !saw_result {
            // Slow machine: fall back to the blocking wait.
            let outcome = poll_to_outcome(&mut job);
            assert!(matches!(outcome, MeshJobOutcome::Finished(_)));
        }
    }

    #[test]
    fn test_same_seed_produces_identical_meshes() {
        let (snapshot_a, meta_a) = square_cluster_snapshot();
        let (snapshot_b, meta_b) = square_cluster_snapshot();
        let params = MeshJobParams {
            world_seed: 1234,
            ..Default::default()
        };

        let mut job_a = ClusterMeshJob::spawn(snapshot_a, meta_a, params.clone());
        let mut job_b = ClusterMeshJob::spawn(snapshot_b, meta_b, params);

        let (MeshJobOutcome::Finished(a), MeshJobOutcome::Finished(b)) =
            (poll_to_outcome(&mut job_a), poll_to_outcome(&mut job_b))
        else {
            panic!("both jobs should finish");
        };
        assert_eq!(a.mesh, b.mesh, "seeded pipeline must be deterministic");
    }

    #[test]
    fn test_kill_requests_early_abort() {
        let (snapshot, meta) = square_cluster_snapshot();
        let mut job = ClusterMeshJob::spawn(snapshot, meta, MeshJobParams::default());
        job.kill();

        // The worker may already have passed the bridging loop; both
        // outcomes are acceptable, but the job must settle either way.
        let outcome = poll_to_outcome(&mut job);
        assert!(matches!(
            outcome,
            MeshJobOutcome::Cancelled | MeshJobOutcome::Finished(_)
        ));
        assert!(job.is_settled());
    }

    #[test]
    fn test_cluster_with_no_pixels_finishes_empty() {
        let buffer = PixelBuffer::new(IVec2::splat(16), 3);
        let meta = ClusterMetadata::new(10, buffer.size());
        let mut job = ClusterMeshJob::spawn(buffer, meta, MeshJobParams::default());

        let outcome = poll_to_outcome(&mut job);
        let MeshJobOutcome::Finished(result) = outcome else {
            panic!("degenerate clusters still finish, got {outcome:?}");
        };
        assert_eq!(result.mesh.vertex_count(), 0);
        assert_eq!(result.mesh.triangle_count(), 0);
    }
}
