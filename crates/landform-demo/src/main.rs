//! Demo binary: bakes a synthetic height-field capture, segments it into
//! landmass clusters, meshes every cluster on background workers, and writes
//! debug PNGs plus one OBJ per landmass.
//!
//! Run with `cargo run -p landform-demo`. Settings come from an optional RON
//! config (`--config landform.ron`) with CLI overrides, e.g.
//! `cargo run -p landform-demo -- --resolution 120 --seed 7`.

mod heightfield;
mod obj_export;

use std::error::Error;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use glam::Vec2;
use landform_cluster::{
    DebugImage, merge_small_clusters, render_cluster_map, render_height_map, segment_clusters,
    SegmenterParams,
};
use landform_config::{CliArgs, Config};
use landform_mesh::{ClusterMeshJob, ClusterMeshResult, MeshJobOutcome, MeshJobParams, vertex_bytes};
use tracing::{debug, error, info, warn};

use crate::heightfield::{HeightFieldParams, bake_capture};
use crate::obj_export::export_obj;

fn main() {
    let args = CliArgs::parse();
    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("could not load {}: {e}, using defaults", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    landform_log::init_logging(None, cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config) {
        error!("demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let out_dir = &config.debug.out_dir;
    std::fs::create_dir_all(out_dir)?;

    let capture_params = HeightFieldParams {
        seed: config.meshing.world_seed as u32,
        sea_level: config.capture.sea_level,
        ..Default::default()
    };
    let mut capture = bake_capture(config.capture.resolution, &capture_params);
    info!(
        resolution = config.capture.resolution,
        sea_level = config.capture.sea_level,
        "baked height-field capture"
    );

    let segmenter_params = SegmenterParams {
        difference_threshold: config.segmentation.difference_threshold,
    };
    let mut clusters = segment_clusters(&mut capture, &segmenter_params);
    info!(clusters = clusters.len(), "segmentation finished");
    if clusters.is_empty() {
        warn!("no landmasses above sea level, nothing to mesh");
        return Ok(());
    }

    let merge = merge_small_clusters(&mut clusters, config.segmentation.merge_extent);
    info!(
        merged = merge.merged,
        dropped = merge.dropped,
        remaining = clusters.len(),
        "fragment merge finished"
    );

    if config.debug.dump_images {
        write_png(&out_dir.join("height.png"), &render_height_map(&capture))?;
        write_png(&out_dir.join("clusters.png"), &render_cluster_map(&capture))?;
        info!(dir = %out_dir.display(), "wrote debug images");
    }

    // One immutable snapshot per job; the capture itself stays with us.
    let job_params = MeshJobParams {
        world_area: Vec2::new(config.capture.world_width, config.capture.world_depth),
        world_height: config.meshing.world_height,
        level_count: config.meshing.level_count,
        base_density: config.meshing.base_density,
        world_seed: config.meshing.world_seed,
    };
    let mut jobs: Vec<ClusterMeshJob> = clusters
        .into_iter()
        .map(|meta| ClusterMeshJob::spawn(capture.meshing_snapshot(), meta, job_params.clone()))
        .collect();
    info!(jobs = jobs.len(), "spawned meshing workers");

    // Primary loop: poll each job once per tick until all settle.
    let mut results: Vec<ClusterMeshResult> = Vec::new();
    while jobs.iter().any(|job| !job.is_settled()) {
        for job in &mut jobs {
            match job.poll() {
                None => {}
                Some(MeshJobOutcome::Finished(result)) => {
                    info!(
                        cluster_id = result.metadata.id,
                        triangles = result.mesh.triangle_count(),
                        build_time_us = result.build_time_us,
                        "landmass meshed"
                    );
                    results.push(*result);
                }
                Some(MeshJobOutcome::Cancelled) => {
                    warn!(cluster_id = job.cluster_id(), "meshing cancelled");
                }
                Some(MeshJobOutcome::Failed) => {
                    error!(cluster_id = job.cluster_id(), "meshing failed");
                }
            }
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    for result in &results {
        if result.mesh.triangle_count() == 0 {
            debug!(cluster_id = result.metadata.id, "skipping empty mesh");
            continue;
        }
        let name = format!("landmass-{}", result.metadata.id);
        let path = out_dir.join(format!("{name}.obj"));
        export_obj(&path, &name, &result.mesh)?;

        let vertices = result.mesh.vertex_data();
        let upload = vertex_bytes(&vertices);
        debug!(
            cluster_id = result.metadata.id,
            vertices = result.mesh.vertex_count(),
            upload_bytes = upload.len(),
            footprint_uv = ?result.metadata.bounds.to_uv(capture.size()),
            obj = %path.display(),
            "exported landmass"
        );
    }

    info!(landmasses = results.len(), "pipeline complete");
    Ok(())
}

fn write_png(path: &Path, image: &DebugImage) -> Result<(), Box<dyn Error>> {
    let file = std::fs::File::create(path)?;
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.pixels)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use landform_pixel::Channel;

    #[test]
    fn test_full_pipeline_produces_valid_meshes() {
        let mut config = Config::default();
        config.capture.resolution = 48;
        config.meshing.world_seed = 3;
        config.debug.dump_images = false;

        let capture_params = HeightFieldParams {
            seed: config.meshing.world_seed as u32,
            sea_level: config.capture.sea_level,
            ..Default::default()
        };
        let mut capture = bake_capture(config.capture.resolution, &capture_params);
        let mut clusters = segment_clusters(
            &mut capture,
            &SegmenterParams {
                difference_threshold: config.segmentation.difference_threshold,
            },
        );
        merge_small_clusters(&mut clusters, config.segmentation.merge_extent);
        assert!(!clusters.is_empty(), "default bake should produce landmasses");

        let params = MeshJobParams {
            world_seed: 3,
            ..Default::default()
        };
        let mut jobs: Vec<ClusterMeshJob> = clusters
            .into_iter()
            .map(|meta| ClusterMeshJob::spawn(capture.meshing_snapshot(), meta, params.clone()))
            .collect();

        let deadline = std::time::Instant::now() + Duration::from_secs(60);
        let mut finished = 0;
        while jobs.iter().any(|job| !job.is_settled()) {
            assert!(std::time::Instant::now() < deadline, "jobs never settled");
            for job in &mut jobs {
                if let Some(MeshJobOutcome::Finished(result)) = job.poll() {
                    assert!(result.mesh.indices_in_range());
                    finished += 1;
                }
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(finished, jobs.len(), "every cluster job should finish");
    }

    #[test]
    fn test_write_png_encodes_debug_image() {
        let capture = bake_capture(16, &HeightFieldParams::default());
        let image = render_height_map(&capture);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("height.png");
        write_png(&path, &image).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_segmentation_only_touches_working_channels() {
        let params = HeightFieldParams::default();
        let reference = bake_capture(32, &params);
        let mut capture = bake_capture(32, &params);
        segment_clusters(&mut capture, &SegmenterParams::default());

        // Height and mask are inputs and must survive segmentation intact.
        for y in 0..32 {
            for x in 0..32 {
                let pos = glam::IVec2::new(x, y);
                let a = reference.sample(reference.index_of(pos).unwrap());
                let b = capture.sample(capture.index_of(pos).unwrap());
                assert_eq!(a[Channel::Height.offset()], b[Channel::Height.offset()]);
                assert_eq!(a[Channel::Mask.offset()], b[Channel::Mask.offset()]);
            }
        }
    }
}
