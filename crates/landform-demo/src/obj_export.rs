//! Minimal Wavefront OBJ writer for landmass meshes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use landform_mesh::LandMesh;

/// Writes the mesh as an OBJ file with `v` and `f` records.
///
/// OBJ indices are 1-based; triangle winding is kept as produced by the
/// bridging pass.
pub fn export_obj(path: &Path, name: &str, mesh: &LandMesh) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "o {name}")?;
    for p in &mesh.positions {
        writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for triangle in mesh.indices.chunks_exact(3) {
        writeln!(
            w,
            "f {} {} {}",
            triangle[0] + 1,
            triangle[1] + 1,
            triangle[2] + 1
        )?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_export_writes_vertices_and_faces() {
        let mesh = LandMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("landmass.obj");
        export_obj(&path, "landmass-5", &mesh).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 2);
        assert!(text.contains("o landmass-5"));
        assert!(
            text.contains("f 1 2 3"),
            "face indices must be 1-based: {text}"
        );
    }
}
