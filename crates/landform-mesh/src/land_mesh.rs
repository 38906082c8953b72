//! Mesh data produced by loop-stack triangulation.

use glam::Vec3;

/// A single interleaved vertex, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in world space.
    pub position: [f32; 3],
}

/// Reinterprets a vertex slice as raw bytes for buffer upload.
pub fn vertex_bytes(vertices: &[MeshVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// A triangulated landmass mesh: flat vertex positions plus triangle
/// indices (stride 3).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandMesh {
    /// One position per vertex.
    pub positions: Vec<Vec3>,
    /// Triangle indices into `positions`, three per triangle.
    pub indices: Vec<u32>,
}

impl LandMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if every index references an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        let count = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < count)
    }

    /// Copies positions into the interleaved upload layout.
    pub fn vertex_data(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .map(|p| MeshVertex {
                position: p.to_array(),
            })
            .collect()
    }
}
