//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format produced by the meshers and consumed
//! by whatever backend uploads the chunk meshes.

use cgmath::Vector3;

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Occlusion: f32 (4 bytes)
/// - Texture Index: u32 (4 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Outward face normal
    pub normal: [f32; 3],
    /// Texture coordinates; values above 1 repeat the texture across merged faces
    pub tex_coords: [f32; 2],
    /// Ambient occlusion brightness (1.0 lit, 0.75 occluded)
    pub occlusion: f32,
    /// Layer of the texture array sampled by this face
    pub texture_index: u32,
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Position in world space
    /// * `normal` - Outward face normal
    /// * `tex_coords` - Texture coordinates
    /// * `occlusion` - Ambient occlusion brightness
    /// * `texture_index` - Texture array layer
    pub fn new(
        position: Vector3<f32>,
        normal: [i32; 3],
        tex_coords: [f32; 2],
        occlusion: f32,
        texture_index: u32,
    ) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.map(|n| n as f32),
            tex_coords,
            occlusion,
            texture_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 40);
        let vertex = Vertex::new(Vector3::new(1.0, 2.0, 3.0), [0, 1, 0], [0.0, 1.0], 0.75, 4);
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes.len(), 40);
        assert_eq!(vertex.normal, [0.0, 1.0, 0.0]);
    }
}
