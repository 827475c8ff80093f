use cgmath::Vector3;

use crate::engine_state::{
    rendering::Vertex,
    voxels::{
        block::block_side::{BlockSide, FACE_UVS},
        chunk::{BLOCK_PITCH, BLOCK_SIZE},
    },
};

/// Represents a single quad of a chunk mesh.
///
/// A face covers a rectangle of `size` voxels on one side of the voxels it
/// belongs to. The culled mesher always emits 1x1 faces; the greedy mesher
/// grows them along the two tangent axes of the side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Which side of the block this face represents
    pub side: BlockSide,
    /// World-space centre of the covered voxel with the lowest tangent coordinates
    pub origin: Vector3<f32>,
    /// Covered voxels along the side's first and second tangent axis
    pub size: [u32; 2],
    /// Texture array layer sampled by the face
    pub texture_layer: u32,
    /// Brightness per corner, in [`BlockSide::corners`] order
    pub occlusion: [f32; 4],
}

impl Face {
    /// Creates a new face covering a single voxel.
    ///
    /// # Arguments
    /// * `side` - Which side of the voxel the face is on
    /// * `origin` - World-space centre of the voxel
    /// * `texture_layer` - Texture array layer
    /// * `occlusion` - Per-corner brightness
    pub fn new(side: BlockSide, origin: Vector3<f32>, texture_layer: u32, occlusion: [f32; 4]) -> Self {
        Face {
            side,
            origin,
            size: [1, 1],
            texture_layer,
            occlusion,
        }
    }

    /// Returns the face stretched over `size` voxels along the side's tangent axes.
    pub fn with_size(mut self, size: [u32; 2]) -> Self {
        self.size = size;
        self
    }

    fn extent(&self, axis: usize) -> u32 {
        let (u, v) = self.side.tangent_axes();
        if axis == u {
            self.size[0]
        } else if axis == v {
            self.size[1]
        } else {
            1
        }
    }

    /// The four corner vertices of the quad.
    ///
    /// Texture coordinates run from 0 to the face extent along each texture
    /// axis, so merged faces repeat the texture once per voxel.
    pub fn vertices(&self) -> [Vertex; 4] {
        let corners = self.side.corners();
        let tex_u_axis = differing_axis(corners[0], corners[1]);
        let tex_v_axis = differing_axis(corners[0], corners[3]);
        let uv_scale = [self.extent(tex_u_axis) as f32, self.extent(tex_v_axis) as f32];

        let mut vertices = [Vertex::new(self.origin, [0; 3], [0.0; 2], 1.0, 0); 4];
        for (k, corner) in corners.iter().enumerate() {
            let mut position = self.origin;
            for axis in 0..3 {
                let span = (self.extent(axis) - 1) as f32 * BLOCK_PITCH;
                position[axis] += if corner[axis] < 0 { -BLOCK_SIZE } else { span + BLOCK_SIZE };
            }

            vertices[k] = Vertex::new(
                position,
                self.side.normal(),
                [FACE_UVS[k][0] * uv_scale[0], FACE_UVS[k][1] * uv_scale[1]],
                self.occlusion[k],
                self.texture_layer,
            );
        }
        vertices
    }

    /// Triangle indices of the quad, offset by `base`.
    ///
    /// The quad is split along the diagonal whose corners are brighter in sum,
    /// so occlusion interpolates without a dark seam.
    pub fn indices(&self, base: u32) -> [u32; 6] {
        let ao = self.occlusion;
        if ao[0] + ao[2] > ao[1] + ao[3] {
            [base, base + 1, base + 2, base, base + 2, base + 3]
        } else {
            [base + 3, base, base + 1, base + 3, base + 1, base + 2]
        }
    }
}

fn differing_axis(a: [i32; 3], b: [i32; 3]) -> usize {
    (0..3).find(|&axis| a[axis] != b[axis]).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_face_spans_one_voxel() {
        let face = Face::new(BlockSide::FRONT, Vector3::new(2.0, 3.0, 4.0), 7, [1.0; 4]);
        let vertices = face.vertices();
        assert_eq!(vertices[0].position, [1.5, 2.5, 4.5]);
        assert_eq!(vertices[2].position, [2.5, 3.5, 4.5]);
        assert_eq!(vertices[2].tex_coords, [1.0, 1.0]);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0] && v.texture_index == 7));
    }

    #[test]
    fn merged_face_stretches_positions_and_uvs() {
        // top face: tangent axes x (size[0]) and z (size[1])
        let face = Face::new(BlockSide::TOP, Vector3::new(0.0, 5.0, 0.0), 1, [1.0; 4]).with_size([3, 2]);
        let vertices = face.vertices();
        // p3 is the +x/+z corner
        assert_eq!(vertices[1].position, [2.5, 5.5, 1.5]);
        assert_eq!(vertices[3].position, [-0.5, 5.5, -0.5]);
        assert_eq!(vertices[1].tex_coords, [3.0, 0.0]);
        assert_eq!(vertices[2].tex_coords, [3.0, 2.0]);
    }

    #[test]
    fn split_follows_the_brighter_diagonal() {
        let lit = Face::new(BlockSide::TOP, Vector3::new(0.0, 0.0, 0.0), 0, [1.0; 4]);
        assert_eq!(lit.indices(0), [3, 0, 1, 3, 1, 2]);

        let bright_02 = Face { occlusion: [1.0, 0.75, 1.0, 0.75], ..lit };
        assert_eq!(bright_02.indices(4), [4, 5, 6, 4, 6, 7]);
    }
}
