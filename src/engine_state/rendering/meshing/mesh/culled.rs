//! Face-culled meshing: one quad per visible voxel face.

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, material::MaterialRegistry},
    chunk::{ChunkError, ChunkNeighbourhood},
};

use super::{face::Face, mesh::MeshBuffers};

/// Builds the geometry of the centre chunk of `neighbourhood`.
///
/// Every active voxel contributes a quad for each face not hidden by an
/// adjacent culling voxel, with per-corner ambient occlusion and the texture
/// layer its material assigns to that side.
///
/// # Errors
/// [`ChunkError::UnknownMaterial`] if a voxel's material is not registered.
pub fn culled(
    neighbourhood: &ChunkNeighbourhood<'_>,
    registry: &MaterialRegistry,
) -> Result<MeshBuffers, ChunkError> {
    let chunk = neighbourhood.centre();
    let mut buffers = MeshBuffers::default();

    for (index, block) in chunk.iter_active() {
        let material = registry
            .get(block.block_type)
            .ok_or(ChunkError::UnknownMaterial { id: block.block_type })?;
        let hidden = neighbourhood.cull_faces(index, registry);
        let centre = chunk.block_world_position(index);

        for side in BlockSide::all() {
            if hidden[side.texture_slot()] {
                continue;
            }
            let occlusion = neighbourhood.face_occlusion(centre, side);
            buffers.push_face(&Face::new(side, centre, material.texture_layer(side), occlusion));
        }
    }

    Ok(buffers)
}
