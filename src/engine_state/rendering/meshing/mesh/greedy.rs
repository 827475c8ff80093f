//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! faces with the same texture layer into larger quads, reducing the number of
//! vertices needed to render a chunk.
//!
//! Each side is processed slice by slice along its normal. Visible faces of a
//! slice are written into a 2D mask over the side's tangent axes, then the mask
//! is swept row by row: a run is grown to the right, then downwards while every
//! row below matches, and the covered cells are cleared. Only faces whose four
//! corners share one occlusion value are merged; the rest are emitted as-is so
//! the occlusion gradient is preserved.

use cgmath::Vector3;
use log::trace;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, material::MaterialRegistry},
    chunk::{ChunkError, ChunkNeighbourhood, CHUNK_HEIGHT, CHUNK_SIZE},
};

use super::{face::Face, mesh::MeshBuffers};

/// A mergeable face in the slice mask.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MaskCell {
    texture_layer: u32,
    occlusion: f32,
}

/// Builds merged geometry for the centre chunk of `neighbourhood`.
///
/// Culling and occlusion follow the same rules as [`culled`](super::culled::culled).
///
/// # Errors
/// [`ChunkError::UnknownMaterial`] if a voxel's material is not registered.
pub fn greedy(
    neighbourhood: &ChunkNeighbourhood<'_>,
    registry: &MaterialRegistry,
) -> Result<MeshBuffers, ChunkError> {
    let chunk = neighbourhood.centre();
    let dimensions = [CHUNK_SIZE, CHUNK_HEIGHT, CHUNK_SIZE];
    let mut buffers = MeshBuffers::default();

    for side in BlockSide::all() {
        let axis = side.axis();
        let (u, v) = side.tangent_axes();
        let (width, height) = (dimensions[u], dimensions[v]);
        let mut mask: Vec<Option<MaskCell>> = vec![None; width * height];

        for slice in 0..dimensions[axis] {
            mask.fill(None);

            for j in 0..height {
                for i in 0..width {
                    let mut coords = [0i32; 3];
                    coords[axis] = slice as i32;
                    coords[u] = i as i32;
                    coords[v] = j as i32;
                    let index = Vector3::from(coords);

                    let block = chunk.get_block(index)?;
                    if !block.is_active() {
                        continue;
                    }
                    let material = registry
                        .get(block.block_type)
                        .ok_or(ChunkError::UnknownMaterial { id: block.block_type })?;
                    let centre = chunk.block_world_position(index);
                    if material.should_cull_face && neighbourhood.is_face_hidden(centre, side, registry) {
                        continue;
                    }

                    let occlusion = neighbourhood.face_occlusion(centre, side);
                    let texture_layer = material.texture_layer(side);
                    if occlusion.iter().all(|value| *value == occlusion[0]) {
                        mask[j * width + i] = Some(MaskCell {
                            texture_layer,
                            occlusion: occlusion[0],
                        });
                    } else {
                        buffers.push_face(&Face::new(side, centre, texture_layer, occlusion));
                    }
                }
            }

            for j in 0..height {
                let mut i = 0;
                while i < width {
                    let Some(cell) = mask[j * width + i] else {
                        i += 1;
                        continue;
                    };

                    let mut run_width = 1;
                    while i + run_width < width && mask[j * width + i + run_width] == Some(cell) {
                        run_width += 1;
                    }

                    let mut run_height = 1;
                    'grow: while j + run_height < height {
                        let row = (j + run_height) * width;
                        for k in 0..run_width {
                            if mask[row + i + k] != Some(cell) {
                                break 'grow;
                            }
                        }
                        run_height += 1;
                    }

                    for dj in 0..run_height {
                        let row = (j + dj) * width;
                        mask[row + i..row + i + run_width].fill(None);
                    }

                    let mut coords = [0i32; 3];
                    coords[axis] = slice as i32;
                    coords[u] = i as i32;
                    coords[v] = j as i32;
                    let origin = chunk.block_world_position(Vector3::from(coords));
                    buffers.push_face(
                        &Face::new(side, origin, cell.texture_layer, [cell.occlusion; 4])
                            .with_size([run_width as u32, run_height as u32]),
                    );

                    i += run_width;
                }
            }
        }
    }

    trace!("Greedy mesher produced {} faces", buffers.face_count());
    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use cgmath::Vector2;

    use super::*;
    use crate::engine_state::rendering::meshing::mesh::culled::culled;
    use crate::engine_state::voxels::{
        block::block_type::BlockType,
        chunk::{Chunk, ChunkId},
    };

    fn build(chunk: Chunk) -> (MeshBuffers, MeshBuffers) {
        let registry = MaterialRegistry::builtin().unwrap();
        let chunks = vec![chunk];
        let view = ChunkNeighbourhood::new(&chunks, ChunkId(0)).unwrap();
        (greedy(&view, &registry).unwrap(), culled(&view, &registry).unwrap())
    }

    #[test]
    fn single_voxel_matches_culled_mesher() {
        let mut chunk = Chunk::new(Vector2::new(0.0, 0.0));
        chunk.place_at(Vector3::new(3, 3, 3), BlockType::STONE.id()).unwrap();
        let (greedy, culled) = build(chunk);
        assert_eq!(greedy.face_count(), 6);
        assert_eq!(culled.face_count(), 6);
    }

    #[test]
    fn flat_layer_collapses_to_six_quads() {
        let mut chunk = Chunk::new(Vector2::new(0.0, 0.0));
        for x in 0..CHUNK_SIZE as i32 {
            for z in 0..CHUNK_SIZE as i32 {
                chunk.place_at(Vector3::new(x, 0, z), BlockType::BEDROCK.id()).unwrap();
            }
        }
        let (greedy, culled) = build(chunk);
        assert_eq!(culled.face_count(), 2 * 256 + 4 * 16);
        assert_eq!(greedy.face_count(), 6);

        let top: Vec<_> = greedy.vertices.iter().filter(|v| v.normal == [0.0, 1.0, 0.0]).collect();
        assert_eq!(top.len(), 4);
        assert!(top.iter().any(|v| v.tex_coords == [16.0, 16.0]));
    }

    #[test]
    fn different_textures_are_not_merged() {
        let mut chunk = Chunk::new(Vector2::new(0.0, 0.0));
        chunk.place_at(Vector3::new(3, 3, 3), BlockType::STONE.id()).unwrap();
        chunk.place_at(Vector3::new(4, 3, 3), BlockType::DIRT.id()).unwrap();
        let (greedy, culled) = build(chunk);
        assert_eq!(culled.face_count(), 10);
        assert_eq!(greedy.face_count(), 10);
    }

    #[test]
    fn same_texture_row_merges() {
        let mut chunk = Chunk::new(Vector2::new(0.0, 0.0));
        for x in 3..6 {
            chunk.place_at(Vector3::new(x, 3, 3), BlockType::STONE.id()).unwrap();
        }
        let (greedy, culled) = build(chunk);
        assert_eq!(culled.face_count(), 14);
        // four long sides plus two end caps
        assert_eq!(greedy.face_count(), 6);
    }
}
