//! Read-only view of a chunk together with the chunks it links to.
//!
//! Face culling and ambient occlusion look at voxels one step outside the
//! chunk. Instead of recursing through neighbour pointers, a world position is
//! resolved to its owning chunk by hopping along neighbour links until the
//! position lands in range, then queried there directly.

use cgmath::Vector3;

use super::{Chunk, ChunkError, ChunkId, BLOCK_PITCH};
use crate::engine_state::voxels::block::{block_side::BlockSide, material::MaterialRegistry, Block};

/// Vertex brightness when any corner probe is occupied.
pub const OCCLUDED: f32 = 0.75;
/// Vertex brightness with all corner probes empty.
pub const LIT: f32 = 1.0;

/// Finds the chunk whose local range contains `pos`, starting from `start`.
///
/// Each hop follows the link towards the overflowing axis (x before z). Returns
/// `None` when a needed link is missing, the height is out of range, or `start`
/// is not in `chunks`.
pub fn resolve_owner(chunks: &[Chunk], start: ChunkId, pos: Vector3<f32>) -> Option<ChunkId> {
    let mut current = start;
    // every hop moves one chunk closer to pos
    for _ in 0..=chunks.len() {
        let chunk = chunks.get(current.0)?;
        let index = chunk.block_index(pos);
        if Chunk::contains_index(index) {
            return Some(current);
        }
        current = chunk.neighbours().toward(index)?;
    }
    None
}

/// A chunk plus read access to every chunk reachable through its links.
#[derive(Clone, Copy)]
pub struct ChunkNeighbourhood<'a> {
    chunks: &'a [Chunk],
    id: ChunkId,
}

impl<'a> ChunkNeighbourhood<'a> {
    /// Views chunk `id` inside `chunks`.
    pub fn new(chunks: &'a [Chunk], id: ChunkId) -> Result<Self, ChunkError> {
        if id.0 >= chunks.len() {
            return Err(ChunkError::UnknownChunk { id });
        }
        Ok(ChunkNeighbourhood { chunks, id })
    }

    /// The chunk at the centre of the view.
    pub fn centre(&self) -> &'a Chunk {
        &self.chunks[self.id.0]
    }

    /// Handle of the centre chunk.
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// The block a world position snaps to, looked up in whichever linked chunk owns it.
    pub fn block_at(&self, pos: Vector3<f32>) -> Option<&'a Block> {
        let owner = resolve_owner(self.chunks, self.id, pos)?;
        self.chunks[owner.0].get_block_actual(pos).ok()
    }

    /// Whether the voxel at a world position exists and is active.
    pub fn is_occupied(&self, pos: Vector3<f32>) -> bool {
        self.block_at(pos).is_some_and(|block| block.is_active())
    }

    /// Occlusion contributed by the voxel `offset` steps away from `pos`.
    ///
    /// Probes that leave the linked area count as empty.
    pub fn occlusion_value(&self, pos: Vector3<f32>, offset: [i32; 3]) -> f32 {
        if self.is_occupied(pos + step(offset)) {
            OCCLUDED
        } else {
            LIT
        }
    }

    /// Per-corner brightness of one face of the voxel centred at `centre`.
    ///
    /// For each corner, the two edge cells and the diagonal cell in front of
    /// the face are probed; the corner darkens if any of them is occupied.
    /// Values are in [`BlockSide::corners`] order.
    pub fn face_occlusion(&self, centre: Vector3<f32>, side: BlockSide) -> [f32; 4] {
        let normal = side.normal();
        let (u, v) = side.tangent_axes();
        side.corners().map(|corner| {
            let mut edge_u = normal;
            edge_u[u] = corner[u];
            let mut edge_v = normal;
            edge_v[v] = corner[v];
            let mut diagonal = edge_u;
            diagonal[v] = corner[v];

            let occupied = [edge_u, edge_v, diagonal]
                .iter()
                .any(|probe| self.occlusion_value(centre, *probe) < LIT);
            if occupied {
                OCCLUDED
            } else {
                LIT
            }
        })
    }

    /// Whether `side` of the voxel centred at `centre` is covered.
    ///
    /// A face is hidden when the adjacent voxel, in this chunk or a linked
    /// one, is active and its material culls faces.
    pub fn is_face_hidden(&self, centre: Vector3<f32>, side: BlockSide, registry: &MaterialRegistry) -> bool {
        self.block_at(centre + step(side.normal()))
            .is_some_and(|block| block.is_active() && registry.should_cull_face(block.block_type))
    }

    /// Hidden flag per face of the voxel at a local index, indexed by [`BlockSide::texture_slot`].
    ///
    /// Materials that do not cull never hide their own faces.
    pub fn cull_faces(&self, index: Vector3<i32>, registry: &MaterialRegistry) -> [bool; 6] {
        let chunk = self.centre();
        let culls = chunk
            .get_block(index)
            .is_ok_and(|block| registry.should_cull_face(block.block_type));
        if !culls {
            return [false; 6];
        }

        let centre = chunk.block_world_position(index);
        BlockSide::all().map(|side| self.is_face_hidden(centre, side, registry))
    }
}

fn step(offset: [i32; 3]) -> Vector3<f32> {
    Vector3::new(offset[0] as f32, offset[1] as f32, offset[2] as f32) * BLOCK_PITCH
}
