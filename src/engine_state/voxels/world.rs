//! # World Module
//!
//! This module provides the `World` struct which owns every chunk of a
//! generated map together with the assets shared by all of them.
//!
//! ## Architecture
//!
//! Chunks live in a flat arena indexed by [`ChunkId`]; the id of the chunk at
//! grid position `(x, z)` is `x * map_size + z`. Neighbour links are ids into
//! the same arena, so edits that cross a chunk boundary are resolved here:
//! the owning chunk is found by hopping along the links, then edited directly.
//!
//! ## Dirty tracking
//!
//! Every edit marks the owning chunk dirty, plus each neighbour sharing a face
//! with the edited voxel since its culling and occlusion depend on it. Dirty
//! chunk ids are also collected in a [`SparseSet`] so that
//! [`World::update`] only visits chunks that actually changed.

use std::sync::Arc;

use cgmath::{Vector2, Vector3, Zero};
use log::{debug, error, trace};

use crate::core::{
    common_utils::{poisson_disc_sampling_with, random_int_inclusive},
    SparseSet,
};
use crate::engine_state::rendering::{
    meshing::{mesh::Mesh, MeshSink},
    texture::TextureArray,
    Vertex,
};

use super::{
    block::{block_type::BlockType, material::MaterialRegistry, Block, BlockTypeSize},
    chunk::{resolve_owner, Chunk, ChunkError, ChunkId, ChunkNeighbourhood, BLOCK_PITCH, CHUNK_HEIGHT, CHUNK_SIZE},
    config::WorldConfig,
};

/// Half-width of the leaf canopy.
const CANOPY_SIZE: i32 = 3;
/// Empty voxels required above the ground before a tree may grow.
const TREE_CLEARANCE: i32 = 3;

/// A generated voxel world: the chunk grid and the assets it renders with.
pub struct World {
    chunks: Vec<Chunk>,
    map_size: usize,
    materials: Arc<MaterialRegistry>,
    texture: TextureArray,
    config: WorldConfig,
    dirty: SparseSet,
    rng: fastrand::Rng,
}

impl World {
    /// Wraps a chunk grid.
    ///
    /// # Arguments
    /// * `chunks` - The chunk arena, `config.map_size²` chunks in grid order
    /// * `materials` - Registry every block material must be part of
    /// * `texture` - Texture array referenced by chunk meshes
    /// * `config` - Generation parameters, also used for trees and meshing
    pub fn new(
        chunks: Vec<Chunk>,
        materials: Arc<MaterialRegistry>,
        texture: TextureArray,
        config: WorldConfig,
    ) -> Self {
        let rng = match config.tree_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let count = chunks.len();
        let mut dirty = SparseSet::new(count, count);
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.is_dirty() {
                dirty.insert(index);
            }
        }

        World {
            chunks,
            map_size: config.map_size,
            materials,
            texture,
            config,
            dirty,
            rng,
        }
    }

    /// All chunks in arena order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The chunk behind `id`, if it exists.
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id.0)
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the world has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunks per side of the grid.
    pub fn map_size(&self) -> usize {
        self.map_size
    }

    /// The shared material registry.
    pub fn materials(&self) -> &Arc<MaterialRegistry> {
        &self.materials
    }

    /// The shared block texture array.
    pub fn texture(&self) -> &TextureArray {
        &self.texture
    }

    /// The parameters the world was generated with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The chunk at grid position `(grid_x, grid_z)`.
    pub fn chunk_at(&self, grid_x: usize, grid_z: usize) -> Option<ChunkId> {
        if grid_x >= self.map_size || grid_z >= self.map_size {
            return None;
        }
        let id = ChunkId(grid_x * self.map_size + grid_z);
        (id.0 < self.chunks.len()).then_some(id)
    }

    /// The chunk whose local range contains a world position.
    pub fn chunk_containing(&self, pos: Vector3<f32>) -> Option<ChunkId> {
        let size = CHUNK_SIZE as i32;
        let half = (self.map_size * CHUNK_SIZE / 2) as i32;
        let voxel_x = (pos.x / BLOCK_PITCH).round() as i32 + half;
        let voxel_z = (pos.z / BLOCK_PITCH).round() as i32 + half;
        if voxel_x < 0 || voxel_z < 0 {
            return None;
        }

        let id = self.chunk_at((voxel_x / size) as usize, (voxel_z / size) as usize)?;
        self.chunks[id.0].check_block_is_in_chunk(pos).then_some(id)
    }

    /// The block a world position snaps to.
    pub fn block_at(&self, pos: Vector3<f32>) -> Option<&Block> {
        let id = self.chunk_containing(pos)?;
        self.chunks[id.0].get_block_actual(pos).ok()
    }

    /// Whether the voxel at a world position exists and is active.
    pub fn block_exists(&self, pos: Vector3<f32>) -> bool {
        self.block_at(pos).is_some_and(Block::is_active)
    }

    /// Read-only view of chunk `id` and the chunks it links to.
    pub fn neighbourhood(&self, id: ChunkId) -> Result<ChunkNeighbourhood<'_>, ChunkError> {
        ChunkNeighbourhood::new(&self.chunks, id)
    }

    /// Ids of chunks edited since the last [`World::update`].
    pub fn dirty_chunks(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.dirty.iter().map(ChunkId)
    }

    fn check_id(&self, id: ChunkId) -> Result<(), ChunkError> {
        if id.0 < self.chunks.len() {
            Ok(())
        } else {
            Err(ChunkError::UnknownChunk { id })
        }
    }

    fn check_material(&self, block_type: BlockTypeSize) -> Result<(), ChunkError> {
        match self.materials.get(block_type) {
            Some(_) => Ok(()),
            None => Err(ChunkError::UnknownMaterial { id: block_type }),
        }
    }

    fn mark_dirty(&mut self, id: ChunkId) {
        self.chunks[id.0].mark_dirty();
        self.dirty.insert(id.0);
    }

    /// Marks `owner` and every neighbour sharing a face with `index` dirty.
    fn mark_edit(&mut self, owner: ChunkId, index: Vector3<i32>) {
        self.mark_dirty(owner);
        let touching: Vec<ChunkId> = self.chunks[owner.0]
            .neighbours()
            .touching(index.x as usize, index.z as usize)
            .collect();
        for neighbour in touching {
            self.mark_dirty(neighbour);
        }
    }

    /// Activates the voxel at a world position, starting the lookup at chunk `id`.
    ///
    /// Positions outside chunk `id` are forwarded along its neighbour links.
    ///
    /// # Returns
    /// `Ok(false)` if the voxel is already active or no linked chunk owns the position.
    ///
    /// # Errors
    /// [`ChunkError::UnknownMaterial`] for an unregistered material and
    /// [`ChunkError::UnknownChunk`] for an invalid `id`.
    pub fn add_block(&mut self, id: ChunkId, pos: Vector3<f32>, block_type: BlockTypeSize) -> Result<bool, ChunkError> {
        self.check_id(id)?;
        self.check_material(block_type)?;
        self.place(id, pos, block_type)
    }

    fn place(&mut self, id: ChunkId, pos: Vector3<f32>, block_type: BlockTypeSize) -> Result<bool, ChunkError> {
        let Some(owner) = resolve_owner(&self.chunks, id, pos) else {
            trace!("No chunk linked from {id} owns {pos:?}");
            return Ok(false);
        };
        let index = self.chunks[owner.0].block_index(pos);
        let placed = self.chunks[owner.0].place_at(index, block_type)?;
        if placed {
            self.mark_edit(owner, index);
        }
        Ok(placed)
    }

    /// Batch form of [`World::add_block`].
    ///
    /// Every pair is attempted independently.
    ///
    /// # Returns
    /// `Ok(true)` if at least one voxel was placed.
    ///
    /// # Errors
    /// [`ChunkError::BatchSizeMismatch`] if the slices differ in length, or any
    /// error of [`World::add_block`]. Nothing is placed when an error is returned.
    pub fn add_blocks(
        &mut self,
        id: ChunkId,
        positions: &[Vector3<f32>],
        block_types: &[BlockTypeSize],
    ) -> Result<bool, ChunkError> {
        if positions.len() != block_types.len() {
            return Err(ChunkError::BatchSizeMismatch {
                positions: positions.len(),
                ids: block_types.len(),
            });
        }
        self.check_id(id)?;
        for &block_type in block_types {
            self.check_material(block_type)?;
        }

        let mut placed_any = false;
        for (&pos, &block_type) in positions.iter().zip(block_types) {
            placed_any |= self.place(id, pos, block_type)?;
        }
        Ok(placed_any)
    }

    /// Deactivates the voxel at a world position, starting the lookup at chunk `id`.
    ///
    /// # Returns
    /// `Ok(false)` if there is no active voxel at the position.
    pub fn remove_block(&mut self, id: ChunkId, pos: Vector3<f32>) -> Result<bool, ChunkError> {
        self.check_id(id)?;
        let Some(owner) = resolve_owner(&self.chunks, id, pos) else {
            return Ok(false);
        };
        let index = self.chunks[owner.0].block_index(pos);
        let removed = self.chunks[owner.0].clear_at(index)?;
        if removed {
            self.mark_edit(owner, index);
        }
        Ok(removed)
    }

    /// Batch form of [`World::remove_block`].
    ///
    /// # Returns
    /// `Ok(true)` if at least one voxel was removed.
    pub fn remove_blocks(&mut self, id: ChunkId, positions: &[Vector3<f32>]) -> Result<bool, ChunkError> {
        let mut removed_any = false;
        for &pos in positions {
            removed_any |= self.remove_block(id, pos)?;
        }
        Ok(removed_any)
    }

    /// Where a block placed against the voxel hit at `hit` goes.
    ///
    /// # Returns
    /// The owning chunk and the offset from the hit voxel's centre to the
    /// adjacent voxel, or `None` if nothing is at `hit`.
    fn placement_target(&self, id: ChunkId, hit: Vector3<f32>) -> Option<(ChunkId, Vector3<f32>, Vector3<f32>)> {
        let owner = resolve_owner(&self.chunks, id, hit)?;
        let query = self.chunks[owner.0].check_block_exists(hit);
        if !query.exists {
            return None;
        }
        Some((owner, query.block_pos, placement_offset(hit - query.block_pos)))
    }

    /// Places a block next to the voxel containing `hit`, on the side the hit
    /// point is closest to.
    ///
    /// # Returns
    /// `Ok(false)` if there is no voxel at `hit` or the adjacent slot is taken.
    pub fn try_add_block(&mut self, id: ChunkId, hit: Vector3<f32>, block_type: BlockTypeSize) -> Result<bool, ChunkError> {
        self.check_id(id)?;
        match self.placement_target(id, hit) {
            Some((owner, centre, offset)) => self.add_block(owner, centre + offset, block_type),
            None => Ok(false),
        }
    }

    /// Shifts a batch by the offset [`World::try_add_block`] would use for
    /// `hit` and places it.
    pub fn try_add_blocks(
        &mut self,
        id: ChunkId,
        hit: Vector3<f32>,
        positions: &[Vector3<f32>],
        block_types: &[BlockTypeSize],
    ) -> Result<bool, ChunkError> {
        self.check_id(id)?;
        match self.placement_target(id, hit) {
            Some((owner, _, offset)) => {
                let shifted: Vec<Vector3<f32>> = positions.iter().map(|&pos| pos + offset).collect();
                self.add_blocks(owner, &shifted, block_types)
            }
            None => Ok(false),
        }
    }

    /// Plants the environment of chunk `id`: grass on exposed dirt, then trees.
    ///
    /// The chunk itself ends clean; neighbours that received leaves stay dirty.
    pub fn init_environment(&mut self, id: ChunkId) -> Result<(), ChunkError> {
        self.check_id(id)?;
        let grass = self.chunks[id.0].grow_grass(&self.config);
        let trees = self.spawn_trees(id)?;
        debug!("Environment of {id}: {grass} grass blocks, {trees} trees");

        self.chunks[id.0].clear_dirty();
        self.dirty.delete(id.0);
        Ok(())
    }

    /// Scatters trees over chunk `id` with Poisson-disc sampling.
    ///
    /// For every sample column, the first voxel from the surface height up to
    /// the maximum height that is active and has three empty voxels above it
    /// roots a tree.
    ///
    /// # Returns
    /// The number of trees grown.
    pub fn spawn_trees(&mut self, id: ChunkId) -> Result<usize, ChunkError> {
        self.check_id(id)?;
        let extent = (CHUNK_SIZE - 1) as f32;
        let points = poisson_disc_sampling_with(
            &mut self.rng,
            self.config.tree_spacing,
            Vector2::new(extent, extent),
            self.config.tree_sample_attempts,
        );

        let top = self.config.max_height.min(CHUNK_HEIGHT - TREE_CLEARANCE as usize - 1) as i32;
        let mut grown = 0;
        for point in points {
            let (x, z) = (point.x.round() as i32, point.y.round() as i32);
            let chunk = &self.chunks[id.0];
            let root = (self.config.surface_height as i32..top).find(|&y| {
                chunk.check_block_exists_at(Vector3::new(x, y, z))
                    && (1..=TREE_CLEARANCE).all(|dy| !chunk.check_block_exists_at(Vector3::new(x, y + dy, z)))
            });

            if let Some(y) = root {
                let base = chunk.block_world_position(Vector3::new(x, y + 1, z));
                let (min, max) = (self.config.tree_min_height, self.config.tree_max_height);
                if self.create_tree(id, base, min, max)? {
                    grown += 1;
                }
            }
        }
        Ok(grown)
    }

    /// Grows a tree whose trunk starts at `pos`.
    ///
    /// The trunk is a column of random height in `min_height..=max_height`.
    /// The canopy is four leaf layers starting one below the trunk top: squares
    /// of half-width 3 with their corners trimmed, narrowing by one per layer
    /// above the trunk. Leaves outside the chunk are forwarded to its neighbours.
    ///
    /// # Returns
    /// `Ok(true)` if at least one block was placed.
    pub fn create_tree(&mut self, id: ChunkId, pos: Vector3<f32>, min_height: i32, max_height: i32) -> Result<bool, ChunkError> {
        let trunk_height = random_int_inclusive(&mut self.rng, min_height, max_height);
        let mut positions = Vec::new();
        let mut block_types = Vec::new();

        let base_y = pos.y.round() as i32;
        for i in 0..trunk_height {
            if base_y + i >= CHUNK_HEIGHT as i32 {
                continue;
            }
            positions.push(pos + Vector3::new(0.0, i as f32 * BLOCK_PITCH, 0.0));
            block_types.push(BlockType::DARK_OAK_LOG.id());
        }

        let mut trim = CANOPY_SIZE;
        for y in trunk_height - 1..=trunk_height + 2 {
            for x in -CANOPY_SIZE..=CANOPY_SIZE {
                for z in -CANOPY_SIZE..=CANOPY_SIZE {
                    let (x_abs, z_abs) = (x.abs(), z.abs());
                    if y >= trunk_height && (x_abs > trim || z_abs > trim) {
                        continue;
                    }
                    // round off the outer ring
                    if x != 0 && z != 0 && (x_abs == trim || z_abs == trim) && x_abs == z_abs {
                        continue;
                    }
                    positions.push(pos + Vector3::new(x as f32, y as f32, z as f32) * BLOCK_PITCH);
                    block_types.push(BlockType::DARK_OAK_LEAVES.id());
                }
            }
            if y >= trunk_height {
                trim -= 1;
            }
        }

        self.add_blocks(id, &positions, &block_types)
    }

    fn build_buffers(&self, id: ChunkId) -> Result<(Vec<Vertex>, Vec<u32>), ChunkError> {
        let neighbourhood = self.neighbourhood(id)?;
        Ok(self.config.meshing.build(&neighbourhood, &self.materials)?.into())
    }

    /// Builds the first mesh of chunk `id`.
    ///
    /// # Errors
    /// [`ChunkError::MeshAlreadyCreated`] if the chunk already has a mesh.
    pub fn create_mesh(&mut self, id: ChunkId) -> Result<(), ChunkError> {
        self.check_id(id)?;
        if self.chunks[id.0].mesh().is_some() {
            return Err(ChunkError::MeshAlreadyCreated);
        }
        let (vertices, indices) = self.build_buffers(id)?;
        self.chunks[id.0].create_mesh(Mesh::new(vertices, indices, vec![self.texture.handle()]))?;
        self.dirty.delete(id.0);
        Ok(())
    }

    /// Builds the first mesh of every chunk.
    ///
    /// A chunk that fails is logged and skipped so the rest of the world still renders.
    ///
    /// # Returns
    /// The number of meshes built.
    pub fn create_meshes(&mut self) -> usize {
        let mut built = 0;
        for index in 0..self.chunks.len() {
            match self.create_mesh(ChunkId(index)) {
                Ok(()) => built += 1,
                Err(e) => error!("Failed to build mesh of {}: {e}", ChunkId(index)),
            }
        }
        built
    }

    /// Rebuilds the existing mesh of chunk `id` from its current voxels.
    ///
    /// # Errors
    /// [`ChunkError::MeshNotCreated`] if the chunk has no mesh yet.
    pub fn update_mesh(&mut self, id: ChunkId) -> Result<(), ChunkError> {
        self.check_id(id)?;
        if self.chunks[id.0].mesh().is_none() {
            return Err(ChunkError::MeshNotCreated);
        }
        let (vertices, indices) = self.build_buffers(id)?;
        self.chunks[id.0].update_mesh(vertices, indices)?;
        self.dirty.delete(id.0);
        Ok(())
    }

    /// Per-frame update: rebuilds dirty meshes and uploads changed ones.
    ///
    /// Chunks without a mesh get their first one. A chunk whose rebuild fails
    /// is logged and keeps its previous geometry.
    ///
    /// # Returns
    /// The number of meshes rebuilt.
    pub fn update(&mut self, sink: &mut dyn MeshSink) -> usize {
        let pending: Vec<ChunkId> = self.dirty.iter().map(ChunkId).collect();
        let mut rebuilt = 0;

        for id in pending {
            if !self.chunks[id.0].is_dirty() {
                self.dirty.delete(id.0);
                continue;
            }
            let result = if self.chunks[id.0].mesh().is_some() {
                self.update_mesh(id)
            } else {
                self.create_mesh(id)
            };
            match result {
                Ok(()) => rebuilt += 1,
                Err(e) => error!("Failed to rebuild mesh of {id}: {e}"),
            }
        }

        for (index, chunk) in self.chunks.iter_mut().enumerate() {
            if let Some(mesh) = chunk.mesh_mut() {
                if !mesh.is_uploaded() {
                    sink.upload(ChunkId(index), mesh);
                    mesh.mark_uploaded();
                }
            }
        }

        if rebuilt > 0 {
            debug!("Rebuilt {rebuilt} chunk meshes");
        }
        rebuilt
    }

    /// Draws every non-empty chunk mesh.
    pub fn draw(&self, sink: &mut dyn MeshSink) {
        for (index, chunk) in self.chunks.iter().enumerate() {
            if let Some(mesh) = chunk.mesh().filter(|mesh| !mesh.is_empty()) {
                sink.draw(ChunkId(index), mesh);
            }
        }
    }
}

/// One voxel step along the dominant axis of `diff`, ties favouring x then y.
fn placement_offset(diff: Vector3<f32>) -> Vector3<f32> {
    if diff.is_zero() {
        return Vector3::zero();
    }
    let (x, y, z) = (diff.x.abs(), diff.y.abs(), diff.z.abs());
    if x >= y && x >= z {
        Vector3::new(diff.x.signum() * BLOCK_PITCH, 0.0, 0.0)
    } else if y >= z {
        Vector3::new(0.0, diff.y.signum() * BLOCK_PITCH, 0.0)
    } else {
        Vector3::new(0.0, 0.0, diff.z.signum() * BLOCK_PITCH)
    }
}
