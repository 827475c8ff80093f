//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x48x16 column of voxels with
//! links to its four planar neighbours, its mesh and a dirty flag.
//!
//! ## Coordinates
//!
//! Blocks are stored in a flat array addressed by `x * SIZE * HEIGHT + y * SIZE + z`.
//! A chunk sits at a 2D offset measured in voxels; a world position maps to a
//! local index by `round(world - offset * BLOCK_SIZE * 2)` on x/z and
//! `round(world.y)` on y. Out-of-range local indices are rejected, never wrapped.
//!
//! ## Ownership
//!
//! A chunk owns its blocks and its mesh. Neighbours are referenced by
//! [`ChunkId`], an index into the world's chunk arena, so a chunk never owns
//! another chunk. Operations that read or write across the boundary live on
//! [`World`](super::world::World) and on [`ChunkNeighbourhood`].

use std::fmt;

use cgmath::{Vector2, Vector3};

use super::block::{block_type::BlockType, Block, BlockTypeSize};
use super::config::WorldConfig;
use crate::engine_state::rendering::{meshing::mesh::Mesh, Vertex};

pub mod chunk_iteration;
mod neighbourhood;

pub use neighbourhood::{resolve_owner, ChunkNeighbourhood};

/// Width and depth of a chunk in blocks.
pub const CHUNK_SIZE: usize = 16;
/// Height of a chunk in blocks.
pub const CHUNK_HEIGHT: usize = 48;
/// Number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_HEIGHT;
/// Half the edge length of a voxel in world units.
pub const BLOCK_SIZE: f32 = 0.5;
/// Distance between neighbouring voxel centres in world units.
pub const BLOCK_PITCH: f32 = BLOCK_SIZE * 2.0;

/// Handle to a chunk inside the world's chunk arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub usize);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk #{}", self.0)
    }
}

/// Failure of a chunk or world operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkError {
    /// A local index lies outside the chunk.
    OutOfBounds { x: i32, y: i32, z: i32 },
    /// A terrain noise slice has the wrong length.
    NoiseSizeMismatch { expected: usize, actual: usize },
    /// A neighbour list does not hold exactly four links.
    NeighbourCountMismatch { expected: usize, actual: usize },
    /// The chunk already has a mesh.
    MeshAlreadyCreated,
    /// The chunk has no mesh to update.
    MeshNotCreated,
    /// The material id is not in the registry.
    UnknownMaterial { id: BlockTypeSize },
    /// Positions and material ids of a batch differ in length.
    BatchSizeMismatch { positions: usize, ids: usize },
    /// No chunk with this id exists.
    UnknownChunk { id: ChunkId },
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::OutOfBounds { x, y, z } => {
                write!(f, "local index ({x}, {y}, {z}) is outside the chunk")
            }
            ChunkError::NoiseSizeMismatch { expected, actual } => {
                write!(f, "noise slice holds {actual} values, expected {expected}")
            }
            ChunkError::NeighbourCountMismatch { expected, actual } => {
                write!(f, "got {actual} neighbour links, expected {expected}")
            }
            ChunkError::MeshAlreadyCreated => write!(f, "chunk mesh was already created"),
            ChunkError::MeshNotCreated => write!(f, "chunk mesh has not been created yet"),
            ChunkError::UnknownMaterial { id } => write!(f, "material id {id} is not registered"),
            ChunkError::BatchSizeMismatch { positions, ids } => {
                write!(f, "batch has {positions} positions but {ids} material ids")
            }
            ChunkError::UnknownChunk { id } => write!(f, "{id} does not exist"),
        }
    }
}

impl std::error::Error for ChunkError {}

/// The four planar neighbour links of a chunk. Missing links sit at the map edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Neighbours {
    /// Neighbour towards +z.
    pub front: Option<ChunkId>,
    /// Neighbour towards -z.
    pub back: Option<ChunkId>,
    /// Neighbour towards -x.
    pub left: Option<ChunkId>,
    /// Neighbour towards +x.
    pub right: Option<ChunkId>,
}

impl Neighbours {
    /// Number of links a chunk carries.
    pub const COUNT: usize = 4;

    /// Builds the links from a `[front, back, left, right]` slice.
    pub fn from_slice(links: &[Option<ChunkId>]) -> Result<Self, ChunkError> {
        match *links {
            [front, back, left, right] => Ok(Neighbours { front, back, left, right }),
            _ => Err(ChunkError::NeighbourCountMismatch {
                expected: Self::COUNT,
                actual: links.len(),
            }),
        }
    }

    /// The links as `[front, back, left, right]`.
    pub fn as_array(&self) -> [Option<ChunkId>; 4] {
        [self.front, self.back, self.left, self.right]
    }

    /// The neighbour to hop to for a local index that left the chunk.
    ///
    /// Overflow on x is resolved before overflow on z. An axis whose link is
    /// missing is skipped in favour of the next one.
    pub fn toward(&self, index: Vector3<i32>) -> Option<ChunkId> {
        let size = CHUNK_SIZE as i32;
        if index.x < 0 && self.left.is_some() {
            self.left
        } else if index.x >= size && self.right.is_some() {
            self.right
        } else if index.z < 0 && self.back.is_some() {
            self.back
        } else if index.z >= size && self.front.is_some() {
            self.front
        } else {
            None
        }
    }

    /// Neighbours sharing a face with the voxel column at local `(x, z)`.
    pub fn touching(&self, x: usize, z: usize) -> impl Iterator<Item = ChunkId> {
        let last = CHUNK_SIZE - 1;
        [
            if x == 0 { self.left } else { None },
            if x == last { self.right } else { None },
            if z == 0 { self.back } else { None },
            if z == last { self.front } else { None },
        ]
        .into_iter()
        .flatten()
    }
}

/// Result of [`Chunk::check_block_exists`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockQuery {
    /// The position resolves inside this chunk and the voxel there is active.
    pub exists: bool,
    /// World-space centre of the voxel the position snaps to.
    pub block_pos: Vector3<f32>,
    /// The position resolves outside this chunk.
    pub out_of_bounds: bool,
}

/// A 16x48x16 column of voxel blocks.
#[derive(Debug, Clone)]
pub struct Chunk {
    blocks: Vec<Block>,
    offset: Vector2<f32>,
    neighbours: Neighbours,
    mesh: Option<Mesh>,
    dirty: bool,
}

impl Default for Chunk {
    fn default() -> Self {
        Chunk::new(Vector2::new(0.0, 0.0))
    }
}

impl Chunk {
    /// Creates an empty chunk (all air, no neighbours, no mesh) at `offset`.
    pub fn new(offset: Vector2<f32>) -> Self {
        Chunk {
            blocks: vec![Block::air(); CHUNK_VOLUME],
            offset,
            neighbours: Neighbours::default(),
            mesh: None,
            dirty: false,
        }
    }

    /// Flat block array index of a local position. Callers check bounds first.
    #[inline]
    pub fn flat_index(x: usize, y: usize, z: usize) -> usize {
        x * CHUNK_SIZE * CHUNK_HEIGHT + y * CHUNK_SIZE + z
    }

    /// Index of a local position inside a chunk's noise slice.
    #[inline]
    pub fn noise_index(x: usize, y: usize, z: usize) -> usize {
        x * CHUNK_SIZE * CHUNK_HEIGHT + z * CHUNK_HEIGHT + y
    }

    /// Whether a local index lies inside the chunk.
    #[inline]
    pub fn contains_index(index: Vector3<i32>) -> bool {
        (0..CHUNK_SIZE as i32).contains(&index.x)
            && (0..CHUNK_HEIGHT as i32).contains(&index.y)
            && (0..CHUNK_SIZE as i32).contains(&index.z)
    }

    /// Converts a world position to this chunk's local index (possibly out of range).
    pub fn block_index(&self, pos: Vector3<f32>) -> Vector3<i32> {
        Vector3::new(
            (pos.x - self.offset.x * BLOCK_PITCH).round() as i32,
            pos.y.round() as i32,
            (pos.z - self.offset.y * BLOCK_PITCH).round() as i32,
        )
    }

    /// World-space centre of the voxel at a local index.
    pub fn block_world_position(&self, index: Vector3<i32>) -> Vector3<f32> {
        Vector3::new(
            (index.x as f32 + self.offset.x) * BLOCK_PITCH,
            index.y as f32 * BLOCK_PITCH,
            (index.z as f32 + self.offset.y) * BLOCK_PITCH,
        )
    }

    /// Whether a world position resolves to a local index inside this chunk.
    pub fn check_block_is_in_chunk(&self, pos: Vector3<f32>) -> bool {
        Self::contains_index(self.block_index(pos))
    }

    /// Queries the voxel a world position snaps to.
    pub fn check_block_exists(&self, pos: Vector3<f32>) -> BlockQuery {
        let index = self.block_index(pos);
        let block_pos = self.block_world_position(index);
        if !Self::contains_index(index) {
            return BlockQuery {
                exists: false,
                block_pos,
                out_of_bounds: true,
            };
        }

        let block = &self.blocks[Self::flat_index(index.x as usize, index.y as usize, index.z as usize)];
        BlockQuery {
            exists: block.is_active(),
            block_pos,
            out_of_bounds: false,
        }
    }

    /// Whether the voxel at a world position is inside this chunk and active.
    pub fn block_exists(&self, pos: Vector3<f32>) -> bool {
        self.check_block_exists(pos).exists
    }

    /// Whether the voxel at a local index is inside this chunk and active.
    pub fn check_block_exists_at(&self, index: Vector3<i32>) -> bool {
        Self::contains_index(index)
            && self.blocks[Self::flat_index(index.x as usize, index.y as usize, index.z as usize)]
                .is_active()
    }

    /// The block at a local index.
    pub fn get_block(&self, index: Vector3<i32>) -> Result<&Block, ChunkError> {
        if !Self::contains_index(index) {
            return Err(ChunkError::OutOfBounds { x: index.x, y: index.y, z: index.z });
        }
        Ok(&self.blocks[Self::flat_index(index.x as usize, index.y as usize, index.z as usize)])
    }

    /// Mutable access to the block at a local index.
    pub fn get_block_mut(&mut self, index: Vector3<i32>) -> Result<&mut Block, ChunkError> {
        if !Self::contains_index(index) {
            return Err(ChunkError::OutOfBounds { x: index.x, y: index.y, z: index.z });
        }
        Ok(&mut self.blocks[Self::flat_index(index.x as usize, index.y as usize, index.z as usize)])
    }

    /// The block a world position snaps to.
    pub fn get_block_actual(&self, pos: Vector3<f32>) -> Result<&Block, ChunkError> {
        self.get_block(self.block_index(pos))
    }

    /// Activates the voxel at an in-range local index with `block_type`.
    ///
    /// # Returns
    /// `false` if the voxel was already active.
    pub(crate) fn place_at(&mut self, index: Vector3<i32>, block_type: BlockTypeSize) -> Result<bool, ChunkError> {
        let block = self.get_block_mut(index)?;
        if block.is_active() {
            return Ok(false);
        }
        *block = Block::new(block_type, true);
        self.dirty = true;
        Ok(true)
    }

    /// Deactivates the voxel at an in-range local index.
    ///
    /// # Returns
    /// `false` if the voxel was already inactive.
    pub(crate) fn clear_at(&mut self, index: Vector3<i32>) -> Result<bool, ChunkError> {
        let block = self.get_block_mut(index)?;
        if !block.is_active() {
            return Ok(false);
        }
        *block = Block::air();
        self.dirty = true;
        Ok(true)
    }

    /// Carves the voxel grid from a noise slice and records the neighbour links.
    ///
    /// Voxels below `config.min_height` are always solid. Above it, 3D density
    /// noise is solid where it exceeds `config.acceptable_noise_3d`, and
    /// heightmap noise is solid where it is nonzero (the generator writes
    /// nonzero values exactly below each column's surface). Materials follow
    /// fixed height bands, see [`Chunk::terrain_material`].
    ///
    /// # Arguments
    /// * `offset` - Chunk offset in voxels
    /// * `noise` - `CHUNK_VOLUME` values laid out by [`Chunk::noise_index`]
    /// * `neighbours` - `[front, back, left, right]` links
    /// * `config` - Height bands and noise mode
    pub fn init_terrain(
        &mut self,
        offset: Vector2<f32>,
        noise: &[f32],
        neighbours: &[Option<ChunkId>],
        config: &WorldConfig,
    ) -> Result<(), ChunkError> {
        if noise.len() != CHUNK_VOLUME {
            return Err(ChunkError::NoiseSizeMismatch {
                expected: CHUNK_VOLUME,
                actual: noise.len(),
            });
        }
        self.neighbours = Neighbours::from_slice(neighbours)?;
        self.offset = offset;

        for x in 0..CHUNK_SIZE {
            for y in 0..CHUNK_HEIGHT {
                for z in 0..CHUNK_SIZE {
                    let sample = noise[Self::noise_index(x, y, z)];
                    let solid = y < config.min_height
                        || if config.noise_3d {
                            sample > config.acceptable_noise_3d
                        } else {
                            sample != 0.0
                        };

                    self.blocks[Self::flat_index(x, y, z)] = if solid {
                        Block::new(Self::terrain_material(y, config).id(), true)
                    } else {
                        Block::air()
                    };
                }
            }
        }

        self.dirty = true;
        Ok(())
    }

    /// Material of a solid terrain voxel at height `y`.
    pub fn terrain_material(y: usize, config: &WorldConfig) -> BlockType {
        if y <= config.min_height {
            BlockType::BEDROCK
        } else if y <= config.stone_height {
            BlockType::STONE
        } else if y <= config.surface_height {
            BlockType::SANDSTONE
        } else {
            BlockType::DIRT
        }
    }

    /// Turns exposed dirt in the upper band into grass.
    ///
    /// A dirt voxel at or above `config.surface_height` is exposed when it sits
    /// in the top layer or the voxel above it is inactive.
    ///
    /// # Returns
    /// The number of converted voxels.
    pub fn grow_grass(&mut self, config: &WorldConfig) -> usize {
        let mut converted = 0;
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in config.surface_height..CHUNK_HEIGHT {
                    let exposed = y + 1 == CHUNK_HEIGHT
                        || !self.blocks[Self::flat_index(x, y + 1, z)].is_active();
                    let block = &mut self.blocks[Self::flat_index(x, y, z)];
                    if block.is_active() && block.block_type == BlockType::DIRT.id() && exposed {
                        block.block_type = BlockType::GRASS.id();
                        converted += 1;
                    }
                }
            }
        }

        if converted > 0 {
            self.dirty = true;
        }
        converted
    }

    /// All blocks in flat array order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of active voxels.
    pub fn active_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_active()).count()
    }

    /// Chunk offset in voxels.
    pub fn offset(&self) -> Vector2<f32> {
        self.offset
    }

    /// Neighbour links.
    pub fn neighbours(&self) -> &Neighbours {
        &self.neighbours
    }

    /// Replaces the neighbour links.
    pub fn set_neighbours(&mut self, neighbours: Neighbours) {
        self.neighbours = neighbours;
    }

    /// Whether the mesh is out of date.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the mesh as out of date.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the dirty flag without rebuilding.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// The chunk mesh, once created.
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub(crate) fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        self.mesh.as_mut()
    }

    /// Installs the first mesh of this chunk.
    ///
    /// Fails with [`ChunkError::MeshAlreadyCreated`] if a mesh exists; later
    /// changes go through [`Chunk::update_mesh`].
    pub fn create_mesh(&mut self, mesh: Mesh) -> Result<(), ChunkError> {
        if self.mesh.is_some() {
            return Err(ChunkError::MeshAlreadyCreated);
        }
        self.mesh = Some(mesh);
        self.dirty = false;
        Ok(())
    }

    /// Rebuilds the existing mesh in place and clears the dirty flag.
    pub fn update_mesh(&mut self, vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<(), ChunkError> {
        let mesh = self.mesh.as_mut().ok_or(ChunkError::MeshNotCreated)?;
        mesh.rebuild(vertices, indices);
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heightmap_noise(height: usize) -> Vec<f32> {
        let mut noise = vec![0.0; CHUNK_VOLUME];
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in 0..height {
                    noise[Chunk::noise_index(x, y, z)] = 0.3;
                }
            }
        }
        noise
    }

    #[test]
    fn new_chunk_is_empty() {
        let chunk = Chunk::default();
        assert_eq!(chunk.blocks().len(), CHUNK_VOLUME);
        assert_eq!(chunk.active_count(), 0);
        assert!(!chunk.is_dirty());
        assert!(chunk.mesh().is_none());
    }

    #[test]
    fn world_positions_map_through_the_offset() {
        let chunk = Chunk::new(Vector2::new(16.0, -32.0));
        assert_eq!(chunk.block_index(Vector3::new(16.0, 3.0, -32.0)), Vector3::new(0, 3, 0));
        assert_eq!(chunk.block_index(Vector3::new(31.4, 0.6, -16.6)), Vector3::new(15, 1, 15));
        assert_eq!(
            chunk.block_world_position(Vector3::new(2, 5, 7)),
            Vector3::new(18.0, 5.0, -25.0)
        );
        assert!(chunk.check_block_is_in_chunk(Vector3::new(20.0, 47.0, -20.0)));
        assert!(!chunk.check_block_is_in_chunk(Vector3::new(32.0, 0.0, -20.0)));
        assert!(!chunk.check_block_is_in_chunk(Vector3::new(20.0, 48.0, -20.0)));
    }

    #[test]
    fn get_block_actual_rejects_out_of_range_positions() {
        let chunk = Chunk::default();
        for pos in [
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(16.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 48.0, 0.0),
            Vector3::new(0.0, 0.0, 16.0),
        ] {
            assert!(matches!(chunk.get_block_actual(pos), Err(ChunkError::OutOfBounds { .. })));
        }
        assert!(chunk.get_block_actual(Vector3::new(15.0, 47.0, 15.0)).is_ok());
    }

    #[test]
    fn check_block_exists_reports_bounds_and_snapped_centre() {
        let mut chunk = Chunk::default();
        assert!(chunk.place_at(Vector3::new(3, 4, 5), BlockType::STONE.id()).unwrap());

        let query = chunk.check_block_exists(Vector3::new(3.2, 3.9, 4.7));
        assert!(query.exists);
        assert!(!query.out_of_bounds);
        assert_eq!(query.block_pos, Vector3::new(3.0, 4.0, 5.0));

        let outside = chunk.check_block_exists(Vector3::new(-2.0, 4.0, 5.0));
        assert!(!outside.exists);
        assert!(outside.out_of_bounds);
    }

    #[test]
    fn place_and_clear_report_occupancy() {
        let mut chunk = Chunk::default();
        let index = Vector3::new(1, 1, 1);
        assert!(chunk.place_at(index, BlockType::DIRT.id()).unwrap());
        assert!(chunk.is_dirty());
        assert!(!chunk.place_at(index, BlockType::STONE.id()).unwrap());
        assert_eq!(chunk.get_block(index).unwrap().block_type, BlockType::DIRT.id());

        chunk.clear_dirty();
        assert!(chunk.clear_at(index).unwrap());
        assert!(chunk.is_dirty());
        assert!(!chunk.clear_at(index).unwrap());
        assert!(chunk.place_at(Vector3::new(0, 48, 0), 1).is_err());
    }

    #[test]
    fn init_terrain_rejects_bad_inputs() {
        let config = WorldConfig::default();
        let mut chunk = Chunk::default();
        let offset = Vector2::new(0.0, 0.0);

        assert_eq!(
            chunk.init_terrain(offset, &[0.0; 10], &[None; 4], &config),
            Err(ChunkError::NoiseSizeMismatch { expected: CHUNK_VOLUME, actual: 10 })
        );
        assert_eq!(
            chunk.init_terrain(offset, &vec![0.0; CHUNK_VOLUME], &[None; 3], &config),
            Err(ChunkError::NeighbourCountMismatch { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn heightmap_terrain_fills_columns_with_banded_materials() {
        let config = WorldConfig::default();
        let mut chunk = Chunk::default();
        let links = [Some(ChunkId(1)), None, None, Some(ChunkId(4))];
        chunk
            .init_terrain(Vector2::new(-8.0, 8.0), &heightmap_noise(12), &links, &config)
            .unwrap();

        assert!(chunk.is_dirty());
        assert_eq!(chunk.offset(), Vector2::new(-8.0, 8.0));
        assert_eq!(chunk.neighbours().front, Some(ChunkId(1)));
        assert_eq!(chunk.neighbours().right, Some(ChunkId(4)));
        assert_eq!(chunk.active_count(), CHUNK_SIZE * CHUNK_SIZE * 12);

        let material = |y: i32| chunk.get_block(Vector3::new(4, y, 9)).unwrap().get_block_type();
        assert_eq!(material(0), Some(BlockType::BEDROCK));
        assert_eq!(material(2), Some(BlockType::BEDROCK));
        assert_eq!(material(5), Some(BlockType::STONE));
        assert_eq!(material(10), Some(BlockType::SANDSTONE));
        assert_eq!(material(11), Some(BlockType::DIRT));
        assert!(!chunk.get_block(Vector3::new(4, 12, 9)).unwrap().is_active());
    }

    #[test]
    fn floor_is_solid_even_without_noise() {
        let config = WorldConfig::default();
        let mut chunk = Chunk::default();
        chunk
            .init_terrain(Vector2::new(0.0, 0.0), &vec![0.0; CHUNK_VOLUME], &[None; 4], &config)
            .unwrap();
        assert_eq!(chunk.active_count(), CHUNK_SIZE * CHUNK_SIZE * config.min_height);
    }

    #[test]
    fn density_terrain_uses_the_acceptance_threshold() {
        let config = WorldConfig { noise_3d: true, ..WorldConfig::default() };
        let mut noise = vec![-0.2; CHUNK_VOLUME];
        noise[Chunk::noise_index(2, 20, 3)] = 0.4;
        noise[Chunk::noise_index(2, 21, 3)] = 0.0;

        let mut chunk = Chunk::default();
        chunk.init_terrain(Vector2::new(0.0, 0.0), &noise, &[None; 4], &config).unwrap();
        assert!(chunk.check_block_exists_at(Vector3::new(2, 20, 3)));
        assert!(!chunk.check_block_exists_at(Vector3::new(2, 21, 3)));
        assert_eq!(chunk.active_count(), CHUNK_SIZE * CHUNK_SIZE * config.min_height + 1);
    }

    #[test]
    fn init_terrain_is_deterministic() {
        let config = WorldConfig::default();
        let mut rng = fastrand::Rng::with_seed(11);
        let noise: Vec<f32> = (0..CHUNK_VOLUME)
            .map(|_| if rng.bool() { rng.f32() } else { 0.0 })
            .collect();
        let links = [None, Some(ChunkId(0)), Some(ChunkId(2)), None];

        let mut a = Chunk::default();
        let mut b = Chunk::default();
        a.init_terrain(Vector2::new(16.0, 0.0), &noise, &links, &config).unwrap();
        b.init_terrain(Vector2::new(16.0, 0.0), &noise, &links, &config).unwrap();
        assert_eq!(a.blocks(), b.blocks());
        assert_eq!(a.neighbours(), b.neighbours());
    }

    #[test]
    fn grass_grows_on_exposed_dirt_only() {
        let config = WorldConfig::default();
        let mut chunk = Chunk::default();
        chunk
            .init_terrain(Vector2::new(0.0, 0.0), &heightmap_noise(14), &[None; 4], &config)
            .unwrap();
        chunk.place_at(Vector3::new(0, 14, 0), BlockType::STONE.id()).unwrap();

        let converted = chunk.grow_grass(&config);
        assert_eq!(converted, CHUNK_SIZE * CHUNK_SIZE - 1);
        let at = |y| chunk.get_block(Vector3::new(5, y, 5)).unwrap().get_block_type();
        assert_eq!(at(13), Some(BlockType::GRASS));
        assert_eq!(at(12), Some(BlockType::DIRT));
        assert_eq!(
            chunk.get_block(Vector3::new(0, 13, 0)).unwrap().get_block_type(),
            Some(BlockType::DIRT)
        );
    }

    #[test]
    fn neighbour_resolution_prefers_x_then_z() {
        let links = Neighbours {
            front: Some(ChunkId(1)),
            back: Some(ChunkId(2)),
            left: None,
            right: Some(ChunkId(4)),
        };
        assert_eq!(links.toward(Vector3::new(16, 0, 16)), Some(ChunkId(4)));
        assert_eq!(links.toward(Vector3::new(-1, 0, -1)), Some(ChunkId(2)));
        assert_eq!(links.toward(Vector3::new(-1, 0, 3)), None);
        assert_eq!(links.toward(Vector3::new(3, 50, 3)), None);

        let touching: Vec<ChunkId> = links.touching(15, 0).collect();
        assert_eq!(touching, vec![ChunkId(4), ChunkId(2)]);
        assert_eq!(links.touching(7, 7).count(), 0);
    }

    #[test]
    fn mesh_is_created_once() {
        let mut chunk = Chunk::default();
        assert_eq!(chunk.update_mesh(Vec::new(), Vec::new()), Err(ChunkError::MeshNotCreated));
        chunk.create_mesh(Mesh::new(Vec::new(), Vec::new(), Vec::new())).unwrap();
        assert_eq!(
            chunk.create_mesh(Mesh::new(Vec::new(), Vec::new(), Vec::new())),
            Err(ChunkError::MeshAlreadyCreated)
        );
        chunk.mark_dirty();
        chunk.update_mesh(Vec::new(), Vec::new()).unwrap();
        assert!(!chunk.is_dirty());
    }
}
