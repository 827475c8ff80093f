//! # Chunk Manager
//!
//! Orchestrates generation of a whole world in one blocking pass:
//!
//! 1. Sample two noise maps from the two configured seeds. In 3D mode the maps
//!    hold raw density and an extra heightmap is sampled from the first seed.
//! 2. Allocate the chunk grid, on worker threads if `async_generation` is set.
//! 3. Blend the two noise maps, and in 3D mode the heightmap into the result.
//! 4. Hand every chunk its slice of the blended map and its neighbour links.
//! 5. Plant grass and trees, build the texture array and the first meshes.
//!
//! Noise maps cover the whole grid: `map_size * CHUNK_SIZE` voxels per side and
//! `CHUNK_HEIGHT` voxels tall, addressed by `x * width * HEIGHT + z * HEIGHT + y`.

use std::fmt;
use std::sync::Arc;

use cgmath::Vector2;
use log::{debug, info};
use noise::{NoiseFn, Perlin};
use web_time::Instant;

use crate::engine_state::{
    rendering::texture::TextureArray,
    task_management::{task::Task, TaskError, TaskManager},
};

use super::{
    block::{
        block_type::BlockType,
        material::{MaterialError, MaterialRegistry},
    },
    chunk::{Chunk, ChunkError, ChunkId, CHUNK_HEIGHT, CHUNK_SIZE, CHUNK_VOLUME},
    config::{ConfigError, WorldConfig},
    tasks::chunk_allocation_task::ChunkAllocationTask,
    world::World,
};

/// Materials world generation places.
const GENERATED_MATERIALS: [BlockType; 7] = [
    BlockType::BEDROCK,
    BlockType::STONE,
    BlockType::SANDSTONE,
    BlockType::DIRT,
    BlockType::GRASS,
    BlockType::DARK_OAK_LOG,
    BlockType::DARK_OAK_LEAVES,
];

/// Failure of a world generation pass.
#[derive(Debug)]
pub enum GenerationError {
    /// The configuration is unusable.
    Config(ConfigError),
    /// A material generation places is missing or the registry is malformed.
    Materials(MaterialError),
    /// The allocation workers failed.
    Task(TaskError),
    /// The noise map does not cover the chunk grid.
    NoiseMapSize { expected: usize, actual: usize },
    /// The number of allocated chunks does not match the grid.
    ChunkCount { expected: usize, actual: usize },
    /// A chunk rejected its terrain or environment input.
    Chunk { index: usize, source: ChunkError },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Config(e) => write!(f, "world config: {e}"),
            GenerationError::Materials(e) => write!(f, "materials: {e}"),
            GenerationError::Task(e) => write!(f, "chunk allocation: {e}"),
            GenerationError::NoiseMapSize { expected, actual } => {
                write!(f, "noise map holds {actual} values, expected {expected}")
            }
            GenerationError::ChunkCount { expected, actual } => {
                write!(f, "allocated {actual} chunks, expected {expected}")
            }
            GenerationError::Chunk { index, source } => write!(f, "chunk #{index}: {source}"),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::Config(e) => Some(e),
            GenerationError::Materials(e) => Some(e),
            GenerationError::Task(e) => Some(e),
            GenerationError::Chunk { source, .. } => Some(source),
            GenerationError::NoiseMapSize { .. } | GenerationError::ChunkCount { .. } => None,
        }
    }
}

impl From<ConfigError> for GenerationError {
    fn from(e: ConfigError) -> Self {
        GenerationError::Config(e)
    }
}

impl From<MaterialError> for GenerationError {
    fn from(e: MaterialError) -> Self {
        GenerationError::Materials(e)
    }
}

impl From<TaskError> for GenerationError {
    fn from(e: TaskError) -> Self {
        GenerationError::Task(e)
    }
}

/// Hermite interpolation of `t` clamped to `[0, 1]`.
fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Generates worlds from a [`WorldConfig`].
#[derive(Debug, Clone)]
pub struct ChunkManager {
    config: WorldConfig,
}

impl ChunkManager {
    /// Creates a manager for a validated configuration.
    pub fn new(config: WorldConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        Ok(ChunkManager { config })
    }

    /// The generation parameters.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Voxels per side of the whole grid.
    fn world_width(&self) -> usize {
        self.config.map_size * CHUNK_SIZE
    }

    /// Number of values in a world noise map.
    pub fn noise_map_len(&self) -> usize {
        self.world_width() * self.world_width() * CHUNK_HEIGHT
    }

    #[inline]
    fn world_noise_index(&self, x: usize, y: usize, z: usize) -> usize {
        x * self.world_width() * CHUNK_HEIGHT + z * CHUNK_HEIGHT + y
    }

    /// Samples a heightmap and expands it into a full noise map.
    ///
    /// Each column's scaled 2D Perlin sample `n` gives a surface height of
    /// `min_height + trunc(n * (CHUNK_HEIGHT - min_height))`, clamped to the
    /// chunk. Every voxel below the surface holds `|n|` (never zero), every
    /// voxel above it holds zero.
    pub fn get_noise_map(&self, seed: u32) -> Vec<f32> {
        let perlin = Perlin::new(seed);
        let frequency = self.config.noise_frequency;
        let width = self.world_width();
        let range = (CHUNK_HEIGHT - self.config.min_height) as f32;
        let mut map = vec![0.0; self.noise_map_len()];

        for x in 0..width {
            for z in 0..width {
                let sample = perlin.get([x as f64 * frequency, z as f64 * frequency]) as f32 * self.config.noise_scale;
                let height = (self.config.min_height as i32 + (sample * range) as i32).clamp(0, CHUNK_HEIGHT as i32) as usize;
                let fill = sample.abs().max(f32::MIN_POSITIVE);
                for y in 0..height {
                    map[self.world_noise_index(x, y, z)] = fill;
                }
            }
        }
        map
    }

    /// Samples scaled 3D Perlin density for every voxel below `max_height`.
    ///
    /// Voxels at or above `max_height` stay zero.
    pub fn get_noise_map_3d(&self, seed: u32) -> Vec<f32> {
        let perlin = Perlin::new(seed);
        let frequency = self.config.noise_frequency;
        let width = self.world_width();
        let mut map = vec![0.0; self.noise_map_len()];

        for x in 0..width {
            for z in 0..width {
                for y in 0..self.config.max_height {
                    let point = [x as f64 * frequency, y as f64 * frequency, z as f64 * frequency];
                    map[self.world_noise_index(x, y, z)] = perlin.get(point) as f32 * self.config.noise_scale_3d;
                }
            }
        }
        map
    }

    /// Blends `other` into `map` with a weight that rises smoothly along the
    /// flattened index, from all `map` at the start to nearly all `other` at
    /// the end. Only the common prefix of both maps is touched.
    pub fn smooth_noise_map(map: &mut [f32], other: &[f32]) {
        let len = map.len().min(other.len());
        for (i, (value, blended)) in map.iter_mut().zip(other).enumerate() {
            let t = smoothstep(i as f32 / len as f32);
            *value = *value * (1.0 - t) + blended * t;
        }
    }

    /// Blends a heightmap into a density map like [`ChunkManager::smooth_noise_map`],
    /// but only where the heightmap is nonzero.
    ///
    /// # Returns
    /// `false` without touching `map` if the sizes differ.
    pub fn height_map_blend(map: &mut [f32], height_map: &[f32]) -> bool {
        if map.len() != height_map.len() {
            return false;
        }
        let len = height_map.len();
        for (i, (value, height)) in map.iter_mut().zip(height_map).enumerate() {
            if *height != 0.0 {
                let t = smoothstep(i as f32 / len as f32);
                *value = *value * (1.0 - t) + height * t;
            }
        }
        true
    }

    /// Offset in voxels of the chunk at grid position `(grid_x, grid_z)`.
    ///
    /// The grid is centred on the origin.
    pub fn chunk_offset(&self, grid_x: usize, grid_z: usize) -> Vector2<f32> {
        let half = (self.world_width() / 2) as f32;
        Vector2::new(
            (grid_x * CHUNK_SIZE) as f32 - half,
            (grid_z * CHUNK_SIZE) as f32 - half,
        )
    }

    /// `[front, back, left, right]` links of the chunk at arena `index`.
    pub fn neighbour_links(&self, index: usize) -> [Option<ChunkId>; 4] {
        let map = self.config.map_size;
        let (x, z) = (index / map, index % map);
        [
            (z + 1 < map).then(|| ChunkId(index + 1)),
            (z > 0).then(|| ChunkId(index - 1)),
            (x > 0).then(|| ChunkId(index - map)),
            (x + 1 < map).then(|| ChunkId(index + map)),
        ]
    }

    /// Allocates `map_size²` empty chunks.
    ///
    /// With `async_generation` the work is split over the worker pool and the
    /// batches are joined in order; otherwise it runs on the calling thread.
    pub fn allocate_chunks(&self) -> Result<Vec<Chunk>, GenerationError> {
        let count = self.config.chunk_count();

        let chunks: Vec<Chunk> = if self.config.async_generation {
            let tasks = ChunkAllocationTask::partition(count, self.config.worker_count);
            let mut task_manager = TaskManager::new(tasks.len().min(self.config.worker_count));
            for task in tasks {
                task_manager.publish_task(task);
            }
            task_manager.join()?.into_iter().flatten().collect()
        } else {
            ChunkAllocationTask::new(count).process()
        };

        if chunks.len() != count {
            return Err(GenerationError::ChunkCount {
                expected: count,
                actual: chunks.len(),
            });
        }
        Ok(chunks)
    }

    /// Carves every chunk from its slice of `noise` and links it to its neighbours.
    pub fn process_noise_map(&self, noise: &[f32], chunks: &mut [Chunk]) -> Result<(), GenerationError> {
        let count = self.config.chunk_count();
        if chunks.len() != count {
            return Err(GenerationError::ChunkCount {
                expected: count,
                actual: chunks.len(),
            });
        }
        if noise.len() != self.noise_map_len() {
            return Err(GenerationError::NoiseMapSize {
                expected: self.noise_map_len(),
                actual: noise.len(),
            });
        }

        let map = self.config.map_size;
        let mut slice = Vec::with_capacity(CHUNK_VOLUME);
        for (index, chunk) in chunks.iter_mut().enumerate() {
            let (grid_x, grid_z) = (index / map, index % map);

            slice.clear();
            for i in 0..CHUNK_VOLUME {
                let local_x = i / (CHUNK_SIZE * CHUNK_HEIGHT);
                let local_z = (i / CHUNK_HEIGHT) % CHUNK_SIZE;
                let local_y = i % CHUNK_HEIGHT;
                slice.push(noise[self.world_noise_index(
                    grid_x * CHUNK_SIZE + local_x,
                    local_y,
                    grid_z * CHUNK_SIZE + local_z,
                )]);
            }

            chunk
                .init_terrain(
                    self.chunk_offset(grid_x, grid_z),
                    &slice,
                    &self.neighbour_links(index),
                    &self.config,
                )
                .map_err(|source| GenerationError::Chunk { index, source })?;
        }
        Ok(())
    }

    /// Runs a full generation pass.
    ///
    /// Chunks whose first mesh fails to build are logged and left without a
    /// mesh; every other failure aborts the pass.
    ///
    /// # Arguments
    /// * `materials` - Registry holding every material generation places
    pub fn generate(&self, materials: Arc<MaterialRegistry>) -> Result<World, GenerationError> {
        let start = Instant::now();
        materials.require(&GENERATED_MATERIALS)?;
        let [primary_seed, secondary_seed] = self.config.seeds;

        let stage = Instant::now();
        let (mut noise, secondary, height_map) = if self.config.noise_3d {
            (
                self.get_noise_map_3d(primary_seed),
                self.get_noise_map_3d(secondary_seed),
                Some(self.get_noise_map(primary_seed)),
            )
        } else {
            (self.get_noise_map(primary_seed), self.get_noise_map(secondary_seed), None)
        };
        info!("Sampled noise maps in {:?}", stage.elapsed());

        let stage = Instant::now();
        let mut chunks = self.allocate_chunks()?;
        info!("Allocated {} chunks in {:?}", chunks.len(), stage.elapsed());

        Self::smooth_noise_map(&mut noise, &secondary);
        if let Some(height_map) = height_map {
            Self::height_map_blend(&mut noise, &height_map);
        }

        let stage = Instant::now();
        self.process_noise_map(&noise, &mut chunks)?;
        debug!("Carved terrain in {:?}", stage.elapsed());

        let texture = TextureArray::load(materials.texture_paths());
        let mut world = World::new(chunks, materials, texture, self.config.clone());

        let stage = Instant::now();
        for index in 0..world.len() {
            world
                .init_environment(ChunkId(index))
                .map_err(|source| GenerationError::Chunk { index, source })?;
        }
        debug!("Planted environment in {:?}", stage.elapsed());

        let stage = Instant::now();
        let built = world.create_meshes();
        info!("Built {built}/{} chunk meshes in {:?}", world.len(), stage.elapsed());

        info!("{} took {:?}", crate::WORLD_GENERATION_STOPWATCH, start.elapsed());
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(map_size: usize) -> ChunkManager {
        ChunkManager::new(WorldConfig {
            map_size,
            async_generation: false,
            tree_seed: Some(3),
            ..WorldConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn heightmap_columns_are_filled_up_to_the_surface() {
        let manager = manager(2);
        let map = manager.get_noise_map(1337);
        assert_eq!(map.len(), 32 * 32 * CHUNK_HEIGHT);

        for x in [0, 7, 19, 31] {
            for z in [0, 13, 31] {
                let column: Vec<f32> = (0..CHUNK_HEIGHT).map(|y| map[manager.world_noise_index(x, y, z)]).collect();
                let height = column.iter().take_while(|v| **v != 0.0).count();
                assert!(column[height..].iter().all(|v| *v == 0.0), "gap in column ({x}, {z})");
                assert!(column[..height].iter().all(|v| *v > 0.0 && *v == column[0]));
            }
        }
        assert_eq!(map, manager.get_noise_map(1337));
        assert_ne!(map, manager.get_noise_map(9658));
    }

    #[test]
    fn density_map_stops_at_max_height() {
        let manager = manager(1);
        let map = manager.get_noise_map_3d(5);
        let max = manager.config().max_height;
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in max..CHUNK_HEIGHT {
                    assert_eq!(map[manager.world_noise_index(x, y, z)], 0.0);
                }
            }
        }
        assert!(map.iter().any(|v| *v != 0.0));
    }

    #[test]
    fn smoothing_moves_from_first_to_second_map() {
        let mut map = vec![1.0; 100];
        ChunkManager::smooth_noise_map(&mut map, &[3.0; 80]);
        assert_eq!(map[0], 1.0);
        assert!(map[40] > 1.0 && map[40] < 3.0);
        assert!(map[79] > 2.9);
        assert_eq!(map[80], 1.0);
    }

    #[test]
    fn height_blend_skips_empty_cells_and_mismatched_maps() {
        let mut map = vec![1.0; 10];
        let mut height = vec![0.0; 10];
        height[5] = 3.0;
        assert!(ChunkManager::height_map_blend(&mut map, &height));
        assert_eq!(map[4], 1.0);
        assert!(map[5] > 1.0);

        assert!(!ChunkManager::height_map_blend(&mut map, &[2.0; 3]));
        assert_eq!(map[0], 1.0);
    }

    #[test]
    fn grid_is_centred_and_linked_row_major() {
        let manager = manager(3);
        assert_eq!(manager.chunk_offset(0, 0), Vector2::new(-24.0, -24.0));
        assert_eq!(manager.chunk_offset(2, 1), Vector2::new(8.0, -8.0));

        assert_eq!(manager.neighbour_links(0), [Some(ChunkId(1)), None, None, Some(ChunkId(3))]);
        assert_eq!(
            manager.neighbour_links(4),
            [Some(ChunkId(5)), Some(ChunkId(3)), Some(ChunkId(1)), Some(ChunkId(7))]
        );
        assert_eq!(manager.neighbour_links(8), [None, Some(ChunkId(7)), Some(ChunkId(5)), None]);
    }

    #[test]
    fn parallel_allocation_matches_sequential() {
        for workers in [0, 1, 4, 8, 20] {
            let manager = ChunkManager::new(WorldConfig {
                map_size: 3,
                async_generation: true,
                worker_count: workers,
                ..WorldConfig::default()
            })
            .unwrap();
            assert_eq!(manager.allocate_chunks().unwrap().len(), 9, "{workers} workers");
        }
        assert_eq!(manager(3).allocate_chunks().unwrap().len(), 9);
    }

    #[test]
    fn process_noise_map_rejects_bad_sizes() {
        let manager = manager(2);
        let mut chunks = manager.allocate_chunks().unwrap();
        assert!(matches!(
            manager.process_noise_map(&[0.0; 4], &mut chunks),
            Err(GenerationError::NoiseMapSize { actual: 4, .. })
        ));
        assert!(matches!(
            manager.process_noise_map(&manager.get_noise_map(1), &mut chunks[..3]),
            Err(GenerationError::ChunkCount { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn process_noise_map_slices_per_chunk() {
        let manager = manager(2);
        let mut noise = vec![0.0; manager.noise_map_len()];
        // one solid voxel high up in the chunk at grid (1, 0)
        noise[manager.world_noise_index(16 + 3, 30, 5)] = 1.0;
        let mut chunks = manager.allocate_chunks().unwrap();
        manager.process_noise_map(&noise, &mut chunks).unwrap();

        let floor = CHUNK_SIZE * CHUNK_SIZE * manager.config().min_height;
        assert_eq!(chunks[2].active_count(), floor + 1);
        assert!(chunks[2].check_block_exists_at(cgmath::Vector3::new(3, 30, 5)));
        assert_eq!(chunks[0].active_count(), floor);
        assert_eq!(chunks[2].offset(), Vector2::new(0.0, -16.0));
    }

    #[test]
    fn generation_requires_its_materials() {
        let registry = MaterialRegistry::from_json_str(
            r#"[{ "id": 1, "name": "bedrock", "texture": "assets/textures/block/bedrock.png" }]"#,
        )
        .unwrap();
        assert!(matches!(
            manager(1).generate(Arc::new(registry)),
            Err(GenerationError::Materials(MaterialError::Missing { .. }))
        ));
    }

    #[test]
    fn generated_world_has_meshes_and_clean_chunks() {
        let world = manager(2).generate(Arc::new(MaterialRegistry::builtin().unwrap())).unwrap();
        assert_eq!(world.len(), 4);
        for chunk in world.chunks() {
            let mesh = chunk.mesh().expect("every chunk gets a mesh");
            assert!(!mesh.is_empty());
            assert!(!chunk.is_dirty());
        }
        assert_eq!(world.dirty_chunks().count(), 0);
        assert_eq!(world.texture().len(), world.materials().texture_paths().len());
    }
}
