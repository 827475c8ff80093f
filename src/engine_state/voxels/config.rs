//! # World Configuration
//!
//! Tunables for world generation. Every field has a default matching the
//! stock game, so a config file only needs to name what it changes:
//!
//! ```json
//! { "map_size": 4, "noise_3d": true, "meshing": "greedy" }
//! ```

use std::{fmt, fs, io, path::Path};

use serde::Deserialize;

use crate::engine_state::rendering::meshing::MeshingStrategy;

use super::chunk::CHUNK_HEIGHT;

/// Failure while loading a [`WorldConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io { path: String, source: io::Error },
    /// The file is not valid configuration JSON.
    Parse { source: serde_json::Error },
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "failed to read config `{path}`: {source}"),
            ConfigError::Parse { source } => write!(f, "invalid config json: {source}"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Parameters of one world generation pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks per side of the square chunk grid.
    pub map_size: usize,
    /// Allocate chunks on worker threads.
    pub async_generation: bool,
    /// Number of allocation workers when `async_generation` is set.
    pub worker_count: usize,
    /// Carve caves from 3D density noise instead of a plain heightmap.
    pub noise_3d: bool,
    /// Seeds of the two blended noise maps. The first also drives the 3D heightmap.
    pub seeds: [u32; 2],
    /// Perlin sampling frequency in cycles per voxel.
    pub noise_frequency: f64,
    /// Multiplier applied to 2D heightmap samples.
    pub noise_scale: f32,
    /// Multiplier applied to 3D density samples.
    pub noise_scale_3d: f32,
    /// Density above which a 3D-noise voxel is solid.
    pub acceptable_noise_3d: f32,
    /// Voxels below this height are always solid.
    pub min_height: usize,
    /// Top of the band sampled by 3D noise.
    pub max_height: usize,
    /// Top of the sandstone band; grass and trees start here.
    pub surface_height: usize,
    /// Top of the stone band.
    pub stone_height: usize,
    /// Minimum distance between trees within a chunk.
    pub tree_spacing: f32,
    /// Poisson-disc candidates per spawn point.
    pub tree_sample_attempts: usize,
    /// Shortest trunk.
    pub tree_min_height: i32,
    /// Tallest trunk.
    pub tree_max_height: i32,
    /// Seed for tree placement; `None` draws a fresh one per run.
    pub tree_seed: Option<u64>,
    /// How chunk meshes are built.
    pub meshing: MeshingStrategy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            map_size: 16,
            async_generation: true,
            worker_count: 8,
            noise_3d: false,
            seeds: [1337, 9658],
            noise_frequency: 0.01,
            noise_scale: 1.5,
            noise_scale_3d: 1.0,
            acceptable_noise_3d: 0.0,
            min_height: 2,
            max_height: CHUNK_HEIGHT / 3,
            surface_height: 10,
            stone_height: 5,
            tree_spacing: 8.5,
            tree_sample_attempts: 50,
            tree_min_height: 5,
            tree_max_height: 7,
            tree_seed: None,
            meshing: MeshingStrategy::Culled,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a config from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks that the values describe a world the generator can build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_size == 0 {
            return Err(ConfigError::Invalid("map_size must be at least 1".into()));
        }
        if self.min_height > CHUNK_HEIGHT || self.max_height > CHUNK_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "heights must not exceed the chunk height of {CHUNK_HEIGHT}"
            )));
        }
        if !(self.min_height <= self.stone_height && self.stone_height <= self.surface_height) {
            return Err(ConfigError::Invalid(
                "height bands must satisfy min_height <= stone_height <= surface_height".into(),
            ));
        }
        if self.tree_min_height < 1 || self.tree_min_height > self.tree_max_height {
            return Err(ConfigError::Invalid(
                "tree heights must satisfy 1 <= tree_min_height <= tree_max_height".into(),
            ));
        }
        if !(self.tree_spacing > 0.0) {
            return Err(ConfigError::Invalid("tree_spacing must be positive".into()));
        }
        Ok(())
    }

    /// Number of chunks in the grid.
    pub fn chunk_count(&self) -> usize {
        self.map_size * self.map_size
    }
}
