#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Wasteland
//!
//! A chunked voxel world engine: procedural terrain, block editing and
//! chunk meshing, independent of any graphics API.
//!
//! ## Key Modules
//!
//! * `core` - Core utilities and data structures used throughout the engine
//! * `engine_state` - The main engine components including meshing, voxels, and task management
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * World generation (noise sampling, terrain carving, environment)
//! * Voxel data management and editing
//! * Meshing, with upload and draw handed to a [`MeshSink`]
//! * Task scheduling and execution
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voxel_wasteland::{ChunkManager, MaterialRegistry, WorldConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! voxel_wasteland::init_logger();
//!
//! let materials = Arc::new(MaterialRegistry::builtin()?);
//! let manager = ChunkManager::new(WorldConfig::default())?;
//! let world = manager.generate(materials)?;
//! assert_eq!(world.len(), 16 * 16);
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk-based voxel storage with flat block arrays
//! * Culled and greedy meshing strategies
//! * Multi-threaded chunk allocation
//! * Only chunks touched by an edit are re-meshed

use log::info;

pub mod core;
pub mod engine_state;

pub use engine_state::rendering::meshing::{mesh::Mesh, MeshSink, MeshingStrategy};
pub use engine_state::voxels::{
    block::{block_type::BlockType, material::MaterialRegistry},
    chunk::ChunkId,
    chunk_manager::{ChunkManager, GenerationError},
    config::WorldConfig,
    world::World,
};

/// Name of the stopwatch wrapped around a full generation pass in the logs.
pub const WORLD_GENERATION_STOPWATCH: &str = "World Generation";

/// Initializes `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG");

    if log_builder.try_init().is_ok() {
        info!("Logger initialized");
    }
}
