//! # Voxel World
//!
//! This module contains the voxel world itself: how blocks are represented,
//! how they are grouped into chunks, and how a whole map of chunks is
//! generated and edited.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Voxel material ids, face directions and the material registry
//! * **Chunk**: Fixed-size 16x48x16 columns of blocks with neighbour links
//! * **World**: The chunk arena; resolves edits across chunk boundaries and keeps meshes current
//! * **ChunkManager**: Generates a world from noise, then plants grass and trees
//! * **Config**: Generation parameters loaded from JSON
//! * **Tasks**: Work run on the worker pool during generation
//!
//! ## Data Flow
//!
//! 1. `ChunkManager` samples noise and allocates the chunk grid
//! 2. Each chunk carves its terrain from its noise slice
//! 3. `World` plants the environment and builds the first mesh of every chunk
//! 4. Gameplay edits go through `World`, which marks affected chunks dirty
//! 5. `World::update` rebuilds dirty meshes and hands them to the renderer

pub mod block;
pub mod chunk;
pub mod chunk_manager;
pub mod config;
pub mod tasks;
pub mod world;
