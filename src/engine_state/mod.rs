//! # Engine State Module
//!
//! The engine module containing the voxel world and the systems that feed it.
//!
//! ## Key Components
//!
//! * `rendering` - Vertex format, chunk meshing and the block texture array
//! * `task_management` - Worker pool for parallel generation work
//! * `voxels` - Voxel data, chunks, world generation and editing
//!
//! ## Architecture
//!
//! Each subsystem is responsible for one aspect of the engine. `voxels` owns
//! all world state and calls into `rendering` to turn chunks into meshes;
//! a rendering backend only sees finished meshes through
//! [`MeshSink`](rendering::meshing::MeshSink).

pub mod rendering;
pub mod task_management;
pub mod voxels;
