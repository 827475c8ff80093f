//! Rendering data for the voxel engine.
//!
//! This module holds everything the engine prepares for a rendering backend:
//! the vertex format, chunk meshing, and the block texture array. Drawing
//! itself happens behind [`meshing::MeshSink`], so no graphics API is linked.

pub mod meshing;
pub mod texture;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
