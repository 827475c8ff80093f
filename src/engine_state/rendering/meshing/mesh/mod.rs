//! Mesh generation for voxel rendering.
//!
//! This module converts chunk voxel data into vertex and index buffers.
//!
//! # Architecture
//! - [`Mesh`]: The per-chunk mesh, created once and rebuilt in place
//! - [`MeshBuffers`]: Vertex and index buffers collected by a mesher
//! - [`Face`]: A single (possibly merged) quad with occlusion and texture layer
//! - `culled`: One quad per visible face
//! - `greedy`: Merges coplanar faces with matching texture and occlusion
//!
//! Both meshers hide a face when the adjacent voxel (in the chunk or across a
//! boundary) is active and culls, and shade each corner with ambient occlusion.

pub mod culled;
mod face;
pub mod greedy;
mod mesh;

pub use face::Face;
pub use mesh::*;
