//! Mesh generation and hand-off to the rendering backend.
//!
//! This module picks the meshing strategy for a chunk and defines
//! [`MeshSink`], the interface a backend implements to receive and draw
//! chunk meshes. The engine never talks to a graphics API directly: it builds
//! CPU-side buffers, and the sink turns them into GPU objects.
//!
//! # Upload flow
//! 1. A chunk's mesh is created once after world generation
//! 2. Edits mark chunks dirty; the per-frame update rebuilds those meshes in place
//! 3. Every mesh whose buffers changed since the last upload is passed to [`MeshSink::upload`]
//! 4. [`MeshSink::draw`] is called for each non-empty mesh when drawing

use serde::Deserialize;

pub mod mesh;

use mesh::{culled::culled, greedy::greedy, Mesh, MeshBuffers};

use crate::engine_state::voxels::{
    block::material::MaterialRegistry,
    chunk::{ChunkError, ChunkId, ChunkNeighbourhood},
};

/// How chunk geometry is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshingStrategy {
    /// One quad per visible voxel face.
    #[default]
    Culled,
    /// Coplanar faces with matching texture and occlusion merged into rectangles.
    Greedy,
}

impl MeshingStrategy {
    /// Builds the geometry of the centre chunk of `neighbourhood`.
    pub fn build(
        self,
        neighbourhood: &ChunkNeighbourhood<'_>,
        registry: &MaterialRegistry,
    ) -> Result<MeshBuffers, ChunkError> {
        match self {
            MeshingStrategy::Culled => culled(neighbourhood, registry),
            MeshingStrategy::Greedy => greedy(neighbourhood, registry),
        }
    }
}

/// Receives chunk meshes on behalf of a rendering backend.
///
/// `upload` is called with the same chunk id every time that chunk's mesh is
/// rebuilt, so a backend can keep one GPU object per chunk and refill it.
pub trait MeshSink {
    /// Takes the current buffers of the mesh belonging to `chunk`.
    fn upload(&mut self, chunk: ChunkId, mesh: &Mesh);

    /// Draws the last uploaded buffers of `chunk`.
    fn draw(&mut self, chunk: ChunkId, mesh: &Mesh);
}
