//! Mesh data structures for chunk rendering.
//!
//! [`MeshBuffers`] collects faces into vertex and index buffers while a mesher
//! runs. [`Mesh`] is what a chunk keeps: the buffers plus the texture handles
//! they sample and the bookkeeping needed to re-upload only what changed.

use crate::engine_state::rendering::{texture::TextureHandle, Vertex};

use super::face::Face;

/// Growing vertex and index buffers.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshBuffers {
    /// The vertex data
    pub vertices: Vec<Vertex>,
    /// The index data, six per face
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Appends the four vertices and six indices of `face`.
    pub fn push_face(&mut self, face: &Face) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices.extend_from_slice(&face.indices(base));
    }

    /// Number of faces pushed so far.
    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }
}

/// The renderable mesh of one chunk.
///
/// Created once per chunk and afterwards rebuilt in place. Every rebuild bumps
/// the revision and marks the mesh as needing an upload.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    textures: Vec<TextureHandle>,
    revision: u64,
    uploaded: bool,
}

impl Mesh {
    /// Creates a new mesh that has not been uploaded yet.
    ///
    /// # Arguments
    /// * `vertices` - Vertex data
    /// * `indices` - Index data
    /// * `textures` - Texture handles sampled by the mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, textures: Vec<TextureHandle>) -> Self {
        Mesh {
            vertices,
            indices,
            textures,
            revision: 0,
            uploaded: false,
        }
    }

    /// Replaces the geometry, keeping the mesh identity and its textures.
    pub fn rebuild(&mut self, vertices: Vec<Vertex>, indices: Vec<u32>) {
        self.vertices = vertices;
        self.indices = indices;
        self.revision += 1;
        self.uploaded = false;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    /// Number of rebuilds since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the current buffers have been handed to a sink.
    pub fn is_uploaded(&self) -> bool {
        self.uploaded
    }

    pub(crate) fn mark_uploaded(&mut self) {
        self.uploaded = true;
    }

    /// Number of quads in the mesh.
    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<MeshBuffers> for (Vec<Vertex>, Vec<u32>) {
    fn from(buffers: MeshBuffers) -> Self {
        (buffers.vertices, buffers.indices)
    }
}
