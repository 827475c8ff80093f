//! # Chunk Iteration Module
//!
//! This module provides an iterator over the active blocks of a chunk, in the
//! chunk's storage order (x outermost, then y, then z).

use cgmath::Vector3;

use crate::engine_state::voxels::block::Block;

use super::{Chunk, CHUNK_HEIGHT, CHUNK_SIZE};

/// An iterator over all active blocks in a chunk.
///
/// Walks the flat block array once, skipping inactive cells, and yields each
/// active block with its local index.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next position in the flat block array
    current_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    ///
    /// # Arguments
    /// * `chunk_ref` - A reference to the chunk to iterate over
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Vector3<i32>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let blocks = self.chunk_ref.blocks();
        while self.current_offset < blocks.len() {
            let offset = self.current_offset;
            self.current_offset += 1;

            let block = &blocks[offset];
            if block.is_active() {
                let x = offset / (CHUNK_SIZE * CHUNK_HEIGHT);
                let y = (offset / CHUNK_SIZE) % CHUNK_HEIGHT;
                let z = offset % CHUNK_SIZE;
                return Some((Vector3::new(x as i32, y as i32, z as i32), block));
            }
        }
        None
    }
}

impl Chunk {
    /// Iterates the active blocks with their local indices.
    pub fn iter_active(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn yields_active_blocks_in_storage_order() {
        let mut chunk = Chunk::default();
        let placed = [Vector3::new(0, 0, 1), Vector3::new(0, 2, 0), Vector3::new(3, 47, 15)];
        for index in placed.iter().rev() {
            chunk.place_at(*index, BlockType::DIRT.id()).unwrap();
        }

        let visited: Vec<Vector3<i32>> = chunk.iter_active().map(|(index, _)| index).collect();
        assert_eq!(visited, placed.to_vec());
        for index in visited {
            assert_eq!(
                Chunk::flat_index(index.x as usize, index.y as usize, index.z as usize),
                chunk.blocks().iter().position(|b| std::ptr::eq(b, chunk.get_block(index).unwrap())).unwrap()
            );
        }
    }

    #[test]
    fn empty_chunk_yields_nothing() {
        assert_eq!(Chunk::default().iter_active().count(), 0);
    }
}
