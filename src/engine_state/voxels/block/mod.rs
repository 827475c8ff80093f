//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face geometry, the material
//! registry and the block data structure itself.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod material;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// A block stores only its material id and whether it is present. All other
/// properties (textures, culling behaviour) are looked up from the material
/// registry by id. Blocks live inline in their chunk's flat array and are
/// only mutated through the chunk and world APIs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The material id of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
    active: bool,
}

impl Default for Block {
    fn default() -> Self {
        Block::air()
    }
}

impl Block {
    /// Creates a new block of the specified type.
    ///
    /// # Arguments
    /// * `block_type` - The material id of the block
    /// * `active` - Whether the block occupies its cell
    pub fn new(block_type: BlockTypeSize, active: bool) -> Self {
        Block { block_type, active }
    }

    /// An inactive block with the air id.
    pub fn air() -> Self {
        Block {
            block_type: BlockType::AIR.id(),
            active: false,
        }
    }

    /// Whether the block occupies its cell.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets whether the block occupies its cell.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// The material id as a built-in [`BlockType`], if it is one.
    pub fn get_block_type(&self) -> Option<BlockType> {
        BlockType::get_block_type_from_int(self.block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_is_inactive_air() {
        let block = Block::default();
        assert!(!block.is_active());
        assert_eq!(block.get_block_type(), Some(BlockType::AIR));
    }

    #[test]
    fn activation_keeps_material() {
        let mut block = Block::new(BlockType::STONE.id(), false);
        block.set_active(true);
        assert!(block.is_active());
        assert_eq!(block.get_block_type(), Some(BlockType::STONE));
    }
}
