//! # Block Type Module
//!
//! This module defines the built-in block types of the voxel world and the
//! static table that maps material names to them.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the block types world generation knows about.
///
/// The discriminant is the material id stored in each [`Block`](super::Block)
/// and used as the key into the material registry. `FromPrimitive` gives the
/// checked conversion back from a stored id.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never registered as a material.
    AIR = 0,

    /// Indestructible floor layer.
    BEDROCK = 1,

    /// Deep terrain layer above the bedrock.
    STONE = 2,

    /// Middle terrain layer.
    SANDSTONE = 3,

    /// Loose sand.
    SAND = 4,

    /// Upper terrain filler.
    DIRT = 5,

    /// Dirt with an exposed top, produced by the environment pass.
    GRASS = 6,

    /// Tree trunk.
    DARK_OAK_LOG = 7,

    /// Tree canopy. Does not cull neighbouring faces.
    DARK_OAK_LEAVES = 8,

    /// Water.
    WATER = 9,
}

/// Material names as they appear in material definition files.
static BLOCK_TYPE_NAMES: phf::Map<&'static str, BlockType> = phf::phf_map! {
    "air" => BlockType::AIR,
    "bedrock" => BlockType::BEDROCK,
    "stone" => BlockType::STONE,
    "sandstone" => BlockType::SANDSTONE,
    "sand" => BlockType::SAND,
    "dirt" => BlockType::DIRT,
    "grass_block" => BlockType::GRASS,
    "dark_oak_log" => BlockType::DARK_OAK_LOG,
    "dark_oak_leaves" => BlockType::DARK_OAK_LEAVES,
    "water" => BlockType::WATER,
};

impl BlockType {
    /// Converts a stored `BlockTypeSize` back into a `BlockType`.
    ///
    /// # Returns
    /// `None` for ids that do not name a built-in type (custom materials).
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Looks up a built-in type by its material name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_NAMES.get(name).copied()
    }

    /// The material id of this type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_primitive() {
        for id in 0..=9u8 {
            let block_type = BlockType::get_block_type_from_int(id).unwrap();
            assert_eq!(block_type.id(), id);
        }
        assert_eq!(BlockType::get_block_type_from_int(200), None);
    }

    #[test]
    fn names_resolve_to_types() {
        assert_eq!(BlockType::from_name("grass_block"), Some(BlockType::GRASS));
        assert_eq!(BlockType::from_name("dark_oak_leaves"), Some(BlockType::DARK_OAK_LEAVES));
        assert_eq!(BlockType::from_name("obsidian"), None);
    }
}
