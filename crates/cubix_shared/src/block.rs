//! Block ids, world positions and chunk coordinates.

use crate::constants::CHUNK_SHIFT;

/// Raw block id as stored in the world and sent over the wire.
pub type BlockId = u16;

/// Classic block ids used by the default tables.
pub mod ids {
    use super::BlockId;

    /// Empty space.
    pub const AIR: BlockId = 0;
    /// Stone.
    pub const STONE: BlockId = 1;
    /// Grass.
    pub const GRASS: BlockId = 2;
    /// Dirt.
    pub const DIRT: BlockId = 3;
    /// Cobblestone.
    pub const COBBLE: BlockId = 4;
    /// Wooden planks.
    pub const WOOD: BlockId = 5;
    /// Sapling.
    pub const SAPLING: BlockId = 6;
    /// Bedrock.
    pub const BEDROCK: BlockId = 7;
    /// Flowing water.
    pub const WATER: BlockId = 8;
    /// Still water.
    pub const STILL_WATER: BlockId = 9;
    /// Flowing lava.
    pub const LAVA: BlockId = 10;
    /// Still lava.
    pub const STILL_LAVA: BlockId = 11;
    /// Sand.
    pub const SAND: BlockId = 12;
    /// Gravel.
    pub const GRAVEL: BlockId = 13;
    /// Gold ore.
    pub const GOLD_ORE: BlockId = 14;
    /// Iron ore.
    pub const IRON_ORE: BlockId = 15;
    /// Coal ore.
    pub const COAL_ORE: BlockId = 16;
    /// Log.
    pub const LOG: BlockId = 17;
    /// Leaves.
    pub const LEAVES: BlockId = 18;
    /// Sponge.
    pub const SPONGE: BlockId = 19;
    /// Glass.
    pub const GLASS: BlockId = 20;
    /// Red cloth, first of the sixteen cloth colours.
    pub const RED: BlockId = 21;
    /// White cloth, last of the sixteen cloth colours.
    pub const WHITE: BlockId = 36;
    /// Dandelion.
    pub const DANDELION: BlockId = 37;
    /// Rose.
    pub const ROSE: BlockId = 38;
    /// Brown mushroom.
    pub const BROWN_SHROOM: BlockId = 39;
    /// Red mushroom.
    pub const RED_SHROOM: BlockId = 40;
    /// Gold block.
    pub const GOLD: BlockId = 41;
    /// Iron block.
    pub const IRON: BlockId = 42;
    /// Double slab.
    pub const DOUBLE_SLAB: BlockId = 43;
    /// Slab.
    pub const SLAB: BlockId = 44;
    /// Brick.
    pub const BRICK: BlockId = 45;
    /// TNT.
    pub const TNT: BlockId = 46;
    /// Bookshelf.
    pub const BOOKSHELF: BlockId = 47;
    /// Mossy cobblestone.
    pub const MOSSY_ROCKS: BlockId = 48;
    /// Obsidian.
    pub const OBSIDIAN: BlockId = 49;
    /// Last block of the CustomBlocks extension (stone brick).
    pub const MAX_CPE: BlockId = 65;
}

/// How a block is drawn and collided with, as far as the orchestration
/// core cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Invisible, non-solid (air).
    Gas,
    /// Drawn as crossed sprites (plants, mushrooms).
    Sprite,
    /// Water and lava.
    Liquid,
    /// Everything else.
    Solid,
}

impl BlockKind {
    /// Classifies a block id using the classic block set.
    #[must_use]
    pub const fn classify(block: BlockId) -> Self {
        match block {
            ids::AIR => Self::Gas,
            ids::SAPLING | ids::DANDELION..=ids::RED_SHROOM => Self::Sprite,
            ids::WATER..=ids::STILL_LAVA => Self::Liquid,
            _ => Self::Solid,
        }
    }
}

/// Integer position of a block in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate (up).
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Creates a block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the chunk containing this block.
    #[inline]
    #[must_use]
    pub const fn chunk(self) -> ChunkCoord {
        ChunkCoord {
            x: self.x >> CHUNK_SHIFT,
            y: self.y >> CHUNK_SHIFT,
            z: self.z >> CHUNK_SHIFT,
        }
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

/// Coordinate of a chunk (block coordinate shifted by `CHUNK_SHIFT`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ChunkCoord {
    /// Chunk X.
    pub x: i32,
    /// Chunk Y.
    pub y: i32,
    /// Chunk Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_of_block() {
        assert_eq!(BlockPos::new(0, 0, 0).chunk(), ChunkCoord::new(0, 0, 0));
        assert_eq!(BlockPos::new(15, 16, 31).chunk(), ChunkCoord::new(0, 1, 1));
        assert_eq!(BlockPos::new(-1, 0, 0).chunk(), ChunkCoord::new(-1, 0, 0));
    }

    #[test]
    fn test_classify() {
        assert_eq!(BlockKind::classify(ids::AIR), BlockKind::Gas);
        assert_eq!(BlockKind::classify(ids::ROSE), BlockKind::Sprite);
        assert_eq!(BlockKind::classify(ids::SAPLING), BlockKind::Sprite);
        assert_eq!(BlockKind::classify(ids::STILL_LAVA), BlockKind::Liquid);
        assert_eq!(BlockKind::classify(ids::STONE), BlockKind::Solid);
        assert_eq!(BlockKind::classify(ids::MAX_CPE), BlockKind::Solid);
    }
}
