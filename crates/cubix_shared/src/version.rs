//! # Protocol Versions
//!
//! Descriptors selecting protocol behaviour and inventory layout. One is
//! chosen at startup and never changes afterwards.

use crate::block::{ids, BlockId};

/// Protocol version identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum VersionId {
    /// Classic 0.0.17a.
    V0017 = 27,
    /// Classic 0.0.19a.
    V0019 = 28,
    /// Classic 0.0.23a.
    V0023 = 29,
    /// Classic 0.30.
    V0030 = 30,
    /// Classic 0.30 with protocol extensions.
    Cpe = 31,
}

impl VersionId {
    /// Converts from the raw version number.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            27 => Some(Self::V0017),
            28 => Some(Self::V0019),
            29 => Some(Self::V0023),
            30 => Some(Self::V0030),
            31 => Some(Self::Cpe),
            _ => None,
        }
    }
}

/// A protocol version descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameVersion {
    /// Human readable name.
    pub name: &'static str,
    /// Version identifier.
    pub version: VersionId,
    /// Protocol id sent during the handshake.
    pub protocol: u8,
    /// Highest block id in the core block set.
    pub max_core_block: BlockId,
    /// Blocks per row in the inventory grid.
    pub blocks_per_row: u8,
    /// Blocks shown in the inventory, in display order.
    pub inventory: &'static [BlockId],
    /// Initial hotbar contents.
    pub hotbar: &'static [BlockId],
}

impl GameVersion {
    /// Returns the inventory size.
    #[must_use]
    pub fn inventory_size(&self) -> usize {
        self.inventory.len()
    }

    /// Returns the descriptor for a version id.
    #[must_use]
    pub fn get(version: VersionId) -> &'static Self {
        match version {
            VersionId::V0017 => &VERSIONS[0],
            VersionId::V0019 => &VERSIONS[1],
            VersionId::V0023 => &VERSIONS[2],
            VersionId::V0030 => &VERSIONS[3],
            VersionId::Cpe => &VERSIONS[4],
        }
    }

    /// Selects the startup version.
    ///
    /// Protocol extensions always select [`VersionId::Cpe`]; otherwise the
    /// requested classic version is used, defaulting to 0.30.
    #[must_use]
    pub fn select(requested: Option<VersionId>, use_cpe: bool) -> &'static Self {
        if use_cpe {
            return Self::get(VersionId::Cpe);
        }
        match requested {
            Some(VersionId::Cpe) | None => Self::get(VersionId::V0030),
            Some(v) => Self::get(v),
        }
    }
}

const V7_INVENTORY: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::BRICK, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::GLASS,
    ids::SLAB, ids::MOSSY_ROCKS, ids::SAPLING, ids::DANDELION, ids::ROSE, ids::BROWN_SHROOM,
    ids::RED_SHROOM, ids::SAND, ids::GRAVEL, ids::SPONGE, ids::RED, 22, 23, 24, 25, 26, 27, 28,
    29, 30, 31, 32, 33, 34, 35, ids::WHITE, ids::COAL_ORE, ids::IRON_ORE, ids::GOLD_ORE,
    ids::IRON, ids::GOLD, ids::BOOKSHELF, ids::TNT, ids::OBSIDIAN,
];
const V6_INVENTORY: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::GLASS,
    ids::SAPLING, ids::DANDELION, ids::ROSE, ids::BROWN_SHROOM, ids::RED_SHROOM, ids::SAND,
    ids::GRAVEL, ids::SPONGE, ids::RED, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35,
    ids::WHITE, ids::COAL_ORE, ids::IRON_ORE, ids::GOLD_ORE, ids::GOLD,
];
const V5_INVENTORY: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::GLASS, ids::SAND,
    ids::GRAVEL, ids::SPONGE, ids::SAPLING,
];
const V4_INVENTORY: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::SAND, ids::GRAVEL,
    ids::SAPLING,
];
const CPE_INVENTORY: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::BRICK, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::GLASS,
    ids::SLAB, ids::MOSSY_ROCKS, ids::SAPLING, ids::DANDELION, ids::ROSE, ids::BROWN_SHROOM,
    ids::RED_SHROOM, ids::SAND, ids::GRAVEL, ids::SPONGE, ids::RED, 22, 23, 24, 25, 26, 27, 28,
    29, 30, 31, 32, 33, 34, 35, ids::WHITE, ids::COAL_ORE, ids::IRON_ORE, ids::GOLD_ORE,
    ids::IRON, ids::GOLD, ids::BOOKSHELF, ids::TNT, ids::OBSIDIAN, 50, 51, 52, 53, 54, 55, 56, 57,
    58, 59, 60, 61, 62, 63, 64, ids::MAX_CPE,
];

const V7_HOTBAR: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::BRICK, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::GLASS,
    ids::SLAB,
];
const V6_HOTBAR: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::GLASS, ids::SAND,
    ids::GRAVEL,
];
const V4_HOTBAR: &[BlockId] = &[
    ids::STONE, ids::COBBLE, ids::DIRT, ids::WOOD, ids::LOG, ids::LEAVES, ids::SAND, ids::GRAVEL,
    ids::SAPLING,
];

static VERSIONS: [GameVersion; 5] = [
    GameVersion {
        name: "0.0.17a",
        version: VersionId::V0017,
        protocol: 0x03,
        max_core_block: ids::LEAVES,
        blocks_per_row: 10,
        inventory: V4_INVENTORY,
        hotbar: V4_HOTBAR,
    },
    GameVersion {
        name: "0.0.19a",
        version: VersionId::V0019,
        protocol: 0x04,
        max_core_block: ids::GLASS,
        blocks_per_row: 10,
        inventory: V5_INVENTORY,
        hotbar: V6_HOTBAR,
    },
    GameVersion {
        name: "0.0.23a",
        version: VersionId::V0023,
        protocol: 0x05,
        max_core_block: ids::GOLD,
        blocks_per_row: 10,
        inventory: V6_INVENTORY,
        hotbar: V6_HOTBAR,
    },
    GameVersion {
        name: "0.30",
        version: VersionId::V0030,
        protocol: 0x07,
        max_core_block: ids::OBSIDIAN,
        blocks_per_row: 9,
        inventory: V7_INVENTORY,
        hotbar: V7_HOTBAR,
    },
    GameVersion {
        name: "0.30 (CPE)",
        version: VersionId::Cpe,
        protocol: 0x07,
        max_core_block: ids::MAX_CPE,
        blocks_per_row: 10,
        inventory: CPE_INVENTORY,
        hotbar: V7_HOTBAR,
    },
];
