//! # Block Kind Module
//!
//! This module defines the fixed enumeration of block types that can occur in
//! the world. The enum is the rich, typed view of a block tag; the world grids
//! store only the compact [`BlockId`](super::BlockId) integer form.

use num_derive::FromPrimitive;

use super::BlockId;

/// Enumerates every block type the generator and gameplay systems can place.
///
/// The discriminant of each variant is the on-grid tag value, so converting
/// between `BlockKind` and [`BlockId`] is a cast in one direction and a
/// `FromPrimitive` lookup in the other. Variant order is load-bearing: the
/// metadata registry in the parent module is indexed by these discriminants.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockKind {
    /// Empty space. Tag zero, never stored in the registry with real metadata.
    Air = 0,
    /// Base terrain rock.
    Stone = 1,
    /// Broken stone, used by dungeon walls.
    Cobblestone = 2,
    /// Weathered dungeon wall variant.
    MossyCobblestone = 3,
    /// Indestructible world floor.
    Bedrock = 4,
    /// Loose earth beneath grassy surfaces.
    Dirt = 5,
    /// Dirt with a grassy top surface.
    Grass = 6,
    /// Desert and beach surface block.
    Sand = 7,
    /// Compacted sand, the desert subsurface.
    Sandstone = 8,
    /// Loose stone found on ocean floors.
    Gravel = 9,
    /// Snow-covered surface block used by cold biomes and high peaks.
    Snow = 10,
    /// Frozen water surface.
    Ice = 11,
    /// Still water, filled up to sea level during generation.
    Water = 12,
    /// Common shallow ore.
    CoalOre = 13,
    /// Mid-depth ore.
    IronOre = 14,
    /// Deep, uncommon ore.
    GoldOre = 15,
    /// Deep ore.
    RedstoneOre = 16,
    /// The rarest, deepest ore tier.
    DiamondOre = 17,
    /// Oak trunk.
    OakLog = 18,
    /// Oak canopy.
    OakLeaves = 19,
    /// Birch trunk.
    BirchLog = 20,
    /// Birch canopy.
    BirchLeaves = 21,
    /// Spruce trunk.
    SpruceLog = 22,
    /// Spruce canopy.
    SpruceLeaves = 23,
    /// Jungle trunk.
    JungleLog = 24,
    /// Jungle canopy.
    JungleLeaves = 25,
    /// Milled wood, used by cabins and mineshaft supports.
    Planks = 26,
    /// Point light source, emission 14.
    Torch = 27,
    /// Strong point light source, emission 15.
    Glowstone = 28,
    /// Cross-shaped surface decoration.
    TallGrass = 29,
    /// Cross-shaped surface decoration.
    Flower = 30,
    /// Desert column plant, grows one to three blocks tall.
    Cactus = 31,
    /// Cross-shaped decoration found in damp biomes and dungeons.
    Mushroom = 32,
    /// Dungeon centerpiece block.
    Spawner = 33,
}

/// Number of distinct block kinds; the metadata registry has exactly this many entries.
pub const BLOCK_KIND_COUNT: usize = 34;

impl BlockKind {
    /// Converts a raw grid tag back into its `BlockKind`.
    ///
    /// # Panics
    /// Panics if `id` is not a registered tag. An unknown tag can only come
    /// from a build inconsistency between this enum and the registry table,
    /// never from runtime data.
    pub fn from_id(id: BlockId) -> Self {
        match num::FromPrimitive::from_u8(id) {
            Some(kind) => kind,
            None => panic!("unregistered block tag {id}"),
        }
    }

    /// Returns the compact tag form stored in chunk grids.
    #[inline]
    pub fn id(self) -> BlockId {
        self as BlockId
    }
}
