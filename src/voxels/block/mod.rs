//! # Block Module
//!
//! This module provides the block data model: the compact tag type stored in
//! chunk grids, the [`BlockKind`] enumeration, and the read-only metadata
//! registry that the generation, lighting, and meshing passes consult.
//!
//! ## Registry Design
//!
//! Per-type metadata lives in a fixed-size array indexed by the tag's integer
//! value rather than a hash map. Lighting and meshing look blocks up once per
//! cell, so the lookup must be a bounds-checked array read and nothing more.
//! Looking up a tag with no registry entry is a build inconsistency and
//! panics; it is never a runtime condition.

use phf::phf_map;

pub mod block_kind;
pub mod block_side;

pub use block_kind::{BlockKind, BLOCK_KIND_COUNT};
pub use block_side::BlockSide;

/// The underlying integer type used to represent block types in the world
/// grids and in serialized chunk data.
pub type BlockId = u8;

/// How the mesher turns a block into geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshShape {
    /// No geometry at all (air).
    None,
    /// A full cube, eligible for greedy merging.
    Cube,
    /// Two crossed quads (foliage, torches); bypasses greedy merging.
    Cross,
    /// A liquid cell with a lowered top surface; bypasses greedy merging.
    Liquid,
}

/// The tool class that breaks a block at full speed. Gameplay-facing only;
/// the core carries it as registry metadata.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToolKind {
    /// Breakable by hand at full speed.
    None,
    /// Stone-family blocks and ores.
    Pickaxe,
    /// Earth, sand, gravel, snow.
    Shovel,
    /// Logs and planks.
    Axe,
}

/// Immutable per-type block metadata.
///
/// One entry per [`BlockKind`], stored in [`REGISTRY`] at the kind's
/// discriminant index. World cells carry only the tag; everything else about
/// a block type is looked up here.
#[derive(Debug)]
pub struct BlockInfo {
    /// Lowercase identifier, unique across the registry.
    pub name: &'static str,
    /// Whether the block stops light propagation.
    pub opaque: bool,
    /// Whether the block participates in collision.
    pub solid: bool,
    /// Emitted block-light level, 0..=15.
    pub emission: u8,
    /// Relative break time; `f32::INFINITY` marks an unbreakable block.
    pub hardness: f32,
    /// Tool class required to break the block at full speed.
    pub tool: ToolKind,
    /// How the mesher renders this block.
    pub shape: MeshShape,
    /// Texture-atlas tile per face, indexed by [`BlockSide`] discriminant.
    pub textures: [u8; 6],
}

const fn cube(
    name: &'static str,
    hardness: f32,
    tool: ToolKind,
    textures: [u8; 6],
) -> BlockInfo {
    BlockInfo {
        name,
        opaque: true,
        solid: true,
        emission: 0,
        hardness,
        tool,
        shape: MeshShape::Cube,
        textures,
    }
}

const fn cross(name: &'static str, emission: u8, tile: u8) -> BlockInfo {
    BlockInfo {
        name,
        opaque: false,
        solid: false,
        emission,
        hardness: 0.0,
        tool: ToolKind::None,
        shape: MeshShape::Cross,
        textures: [tile; 6],
    }
}

/// The block metadata registry, indexed by tag.
///
/// Entry order must match the [`BlockKind`] discriminants exactly; the tests
/// below cross-check the two.
pub static REGISTRY: [BlockInfo; BLOCK_KIND_COUNT] = [
    // Air
    BlockInfo {
        name: "air",
        opaque: false,
        solid: false,
        emission: 0,
        hardness: 0.0,
        tool: ToolKind::None,
        shape: MeshShape::None,
        textures: [0; 6],
    },
    cube("stone", 1.5, ToolKind::Pickaxe, [0, 0, 0, 0, 0, 0]),
    cube("cobblestone", 2.0, ToolKind::Pickaxe, [1, 1, 1, 1, 1, 1]),
    cube("mossy_cobblestone", 2.0, ToolKind::Pickaxe, [2, 2, 2, 2, 2, 2]),
    cube("bedrock", f32::INFINITY, ToolKind::Pickaxe, [3, 3, 3, 3, 3, 3]),
    cube("dirt", 0.5, ToolKind::Shovel, [4, 4, 4, 4, 4, 4]),
    // Grass uses a grassy top, dirt bottom, and blended sides.
    cube("grass", 0.6, ToolKind::Shovel, [6, 6, 5, 4, 6, 6]),
    cube("sand", 0.5, ToolKind::Shovel, [7, 7, 7, 7, 7, 7]),
    cube("sandstone", 0.8, ToolKind::Pickaxe, [8, 8, 8, 8, 8, 8]),
    cube("gravel", 0.6, ToolKind::Shovel, [9, 9, 9, 9, 9, 9]),
    cube("snow", 0.2, ToolKind::Shovel, [10, 10, 10, 10, 10, 10]),
    cube("ice", 0.5, ToolKind::Pickaxe, [11, 11, 11, 11, 11, 11]),
    // Water
    BlockInfo {
        name: "water",
        opaque: false,
        solid: false,
        emission: 0,
        hardness: f32::INFINITY,
        tool: ToolKind::None,
        shape: MeshShape::Liquid,
        textures: [12; 6],
    },
    cube("coal_ore", 3.0, ToolKind::Pickaxe, [13, 13, 13, 13, 13, 13]),
    cube("iron_ore", 3.0, ToolKind::Pickaxe, [14, 14, 14, 14, 14, 14]),
    cube("gold_ore", 3.0, ToolKind::Pickaxe, [15, 15, 15, 15, 15, 15]),
    cube("redstone_ore", 3.0, ToolKind::Pickaxe, [16, 16, 16, 16, 16, 16]),
    cube("diamond_ore", 3.0, ToolKind::Pickaxe, [17, 17, 17, 17, 17, 17]),
    cube("oak_log", 2.0, ToolKind::Axe, [18, 18, 19, 19, 18, 18]),
    cube("oak_leaves", 0.2, ToolKind::None, [20, 20, 20, 20, 20, 20]),
    cube("birch_log", 2.0, ToolKind::Axe, [21, 21, 22, 22, 21, 21]),
    cube("birch_leaves", 0.2, ToolKind::None, [23, 23, 23, 23, 23, 23]),
    cube("spruce_log", 2.0, ToolKind::Axe, [24, 24, 25, 25, 24, 24]),
    cube("spruce_leaves", 0.2, ToolKind::None, [26, 26, 26, 26, 26, 26]),
    cube("jungle_log", 2.0, ToolKind::Axe, [27, 27, 28, 28, 27, 27]),
    cube("jungle_leaves", 0.2, ToolKind::None, [29, 29, 29, 29, 29, 29]),
    cube("planks", 2.0, ToolKind::Axe, [30, 30, 30, 30, 30, 30]),
    cross("torch", 14, 31),
    // Glowstone is an opaque cube that also emits light.
    BlockInfo {
        name: "glowstone",
        opaque: true,
        solid: true,
        emission: 15,
        hardness: 0.3,
        tool: ToolKind::Pickaxe,
        shape: MeshShape::Cube,
        textures: [32; 6],
    },
    cross("tall_grass", 0, 33),
    cross("flower", 0, 34),
    cube("cactus", 0.4, ToolKind::None, [35, 35, 36, 36, 35, 35]),
    cross("mushroom", 0, 37),
    cube("spawner", 5.0, ToolKind::Pickaxe, [38, 38, 38, 38, 38, 38]),
];

/// Name-to-tag lookup for tooling, persistence debugging, and tests.
pub static BLOCK_BY_NAME: phf::Map<&'static str, BlockId> = phf_map! {
    "air" => BlockKind::Air as BlockId,
    "stone" => BlockKind::Stone as BlockId,
    "cobblestone" => BlockKind::Cobblestone as BlockId,
    "mossy_cobblestone" => BlockKind::MossyCobblestone as BlockId,
    "bedrock" => BlockKind::Bedrock as BlockId,
    "dirt" => BlockKind::Dirt as BlockId,
    "grass" => BlockKind::Grass as BlockId,
    "sand" => BlockKind::Sand as BlockId,
    "sandstone" => BlockKind::Sandstone as BlockId,
    "gravel" => BlockKind::Gravel as BlockId,
    "snow" => BlockKind::Snow as BlockId,
    "ice" => BlockKind::Ice as BlockId,
    "water" => BlockKind::Water as BlockId,
    "coal_ore" => BlockKind::CoalOre as BlockId,
    "iron_ore" => BlockKind::IronOre as BlockId,
    "gold_ore" => BlockKind::GoldOre as BlockId,
    "redstone_ore" => BlockKind::RedstoneOre as BlockId,
    "diamond_ore" => BlockKind::DiamondOre as BlockId,
    "oak_log" => BlockKind::OakLog as BlockId,
    "oak_leaves" => BlockKind::OakLeaves as BlockId,
    "birch_log" => BlockKind::BirchLog as BlockId,
    "birch_leaves" => BlockKind::BirchLeaves as BlockId,
    "spruce_log" => BlockKind::SpruceLog as BlockId,
    "spruce_leaves" => BlockKind::SpruceLeaves as BlockId,
    "jungle_log" => BlockKind::JungleLog as BlockId,
    "jungle_leaves" => BlockKind::JungleLeaves as BlockId,
    "planks" => BlockKind::Planks as BlockId,
    "torch" => BlockKind::Torch as BlockId,
    "glowstone" => BlockKind::Glowstone as BlockId,
    "tall_grass" => BlockKind::TallGrass as BlockId,
    "flower" => BlockKind::Flower as BlockId,
    "cactus" => BlockKind::Cactus as BlockId,
    "mushroom" => BlockKind::Mushroom as BlockId,
    "spawner" => BlockKind::Spawner as BlockId,
};

/// Looks up the metadata for a block tag.
///
/// # Panics
/// Panics if `id` has no registry entry; see the module docs for why this is
/// a loud failure rather than an `Option`.
#[inline]
pub fn info(id: BlockId) -> &'static BlockInfo {
    &REGISTRY[id as usize]
}

/// Whether a tag blocks light propagation.
#[inline]
pub fn is_opaque(id: BlockId) -> bool {
    info(id).opaque
}

/// Whether a tag participates in collision. O(1) and side-effect free, as the
/// physics collaborator requires.
#[inline]
pub fn is_solid(id: BlockId) -> bool {
    info(id).solid
}

/// The block-light level a tag emits, 0 for most blocks.
#[inline]
pub fn emission(id: BlockId) -> u8 {
    info(id).emission
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_matches_enum_order() {
        for id in 0..BLOCK_KIND_COUNT as u8 {
            let kind = BlockKind::from_id(id);
            let entry = info(id);
            // Spot-check a few known pairings plus the structural invariants.
            match kind {
                BlockKind::Air => assert_eq!(entry.name, "air"),
                BlockKind::Bedrock => assert_eq!(entry.name, "bedrock"),
                BlockKind::Water => assert_eq!(entry.name, "water"),
                BlockKind::Spawner => assert_eq!(entry.name, "spawner"),
                _ => {}
            }
            assert!(entry.emission <= 15);
        }
    }

    #[test]
    fn name_map_round_trips() {
        for (name, id) in BLOCK_BY_NAME.entries() {
            assert_eq!(info(*id).name, *name);
        }
        assert_eq!(BLOCK_BY_NAME.len(), BLOCK_KIND_COUNT);
    }

    #[test]
    fn light_sources_are_registered() {
        assert_eq!(emission(BlockKind::Torch.id()), 14);
        assert_eq!(emission(BlockKind::Glowstone.id()), 15);
        assert_eq!(emission(BlockKind::Stone.id()), 0);
    }

    #[test]
    fn air_and_water_do_not_block_light() {
        assert!(!is_opaque(BlockKind::Air.id()));
        assert!(!is_opaque(BlockKind::Water.id()));
        assert!(is_opaque(BlockKind::Stone.id()));
    }

    #[test]
    #[should_panic]
    fn unregistered_tag_fails_loudly() {
        info(BLOCK_KIND_COUNT as BlockId);
    }
}
