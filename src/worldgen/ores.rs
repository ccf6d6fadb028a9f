//! # Ore Scattering Pass
//!
//! Places ore veins into remaining stone. Each ore tier has its own depth
//! band, attempt count, and vein size; a vein is a short random walk that
//! converts stone cells along its path. Rarity falls and value rises with
//! depth, so diamond sits near the floor with few attempts while coal is
//! common through most of the column.

use crate::voxels::block::{BlockId, BlockKind};
use crate::voxels::chunk::{Chunk, CHUNK_SIZE};
use crate::worldgen::noise_field::{chunk_rng, StreamPurpose};
use crate::worldgen::Generator;

/// One ore tier's placement parameters.
struct OreTier {
    ore: BlockKind,
    /// Vein starts rolled per chunk.
    attempts: u32,
    /// Random-walk steps per vein.
    vein_size: u32,
    /// Inclusive lower bound of the spawn band.
    min_y: i32,
    /// Exclusive upper bound of the spawn band.
    max_y: i32,
}

static TIERS: [OreTier; 5] = [
    OreTier {
        ore: BlockKind::CoalOre,
        attempts: 10,
        vein_size: 12,
        min_y: 20,
        max_y: 110,
    },
    OreTier {
        ore: BlockKind::IronOre,
        attempts: 7,
        vein_size: 8,
        min_y: 5,
        max_y: 70,
    },
    OreTier {
        ore: BlockKind::GoldOre,
        attempts: 3,
        vein_size: 6,
        min_y: 5,
        max_y: 40,
    },
    OreTier {
        ore: BlockKind::RedstoneOre,
        attempts: 4,
        vein_size: 6,
        min_y: 5,
        max_y: 24,
    },
    OreTier {
        ore: BlockKind::DiamondOre,
        attempts: 2,
        vein_size: 5,
        min_y: 5,
        max_y: 16,
    },
];

/// Scatters every ore tier into the chunk.
pub fn scatter(gen: &Generator, chunk: &mut Chunk) {
    let mut rng = chunk_rng(gen.seed, chunk.coord, StreamPurpose::Ores);
    let stone = BlockKind::Stone.id();

    for tier in TIERS.iter() {
        for _ in 0..tier.attempts {
            let mut x = rng.i32(0..CHUNK_SIZE as i32);
            let mut y = rng.i32(tier.min_y..tier.max_y);
            let mut z = rng.i32(0..CHUNK_SIZE as i32);

            for _ in 0..tier.vein_size {
                if chunk.get_block(x, y, z) == stone {
                    chunk.set_block(x, y, z, tier.ore.id());
                }
                // Wander one step along a random axis; steps off the chunk
                // simply stop placing until the walk wanders back.
                match rng.usize(0..3) {
                    0 => x += if rng.bool() { 1 } else { -1 },
                    1 => y += if rng.bool() { 1 } else { -1 },
                    _ => z += if rng.bool() { 1 } else { -1 },
                }
            }
        }
    }
}

/// Whether a tag is one of the ore blocks.
pub fn is_ore(id: BlockId) -> bool {
    matches!(
        BlockKind::from_id(id),
        BlockKind::CoalOre
            | BlockKind::IronOre
            | BlockKind::GoldOre
            | BlockKind::RedstoneOre
            | BlockKind::DiamondOre
    )
}
