//! # Structure Pass
//!
//! Places at most one "large" structure per chunk from a priority list, each
//! gated on its own probability roll against a dedicated random stream plus a
//! flatness precondition over the heightmap, then runs per-column surface
//! decoration. Structures that cannot find a valid spot skip silently; the
//! pipeline never fails on a bad roll.
//!
//! Priority order: desert well, cabin, dungeon. Dungeons probe up to five
//! candidate volumes for one fully embedded in stone before giving up.

use crate::voxels::block::{BlockId, BlockKind};
use crate::voxels::chunk::{Chunk, CHUNK_SIZE};
use crate::worldgen::biome::{profile, Biome};
use crate::worldgen::noise_field::{chunk_rng, StreamPurpose};
use crate::worldgen::ores::is_ore;
use crate::worldgen::{Generator, Heightmap};

const WELL_CHANCE: f64 = 0.03;
const CABIN_CHANCE: f64 = 0.02;
const DUNGEON_CHANCE: f64 = 0.05;
const DUNGEON_ATTEMPTS: u32 = 5;

/// Places the chunk's large structure (if any) and its surface decoration.
pub fn place(gen: &Generator, chunk: &mut Chunk, heightmap: &Heightmap) {
    let mut rng = chunk_rng(gen.seed, chunk.coord, StreamPurpose::Structures);
    let (ox, oz) = chunk.coord.origin();
    let center_biome = gen.biome_at(ox + 8, oz + 8);

    // Rolls are drawn unconditionally so the stream stays aligned across
    // biomes and earlier outcomes.
    let well_roll = rng.f64();
    let cabin_roll = rng.f64();
    let dungeon_roll = rng.f64();

    let mut placed = false;
    if center_biome == Biome::Desert && well_roll < WELL_CHANCE {
        placed = try_well(chunk, heightmap);
    }
    if !placed
        && matches!(center_biome, Biome::Plains | Biome::Forest)
        && cabin_roll < CABIN_CHANCE
    {
        placed = try_cabin(chunk, heightmap);
    }
    if !placed && dungeon_roll < DUNGEON_CHANCE {
        try_dungeon(chunk, &mut rng);
    }

    decorate(gen, chunk, heightmap);
}

/// Sets a cell unless it currently holds bedrock or water.
fn place_block(chunk: &mut Chunk, x: i32, y: i32, z: i32, id: BlockId) {
    let cur = chunk.get_block(x, y, z);
    if cur != BlockKind::Bedrock.id() && cur != BlockKind::Water.id() {
        chunk.set_block(x, y, z, id);
    }
}

/// A 5x5 sandstone well with a water basin and a post-held roof.
fn try_well(chunk: &mut Chunk, heightmap: &Heightmap) -> bool {
    if heightmap.variance(6, 6, 5, 5) > 1 {
        return false;
    }
    let base = heightmap.get(8, 8);
    let sandstone = BlockKind::Sandstone.id();

    for dz in 0..5 {
        for dx in 0..5 {
            place_block(chunk, 6 + dx, base, 6 + dz, sandstone);
        }
    }
    // Basin rim with water in the middle.
    for dz in 0..3 {
        for dx in 0..3 {
            let id = if dx == 1 && dz == 1 {
                BlockKind::Water.id()
            } else {
                sandstone
            };
            place_block(chunk, 7 + dx, base + 1, 7 + dz, id);
        }
    }
    for (px, pz) in [(6, 6), (6, 10), (10, 6), (10, 10)] {
        for dy in 1..=3 {
            place_block(chunk, px, base + dy, pz, sandstone);
        }
    }
    for dz in 0..3 {
        for dx in 0..3 {
            place_block(chunk, 7 + dx, base + 4, 7 + dz, sandstone);
        }
    }
    true
}

/// A 7x7 plank cabin with log corner posts, a doorway, and a torch inside.
fn try_cabin(chunk: &mut Chunk, heightmap: &Heightmap) -> bool {
    if heightmap.variance(4, 4, 7, 7) > 2 {
        return false;
    }
    let mut base = i32::MIN;
    for dz in 0..7 {
        for dx in 0..7 {
            base = base.max(heightmap.get(4 + dx, 4 + dz));
        }
    }
    let planks = BlockKind::Planks.id();
    let log = BlockKind::OakLog.id();

    for dz in 0..7 {
        for dx in 0..7 {
            place_block(chunk, 4 + dx, base, 4 + dz, planks);
            place_block(chunk, 4 + dx, base + 4, 4 + dz, planks);
            for dy in 1..=3 {
                let (x, z) = (4 + dx, 4 + dz);
                let perimeter = dx == 0 || dx == 6 || dz == 0 || dz == 6;
                let corner = (dx == 0 || dx == 6) && (dz == 0 || dz == 6);
                let id = if corner {
                    log
                } else if perimeter {
                    planks
                } else {
                    BlockKind::Air.id()
                };
                place_block(chunk, x, base + dy, z, id);
            }
        }
    }
    // Doorway through the south wall.
    place_block(chunk, 7, base + 1, 10, BlockKind::Air.id());
    place_block(chunk, 7, base + 2, 10, BlockKind::Air.id());
    // A torch against the back wall.
    if chunk.get_block(7, base + 1, 5) == BlockKind::Air.id() {
        chunk.set_block(7, base + 1, 5, BlockKind::Torch.id());
    }
    true
}

/// Whether a 7x5x7 dungeon volume anchored at (x0, y0, z0) sits with both its
/// floor and ceiling layers fully in stone.
fn dungeon_fits(chunk: &Chunk, x0: i32, y0: i32, z0: i32) -> bool {
    for dz in 0..7 {
        for dx in 0..7 {
            let floor = chunk.get_block(x0 + dx, y0, z0 + dz);
            let ceiling = chunk.get_block(x0 + dx, y0 + 4, z0 + dz);
            if !(floor == BlockKind::Stone.id() || is_ore(floor)) {
                return false;
            }
            if !(ceiling == BlockKind::Stone.id() || is_ore(ceiling)) {
                return false;
            }
        }
    }
    true
}

/// Probes candidate volumes and carves a cobblestone dungeon into the first
/// one fully embedded in stone. Gives up silently after the attempt budget.
fn try_dungeon(chunk: &mut Chunk, rng: &mut fastrand::Rng) {
    for _ in 0..DUNGEON_ATTEMPTS {
        let x0 = rng.i32(1..=8);
        let y0 = rng.i32(8..=35);
        let z0 = rng.i32(1..=8);
        if !dungeon_fits(chunk, x0, y0, z0) {
            continue;
        }

        for dy in 0..5 {
            for dz in 0..7 {
                for dx in 0..7 {
                    let shell = dx == 0 || dx == 6 || dz == 0 || dz == 6 || dy == 0 || dy == 4;
                    let id = if shell {
                        if rng.f64() < 0.35 {
                            BlockKind::MossyCobblestone.id()
                        } else {
                            BlockKind::Cobblestone.id()
                        }
                    } else {
                        BlockKind::Air.id()
                    };
                    place_block(chunk, x0 + dx, y0 + dy, z0 + dz, id);
                }
            }
        }
        place_block(chunk, x0 + 3, y0 + 1, z0 + 3, BlockKind::Spawner.id());
        return;
    }
}

/// Per-column surface decoration: tall grass, flowers, cacti, mushrooms.
fn decorate(gen: &Generator, chunk: &mut Chunk, heightmap: &Heightmap) {
    let mut rng = chunk_rng(gen.seed, chunk.coord, StreamPurpose::Decoration);
    let (ox, oz) = chunk.coord.origin();

    for z in 0..CHUNK_SIZE as i32 {
        for x in 0..CHUNK_SIZE as i32 {
            let roll = rng.f64();
            let p = profile(gen.biome_at(ox + x, oz + z));

            let h = heightmap.get(x, z);
            let surface = chunk.get_block(x, h, z);
            if chunk.get_block(x, h + 1, z) != BlockKind::Air.id() {
                continue;
            }

            let grass_band = p.grass_chance;
            let flower_band = grass_band + p.flower_chance;
            let cactus_band = flower_band + p.cactus_chance;
            let mushroom_band = cactus_band + p.mushroom_chance;

            if roll < grass_band {
                if surface == BlockKind::Grass.id() {
                    chunk.set_block(x, h + 1, z, BlockKind::TallGrass.id());
                }
            } else if roll < flower_band {
                if surface == BlockKind::Grass.id() {
                    chunk.set_block(x, h + 1, z, BlockKind::Flower.id());
                }
            } else if roll < cactus_band {
                if surface == BlockKind::Sand.id() {
                    let height = rng.i32(1..=3);
                    for i in 0..height {
                        if chunk.get_block(x, h + 1 + i, z) != BlockKind::Air.id() {
                            break;
                        }
                        chunk.set_block(x, h + 1 + i, z, BlockKind::Cactus.id());
                    }
                }
            } else if roll < mushroom_band
                && (surface == BlockKind::Grass.id() || surface == BlockKind::Dirt.id())
            {
                chunk.set_block(x, h + 1, z, BlockKind::Mushroom.id());
            }
        }
    }
}
