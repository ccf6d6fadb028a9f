//! # Mineshaft Pass
//!
//! Excavates a branching underground tunnel network in roughly 3% of chunks:
//! a hub room with 3 to 5 corridors radiating from it, each 3 blocks wide and
//! 3 tall, fitted with periodic wood support frames and torches. A corridor
//! may spawn one perpendicular secondary branch. Corridors only ever remove
//! stone and ore; anything else (bedrock, water, dirt, earlier structures)
//! stops that cell, and cells past the chunk edge clip silently.

use crate::voxels::block::BlockKind;
use crate::voxels::chunk::Chunk;
use crate::worldgen::noise_field::{chunk_rng, StreamPurpose};
use crate::worldgen::ores::is_ore;
use crate::worldgen::Generator;

/// Fraction of chunks that host a network.
const SPAWN_CHANCE: f64 = 0.03;
/// Chance that a corridor grows a perpendicular secondary branch.
const SECONDARY_CHANCE: f64 = 0.4;
/// A torch every this many corridor steps.
const TORCH_INTERVAL: i32 = 8;
/// A support frame every this many corridor steps.
const SUPPORT_INTERVAL: i32 = 4;

/// Excavates a mineshaft network into the chunk, if this chunk rolls one.
pub fn excavate(gen: &Generator, chunk: &mut Chunk) {
    let mut rng = chunk_rng(gen.seed, chunk.coord, StreamPurpose::Mineshaft);
    if rng.f64() >= SPAWN_CHANCE {
        return;
    }

    let hub_x = rng.i32(5..11);
    let hub_y = rng.i32(12..36);
    let hub_z = rng.i32(5..11);

    // Hub room, 7 wide, 4 tall, 7 deep.
    for dy in 0..4 {
        for dz in -3..=3 {
            for dx in -3..=3 {
                carve_cell(chunk, hub_x + dx, hub_y + dy, hub_z + dz);
            }
        }
    }
    place_fitting(chunk, hub_x, hub_y, hub_z, BlockKind::Torch);

    let branches = rng.i32(3..=5);
    let mut dirs = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    rng.shuffle(&mut dirs);
    for i in 0..branches {
        let (dx, dz) = dirs[i as usize % 4];
        let len = rng.i32(10..=24);
        let start = (hub_x + dx * 4, hub_y, hub_z + dz * 4);
        dig_corridor(chunk, &mut rng, start, (dx, dz), len, true);
    }
}

/// Digs one corridor and, possibly, its single secondary branch.
fn dig_corridor(
    chunk: &mut Chunk,
    rng: &mut fastrand::Rng,
    (x, y, z): (i32, i32, i32),
    (dx, dz): (i32, i32),
    len: i32,
    allow_secondary: bool,
) {
    // Decide the secondary branch up front so the random stream does not
    // depend on what the carving below happens to hit.
    let secondary = if allow_secondary && rng.f64() < SECONDARY_CHANCE {
        let at = rng.i32(len / 4..(3 * len / 4).max(len / 4 + 1));
        let flip = rng.bool();
        let slen = rng.i32(6..=14);
        Some((at, flip, slen))
    } else {
        None
    };

    // Perpendicular axis, spanning the corridor width.
    let (px, pz) = (-dz, dx);

    for step in 0..len {
        let cx = x + dx * step;
        let cz = z + dz * step;
        for dy in 0..3 {
            for off in -1..=1 {
                carve_cell(chunk, cx + px * off, y + dy, cz + pz * off);
            }
        }
        if step > 0 && step % SUPPORT_INTERVAL == 0 {
            // Plank posts along both walls and a beam across the ceiling.
            for dy in 0..2 {
                place_fitting(chunk, cx + px, y + dy, cz + pz, BlockKind::Planks);
                place_fitting(chunk, cx - px, y + dy, cz - pz, BlockKind::Planks);
            }
            for off in -1..=1 {
                place_fitting(chunk, cx + px * off, y + 2, cz + pz * off, BlockKind::Planks);
            }
        }
        if step > 0 && step % TORCH_INTERVAL == 0 {
            place_fitting(chunk, cx, y, cz, BlockKind::Torch);
        }
    }

    if let Some((at, flip, slen)) = secondary {
        let sdir = if flip { (px, pz) } else { (-px, -pz) };
        let sstart = (x + dx * at + sdir.0 * 2, y, z + dz * at + sdir.1 * 2);
        dig_corridor(chunk, rng, sstart, sdir, slen, false);
    }
}

/// Opens one cell if (and only if) it currently holds stone or ore.
fn carve_cell(chunk: &mut Chunk, x: i32, y: i32, z: i32) {
    let cur = chunk.get_block(x, y, z);
    if cur == BlockKind::Stone.id() || is_ore(cur) {
        chunk.set_block(x, y, z, BlockKind::Air.id());
    }
}

/// Places a fitting (plank, torch) into a cell that carving opened.
fn place_fitting(chunk: &mut Chunk, x: i32, y: i32, z: i32, kind: BlockKind) {
    if chunk.get_block(x, y, z) == BlockKind::Air.id() {
        chunk.set_block(x, y, z, kind.id());
    }
}
