//! # Cave Carving Pass
//!
//! Removes stone along two 3D noise patterns: "cheese" blobs where a single
//! field runs high, and "spaghetti" tunnels where two independent fields both
//! sit near zero. Only stone is ever carved; bedrock, water, and everything a
//! later pass might care about are untouched because the pass checks the
//! current tag before writing. This pass works from the raw grid only and
//! never consults the heightmap.

use crate::voxels::block::BlockKind;
use crate::voxels::chunk::{Chunk, CHUNK_SIZE, WORLD_HEIGHT};
use crate::worldgen::Generator;

/// Cheese-field values above this open a blob.
const CHEESE_THRESHOLD: f64 = 0.62;
/// Both tunnel fields must be within this of zero to open a tunnel.
const TUNNEL_THRESHOLD: f64 = 0.07;
/// Nothing below this height is carved, keeping the world floor sealed.
const CARVE_FLOOR: i32 = 5;

/// Carves caves into the chunk.
pub fn carve(gen: &Generator, chunk: &mut Chunk) {
    let (ox, oz) = chunk.coord.origin();
    let stone = BlockKind::Stone.id();
    let water = BlockKind::Water.id();

    for y in CARVE_FLOOR..WORLD_HEIGHT as i32 - 1 {
        for z in 0..CHUNK_SIZE as i32 {
            for x in 0..CHUNK_SIZE as i32 {
                if chunk.get_block(x, y, z) != stone {
                    continue;
                }
                // Leave a stone lid under standing water.
                if chunk.get_block(x, y + 1, z) == water {
                    continue;
                }

                let (wx, wy, wz) = ((ox + x) as f64, y as f64, (oz + z) as f64);
                let cheese = gen.cheese_noise.sample(wx, wy, wz) > CHEESE_THRESHOLD;
                let tunnel = gen.tunnel_a.sample(wx, wy, wz).abs() < TUNNEL_THRESHOLD
                    && gen.tunnel_b.sample(wx, wy, wz).abs() < TUNNEL_THRESHOLD;
                if cheese || tunnel {
                    chunk.set_block(x, y, z, BlockKind::Air.id());
                }
            }
        }
    }
}
