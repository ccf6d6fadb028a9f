//! # Lighting Module
//!
//! Computes the two per-cell light channels: sunlight, seeded by a top-down
//! column scan, and block light, seeded by emissive blocks. Both channels
//! then spread with the same breadth-first flood fill, losing one level per
//! orthogonal step and stopping at opaque cells or level zero. A cell's
//! final level is the max over every source that reaches it, which the
//! worklist gives for free: a cell is only re-queued when something raised
//! it.
//!
//! The fill runs over one chunk at a time. Light entering from loaded
//! neighbors is folded in as extra seeds read from boundary snapshots, so
//! propagation crosses at most one chunk boundary per lighting pass; deeper
//! corrections land when the neighbor itself is next relit. Recursion is
//! avoided entirely: the worklist is an explicit queue, so a cave system lit
//! wall to wall cannot overflow the stack.

use std::collections::VecDeque;

use cgmath::Point3;

use crate::voxels::block::{self, BlockId};
use crate::voxels::chunk::{
    Chunk, ChunkCoord, Neighborhood, CHUNK_SIZE, CHUNK_VOLUME, WORLD_HEIGHT,
};
use crate::voxels::world::World;

/// Maximum light level of either channel.
pub const MAX_LIGHT: u8 = 15;

const SIZE: i32 = CHUNK_SIZE as i32;
const HEIGHT: i32 = WORLD_HEIGHT as i32;

#[inline]
fn idx(x: i32, y: i32, z: i32) -> usize {
    ((y as usize * CHUNK_SIZE) + z as usize) * CHUNK_SIZE + x as usize
}

#[inline]
fn in_chunk(x: i32, y: i32, z: i32) -> bool {
    x >= 0 && x < SIZE && y >= 0 && y < HEIGHT && z >= 0 && z < SIZE
}

/// Which nibble of the packed light byte a fill writes.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Channel {
    Sun,
    Block,
}

#[inline]
fn read(light: &[u8], channel: Channel, x: i32, y: i32, z: i32) -> u8 {
    let v = light[idx(x, y, z)];
    match channel {
        Channel::Sun => v & 0x0F,
        Channel::Block => v >> 4,
    }
}

#[inline]
fn write(light: &mut [u8], channel: Channel, x: i32, y: i32, z: i32, level: u8) {
    let i = idx(x, y, z);
    let level = level.min(MAX_LIGHT);
    match channel {
        Channel::Sun => light[i] = (light[i] & 0xF0) | level,
        Channel::Block => light[i] = (light[i] & 0x0F) | (level << 4),
    }
}

/// Computes the full packed light grid for one chunk's block grid, folding in
/// boundary light from whichever neighbors are present.
pub fn compute_light(blocks: &[BlockId], hood: &Neighborhood) -> Vec<u8> {
    debug_assert_eq!(blocks.len(), CHUNK_VOLUME);
    let mut light = vec![0u8; CHUNK_VOLUME];
    let mut queue: VecDeque<Point3<i32>> = VecDeque::new();

    seed_sunlight(blocks, &mut light, &mut queue);
    seed_boundary(blocks, &mut light, &mut queue, hood, Channel::Sun);
    flood(blocks, &mut light, &mut queue, Channel::Sun);

    seed_emissive(blocks, &mut light, &mut queue);
    seed_boundary(blocks, &mut light, &mut queue, hood, Channel::Block);
    flood(blocks, &mut light, &mut queue, Channel::Block);

    light
}

/// Recomputes one chunk's light in place (no neighbors), for freshly
/// generated or restored chunks lit before their neighbors exist.
pub fn light_chunk(chunk: &mut Chunk, hood: &Neighborhood) {
    let light = compute_light(chunk.blocks(), hood);
    chunk.replace_light(light);
}

/// Relights a loaded chunk against its current neighbors.
///
/// Snapshots are taken one lock at a time; the write-back is a single short
/// write lock at the end.
pub fn relight_chunk(world: &World, coord: ChunkCoord) {
    if let Some(handle) = world.chunk_at(coord) {
        let hood = world.neighborhood(coord);
        let blocks = handle.get().blocks().to_vec();
        let light = compute_light(&blocks, &hood);
        handle.get_mut().replace_light(light);
    }
}

/// Top-down column scan: full sunlight through transparent cells until the
/// first opaque cell, zero below. Every lit cell joins the worklist so the
/// flood can bleed sideways into overhangs and caves.
fn seed_sunlight(blocks: &[BlockId], light: &mut [u8], queue: &mut VecDeque<Point3<i32>>) {
    for z in 0..SIZE {
        for x in 0..SIZE {
            for y in (0..HEIGHT).rev() {
                if block::is_opaque(blocks[idx(x, y, z)]) {
                    break;
                }
                write(light, Channel::Sun, x, y, z, MAX_LIGHT);
                queue.push_back(Point3::new(x, y, z));
            }
        }
    }
}

/// Seeds every cell whose block type emits light.
fn seed_emissive(blocks: &[BlockId], light: &mut [u8], queue: &mut VecDeque<Point3<i32>>) {
    for y in 0..HEIGHT {
        for z in 0..SIZE {
            for x in 0..SIZE {
                let emission = block::emission(blocks[idx(x, y, z)]);
                if emission > 0 {
                    write(light, Channel::Block, x, y, z, emission);
                    queue.push_back(Point3::new(x, y, z));
                }
            }
        }
    }
}

/// Seeds the chunk's edge cells from neighbor boundary light. A neighbor cell
/// at level `v` can push `v - 1` into the adjacent cell here.
fn seed_boundary(
    blocks: &[BlockId],
    light: &mut [u8],
    queue: &mut VecDeque<Point3<i32>>,
    hood: &Neighborhood,
    channel: Channel,
) {
    let outside = |x: i32, y: i32, z: i32| match channel {
        Channel::Sun => hood.sunlight(x, y, z),
        Channel::Block => hood.block_light(x, y, z),
    };
    let mut seed = |x: i32, y: i32, z: i32, from: u8, light: &mut [u8]| {
        if from <= 1 || block::is_opaque(blocks[idx(x, y, z)]) {
            return;
        }
        let incoming = from - 1;
        if incoming > read(light, channel, x, y, z) {
            write(light, channel, x, y, z, incoming);
            queue.push_back(Point3::new(x, y, z));
        }
    };

    for y in 0..HEIGHT {
        for z in 0..SIZE {
            seed(0, y, z, outside(-1, y, z), light);
            seed(SIZE - 1, y, z, outside(SIZE, y, z), light);
        }
        for x in 0..SIZE {
            seed(x, y, 0, outside(x, y, -1), light);
            seed(x, y, SIZE - 1, outside(x, y, SIZE), light);
        }
    }
}

const DIRS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Breadth-first propagation within the chunk. Levels drop by one per
/// orthogonal step; opaque cells and the chunk's own bounds stop the fill
/// (cells beyond the vertical extremes count as opaque).
fn flood(
    blocks: &[BlockId],
    light: &mut [u8],
    queue: &mut VecDeque<Point3<i32>>,
    channel: Channel,
) {
    while let Some(Point3 { x, y, z }) = queue.pop_front() {
        let level = read(light, channel, x, y, z);
        if level <= 1 {
            continue;
        }
        let next = level - 1;
        for (dx, dy, dz) in DIRS {
            let (nx, ny, nz) = (x + dx, y + dy, z + dz);
            if !in_chunk(nx, ny, nz) || block::is_opaque(blocks[idx(nx, ny, nz)]) {
                continue;
            }
            if next > read(light, channel, nx, ny, nz) {
                write(light, channel, nx, ny, nz, next);
                queue.push_back(Point3::new(nx, ny, nz));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockKind;

    fn empty_chunk() -> Chunk {
        Chunk::new(ChunkCoord::new(0, 0))
    }

    #[test]
    fn open_sky_is_fully_sunlit_and_slabs_shadow() {
        let mut chunk = empty_chunk();
        for z in 0..SIZE {
            for x in 0..SIZE {
                chunk.set_block(x, 40, z, BlockKind::Stone.id());
            }
        }
        light_chunk(&mut chunk, &Neighborhood::empty());

        // Above the slab: full sun straight down the open column.
        for y in 41..HEIGHT {
            assert_eq!(chunk.sunlight(8, y, 8), MAX_LIGHT);
        }
        // Below a full slab with no sideways route: darkness.
        for y in 0..40 {
            assert_eq!(chunk.sunlight(8, y, 8), 0);
        }
    }

    #[test]
    fn sunlight_bleeds_sideways_under_an_overhang() {
        let mut chunk = empty_chunk();
        // A half-slab roof over x < 8 at y = 40.
        for z in 0..SIZE {
            for x in 0..8 {
                chunk.set_block(x, 40, z, BlockKind::Stone.id());
            }
        }
        light_chunk(&mut chunk, &Neighborhood::empty());

        // Under the open half: 15. One step under the roof: 14, then 13...
        assert_eq!(chunk.sunlight(8, 39, 8), MAX_LIGHT);
        assert_eq!(chunk.sunlight(7, 39, 8), 14);
        assert_eq!(chunk.sunlight(6, 39, 8), 13);
        assert_eq!(chunk.sunlight(5, 39, 8), 12);
    }

    /// Builds a sealed 3x3x3 air pocket in stone, centered at (7, 22, 7).
    fn pocket_chunk() -> Chunk {
        let mut chunk = empty_chunk();
        for y in 20..=24 {
            for z in 5..=9 {
                for x in 5..=9 {
                    chunk.set_block(x, y, z, BlockKind::Stone.id());
                }
            }
        }
        for y in 21..=23 {
            for z in 6..=8 {
                for x in 6..=8 {
                    chunk.set_block(x, y, z, BlockKind::Air.id());
                }
            }
        }
        chunk
    }

    #[test]
    fn torch_in_sealed_pocket_lights_it_without_sun() {
        let mut chunk = pocket_chunk();
        chunk.set_block(7, 22, 7, BlockKind::Torch.id());
        light_chunk(&mut chunk, &Neighborhood::empty());

        assert_eq!(chunk.block_light(7, 22, 7), 14);
        assert_eq!(chunk.block_light(6, 22, 7), 13);
        assert_eq!(chunk.block_light(6, 22, 6), 12);
        assert_eq!(chunk.sunlight(7, 22, 7), 0);
        // Light stays inside the stone shell.
        assert_eq!(chunk.block_light(4, 22, 7), 0);
    }

    #[test]
    fn unsealing_the_pocket_readmits_sunlight() {
        let mut chunk = pocket_chunk();
        light_chunk(&mut chunk, &Neighborhood::empty());
        assert_eq!(chunk.sunlight(7, 22, 7), 0);

        // Break the ceiling cell sealing the pocket and relight.
        chunk.set_block(7, 24, 7, BlockKind::Air.id());
        light_chunk(&mut chunk, &Neighborhood::empty());

        // Straight shaft: full sun at the opening and down the column.
        assert_eq!(chunk.sunlight(7, 24, 7), MAX_LIGHT);
        assert_eq!(chunk.sunlight(7, 22, 7), MAX_LIGHT);
        // One orthogonal step inward: one level down.
        assert_eq!(chunk.sunlight(6, 22, 7), 14);
        assert_eq!(chunk.sunlight(6, 22, 6), 13);
    }

    #[test]
    fn boundary_light_enters_from_a_neighbor() {
        // Neighbor to the east holds a glowstone against the shared face.
        let mut east = Chunk::new(ChunkCoord::new(1, 0));
        east.set_block(0, 30, 8, BlockKind::Glowstone.id());
        light_chunk(&mut east, &Neighborhood::empty());
        assert_eq!(east.block_light(1, 30, 8), 14);

        let mut center = empty_chunk();
        let hood = Neighborhood {
            east: Some(east.snapshot()),
            west: None,
            south: None,
            north: None,
        };
        light_chunk(&mut center, &hood);

        // The neighbor's boundary cell held emission 15; stepping across the
        // seam costs one, then one per step onward.
        assert_eq!(center.block_light(15, 30, 8), 14);
        assert_eq!(center.block_light(14, 30, 8), 13);
    }

    #[test]
    fn levels_stay_within_range_everywhere() {
        let mut chunk = pocket_chunk();
        chunk.set_block(7, 22, 7, BlockKind::Glowstone.id());
        light_chunk(&mut chunk, &Neighborhood::empty());
        for &packed in chunk.light() {
            assert!(packed & 0x0F <= 15);
            assert!(packed >> 4 <= 15);
        }
    }
}
