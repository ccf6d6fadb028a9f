//! # Surface Fill Pass
//!
//! The first generation pass: turns the height noise and biome table into a
//! filled column of strata. Every column ends up as bedrock, a contiguous
//! solid mass, one surface block, then water up to sea level or air; later
//! passes carve into and decorate this base.

use crate::voxels::block::{BlockId, BlockKind};
use crate::voxels::chunk::{Chunk, CHUNK_SIZE, SEA_LEVEL, WORLD_HEIGHT};
use crate::worldgen::biome::{profile, Biome};
use crate::worldgen::{Generator, Heightmap};

/// Mountain surfaces at or above this height get snow instead of bare stone.
const SNOW_LINE: i32 = 92;

/// Depth of the biome subsurface layer between stone and the surface block.
const SUBSURFACE_DEPTH: i32 = 3;

/// Fills every column of the chunk and returns the resulting heightmap.
pub fn fill(gen: &Generator, chunk: &mut Chunk) -> Heightmap {
    let (ox, oz) = chunk.coord.origin();
    let mut heightmap = Heightmap::new();

    for z in 0..CHUNK_SIZE as i32 {
        for x in 0..CHUNK_SIZE as i32 {
            let (wx, wz) = (ox + x, oz + z);
            let biome = gen.biome_at(wx, wz);
            let p = profile(biome);

            let n = gen.height_noise.sample_norm(wx as f64, wz as f64);
            let span = (p.height_max - p.height_min) as f64;
            let h = (p.height_min + (n * span * p.amplitude).round() as i32)
                .clamp(1, WORLD_HEIGHT as i32 - 2);
            heightmap.set(x, z, h);

            let surface = surface_block(biome, h, p.surface, p.underwater);

            chunk.set_block(x, 0, z, BlockKind::Bedrock.id());
            for y in 1..(h - SUBSURFACE_DEPTH) {
                chunk.set_block(x, y, z, BlockKind::Stone.id());
            }
            for y in (h - SUBSURFACE_DEPTH).max(1)..h {
                chunk.set_block(x, y, z, p.subsurface);
            }
            chunk.set_block(x, h, z, surface);
            if h < SEA_LEVEL {
                for y in (h + 1)..=SEA_LEVEL {
                    chunk.set_block(x, y, z, BlockKind::Water.id());
                }
            }
        }
    }

    heightmap
}

fn surface_block(biome: Biome, height: i32, surface: BlockId, underwater: BlockId) -> BlockId {
    if height < SEA_LEVEL {
        underwater
    } else if biome == Biome::Mountains && height >= SNOW_LINE {
        BlockKind::Snow.id()
    } else {
        surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block;
    use crate::voxels::chunk::ChunkCoord;

    /// Scans one column bottom-up and asserts the stratum order the pass
    /// guarantees: bedrock, contiguous solid, at most one surface block,
    /// then water-then-air or air only.
    fn assert_column_well_formed(chunk: &Chunk, x: i32, z: i32) {
        assert_eq!(chunk.get_block(x, 0, z), BlockKind::Bedrock.id());

        #[derive(PartialEq, Debug)]
        enum Phase {
            Solid,
            Water,
            Air,
        }
        let mut phase = Phase::Solid;
        for y in 1..WORLD_HEIGHT as i32 {
            let id = chunk.get_block(x, y, z);
            let next = if id == BlockKind::Air.id() {
                Phase::Air
            } else if id == BlockKind::Water.id() {
                Phase::Water
            } else {
                assert!(block::is_solid(id), "unexpected non-solid {id} at y={y}");
                Phase::Solid
            };
            match (&phase, &next) {
                (Phase::Solid, _) => phase = next,
                (Phase::Water, Phase::Water) | (Phase::Water, Phase::Air) => phase = next,
                (Phase::Air, Phase::Air) => {}
                (from, to) => panic!("column ({x},{z}) went {from:?} -> {to:?} at y={y}"),
            }
        }
        assert_eq!(phase, Phase::Air, "column ({x},{z}) never reached open air");
    }

    #[test]
    fn every_column_is_well_formed() {
        let gen = Generator::new(42);
        for coord in [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(5, -2),
            ChunkCoord::new(-7, 9),
        ] {
            let mut chunk = Chunk::new(coord);
            fill(&gen, &mut chunk);
            for z in 0..CHUNK_SIZE as i32 {
                for x in 0..CHUNK_SIZE as i32 {
                    assert_column_well_formed(&chunk, x, z);
                }
            }
        }
    }

    #[test]
    fn underwater_columns_are_flooded_to_sea_level() {
        let gen = Generator::new(42);
        // Search a few chunks for a column below sea level; ocean biomes make
        // one near-certain within a small area.
        for cz in -4..4 {
            for cx in -4..4 {
                let mut chunk = Chunk::new(ChunkCoord::new(cx, cz));
                let map = fill(&gen, &mut chunk);
                for z in 0..CHUNK_SIZE as i32 {
                    for x in 0..CHUNK_SIZE as i32 {
                        let h = map.get(x, z);
                        if h < SEA_LEVEL {
                            assert_eq!(chunk.get_block(x, h + 1, z), BlockKind::Water.id());
                            assert_eq!(chunk.get_block(x, SEA_LEVEL, z), BlockKind::Water.id());
                            assert_eq!(
                                chunk.get_block(x, SEA_LEVEL + 1, z),
                                BlockKind::Air.id()
                            );
                            return;
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn heightmap_matches_grid() {
        let gen = Generator::new(99);
        let mut chunk = Chunk::new(ChunkCoord::new(1, 1));
        let map = fill(&gen, &mut chunk);
        for z in 0..CHUNK_SIZE as i32 {
            for x in 0..CHUNK_SIZE as i32 {
                let h = map.get(x, z);
                let at = chunk.get_block(x, h, z);
                assert_ne!(at, BlockKind::Air.id());
                assert_ne!(at, BlockKind::Water.id());
                let above = chunk.get_block(x, h + 1, z);
                assert!(
                    above == BlockKind::Air.id() || above == BlockKind::Water.id(),
                    "cell above surface at ({x},{z}) was {above}"
                );
            }
        }
    }
}
