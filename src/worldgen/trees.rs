//! # Tree Placement Pass
//!
//! Runs a Bernoulli trial per column with the biome's tree chance, picks a
//! species from the biome's weighted table, and grows a trunk plus canopy.
//! Leaves only ever overwrite air, so canopies wrap around terrain and each
//! other instead of eating it, and any block falling outside the chunk is
//! silently dropped: neighboring chunks roll their own trees independently,
//! which can cut a trunk at the seam and is accepted.

use crate::voxels::block::{BlockId, BlockKind};
use crate::voxels::chunk::{Chunk, CHUNK_SIZE};
use crate::worldgen::biome::profile;
use crate::worldgen::noise_field::{chunk_rng, StreamPurpose};
use crate::worldgen::{Generator, Heightmap};

/// The tree species the generator can grow.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeSpecies {
    /// Short trunk, round canopy.
    Oak,
    /// Taller trunk, round canopy.
    Birch,
    /// Tall trunk, tapering cone canopy.
    Spruce,
    /// Tallest trunk, wide round canopy.
    Jungle,
}

impl TreeSpecies {
    /// The trunk block for this species.
    pub fn log(self) -> BlockId {
        match self {
            TreeSpecies::Oak => BlockKind::OakLog.id(),
            TreeSpecies::Birch => BlockKind::BirchLog.id(),
            TreeSpecies::Spruce => BlockKind::SpruceLog.id(),
            TreeSpecies::Jungle => BlockKind::JungleLog.id(),
        }
    }

    /// The canopy block for this species.
    pub fn leaves(self) -> BlockId {
        match self {
            TreeSpecies::Oak => BlockKind::OakLeaves.id(),
            TreeSpecies::Birch => BlockKind::BirchLeaves.id(),
            TreeSpecies::Spruce => BlockKind::SpruceLeaves.id(),
            TreeSpecies::Jungle => BlockKind::JungleLeaves.id(),
        }
    }

    /// Inclusive trunk height range.
    fn trunk_range(self) -> (i32, i32) {
        match self {
            TreeSpecies::Oak => (4, 6),
            TreeSpecies::Birch => (5, 7),
            TreeSpecies::Spruce => (6, 9),
            TreeSpecies::Jungle => (8, 12),
        }
    }

    /// Spherical canopy radius; spruce uses a cone instead.
    fn canopy_radius(self) -> i32 {
        match self {
            TreeSpecies::Jungle => 3,
            _ => 2,
        }
    }
}

/// Surfaces a tree may root on.
fn plantable(id: BlockId) -> bool {
    id == BlockKind::Grass.id() || id == BlockKind::Dirt.id() || id == BlockKind::Snow.id()
}

/// Plants trees across the chunk.
pub fn plant(gen: &Generator, chunk: &mut Chunk, heightmap: &Heightmap) {
    let mut rng = chunk_rng(gen.seed, chunk.coord, StreamPurpose::Trees);
    let (ox, oz) = chunk.coord.origin();

    for z in 0..CHUNK_SIZE as i32 {
        for x in 0..CHUNK_SIZE as i32 {
            // One roll per column, drawn unconditionally, keeps the stream
            // aligned no matter what earlier columns placed.
            let roll = rng.f64();
            let p = profile(gen.biome_at(ox + x, oz + z));
            if p.tree_chance <= 0.0 || roll >= p.tree_chance {
                continue;
            }

            let h = heightmap.get(x, z);
            if !plantable(chunk.get_block(x, h, z))
                || chunk.get_block(x, h + 1, z) != BlockKind::Air.id()
            {
                continue;
            }

            let species = pick_species(p.species, &mut rng);
            let (lo, hi) = species.trunk_range();
            let trunk = rng.i32(lo..=hi);
            grow(chunk, x, h + 1, z, species, trunk);
        }
    }
}

/// Weighted draw from a biome's species table.
fn pick_species(table: &[(TreeSpecies, u32)], rng: &mut fastrand::Rng) -> TreeSpecies {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.u32(0..total);
    for (species, weight) in table {
        if roll < *weight {
            return *species;
        }
        roll -= weight;
    }
    table[0].0
}

/// Grows one tree with its base log at (x, base_y, z).
fn grow(chunk: &mut Chunk, x: i32, base_y: i32, z: i32, species: TreeSpecies, trunk: i32) {
    let leaves = species.leaves();
    let top = base_y + trunk - 1;

    if species == TreeSpecies::Spruce {
        // Tapering cone: square leaf rings widening toward the lower canopy.
        place_leaf(chunk, x, top + 1, z, leaves);
        for y in (top - 3)..=top {
            let r = 1 + (top - y) / 2;
            for dz in -r..=r {
                for dx in -r..=r {
                    if r > 1 && dx.abs() == r && dz.abs() == r {
                        continue;
                    }
                    place_leaf(chunk, x + dx, y, z + dz, leaves);
                }
            }
        }
    } else {
        // Leaf sphere around the trunk top.
        let r = species.canopy_radius();
        for dy in -r..=r {
            for dz in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy + dz * dz > r * r + 1 {
                        continue;
                    }
                    place_leaf(chunk, x + dx, top + dy, z + dz, leaves);
                }
            }
        }
    }

    // Trunk last so the canopy never overwrites it.
    for y in base_y..=top {
        let cur = chunk.get_block(x, y, z);
        if cur == BlockKind::Air.id() || cur == leaves {
            chunk.set_block(x, y, z, species.log());
        }
    }
}

fn place_leaf(chunk: &mut Chunk, x: i32, y: i32, z: i32, leaves: BlockId) {
    if chunk.get_block(x, y, z) == BlockKind::Air.id() {
        chunk.set_block(x, y, z, leaves);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::ChunkCoord;

    fn flat_grass_chunk(coord: ChunkCoord, h: i32) -> (Chunk, Heightmap) {
        let mut chunk = Chunk::new(coord);
        let mut map = Heightmap::new();
        for z in 0..CHUNK_SIZE as i32 {
            for x in 0..CHUNK_SIZE as i32 {
                chunk.set_block(x, 0, z, BlockKind::Bedrock.id());
                for y in 1..h {
                    chunk.set_block(x, y, z, BlockKind::Dirt.id());
                }
                chunk.set_block(x, h, z, BlockKind::Grass.id());
                map.set(x, z, h);
            }
        }
        (chunk, map)
    }

    #[test]
    fn leaves_never_replace_solid_blocks() {
        // Grow a tree next to a stone pillar; the pillar must survive.
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        for y in 55..=70 {
            chunk.set_block(9, y, 8, BlockKind::Stone.id());
        }
        grow(&mut chunk, 8, 55, 8, TreeSpecies::Oak, 5);
        for y in 55..=70 {
            assert_eq!(chunk.get_block(9, y, 8), BlockKind::Stone.id());
        }
        // The trunk itself went in.
        assert_eq!(chunk.get_block(8, 55, 8), BlockKind::OakLog.id());
        assert_eq!(chunk.get_block(8, 59, 8), BlockKind::OakLog.id());
    }

    #[test]
    fn canopy_spills_past_the_chunk_edge_are_dropped() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        grow(&mut chunk, 0, 40, 0, TreeSpecies::Jungle, 9);
        // Nothing panicked, and in-bounds leaves exist.
        assert!(chunk
            .blocks()
            .iter()
            .any(|&b| b == BlockKind::JungleLeaves.id()));
    }

    #[test]
    fn spruce_builds_a_cone_with_a_tip() {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        grow(&mut chunk, 8, 30, 8, TreeSpecies::Spruce, 7);
        let top = 30 + 7 - 1;
        assert_eq!(chunk.get_block(8, top + 1, 8), BlockKind::SpruceLeaves.id());
        // Lower canopy ring is wider than the upper one.
        assert_eq!(chunk.get_block(10, top - 3, 8), BlockKind::SpruceLeaves.id());
        assert_eq!(chunk.get_block(10, top, 8), BlockKind::Air.id());
    }

    #[test]
    fn forest_chunks_grow_trees_deterministically() {
        // Find a seed whose (0,0) chunk is forest at the center; then a flat
        // grass chunk should sprout at least one tree with near-certainty
        // given 256 columns at forest odds.
        for seed in 0..200 {
            let gen = Generator::new(seed);
            let biome = gen.biome_at(8, 8);
            if profile(biome).tree_chance < 0.01 {
                continue;
            }
            let run = || {
                let (mut chunk, map) = flat_grass_chunk(ChunkCoord::new(0, 0), 60);
                plant(&gen, &mut chunk, &map);
                chunk
            };
            let a = run();
            assert_eq!(a.blocks(), run().blocks());
            return;
        }
        panic!("no forest-ish seed found in 0..200");
    }
}
