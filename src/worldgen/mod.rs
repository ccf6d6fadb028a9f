//! # World Generation Module
//!
//! The deterministic terrain pipeline. A [`Generator`] owns the seeded noise
//! fields and the biome classifier, and runs a fixed sequence of passes over
//! one chunk's block grid:
//!
//! 1. surface fill (heightmap, strata, water)
//! 2. cave carving
//! 3. ore scattering
//! 4. mineshaft excavation
//! 5. tree placement
//! 6. structure placement and surface decoration
//!
//! Every pass is a pure function of the world seed, the chunk coordinate,
//! and the grid state left by earlier passes, so regenerating a chunk always
//! reproduces it byte for byte. Passes that cannot find a valid placement
//! skip silently; generation never fails.

use log::debug;
use web_time::Instant;

use crate::voxels::chunk::{Chunk, ChunkCoord, CHUNK_PLANE, CHUNK_SIZE};
use crate::worldgen::biome::{Biome, BiomeClassifier, MOUNTAIN_THRESHOLD};
use crate::worldgen::noise_field::{NoiseField2d, NoiseField3d};

pub mod biome;
pub mod caves;
pub mod mineshaft;
pub mod noise_field;
pub mod ores;
pub mod structures;
pub mod surface;
pub mod trees;

/// Seed offsets for the generator's own noise fields.
const HEIGHT_SEED: u32 = 0x11EE_7A11;
const CHEESE_SEED: u32 = 0xCA4E_B10B;
const TUNNEL_A_SEED: u32 = 0x7CA7_0001;
const TUNNEL_B_SEED: u32 = 0x7CA7_0002;

/// Per-chunk surface heights produced by the surface pass.
///
/// Ephemeral: threaded into the tree and structure passes, recomputed on
/// every generation run, never persisted. The cave pass must not consult it.
pub struct Heightmap {
    heights: [i32; CHUNK_PLANE],
}

impl Heightmap {
    /// A heightmap with every column at zero.
    pub fn new() -> Self {
        Heightmap {
            heights: [0; CHUNK_PLANE],
        }
    }

    /// Surface Y of the given local column.
    #[inline]
    pub fn get(&self, x: i32, z: i32) -> i32 {
        self.heights[z as usize * CHUNK_SIZE + x as usize]
    }

    /// Records the surface Y of the given local column.
    #[inline]
    pub fn set(&mut self, x: i32, z: i32, height: i32) {
        self.heights[z as usize * CHUNK_SIZE + x as usize] = height;
    }

    /// Max height difference over a rectangular footprint, the flatness
    /// measure structures test before committing.
    pub fn variance(&self, x0: i32, z0: i32, width: i32, depth: i32) -> i32 {
        let mut min = i32::MAX;
        let mut max = i32::MIN;
        for z in z0..z0 + depth {
            for x in x0..x0 + width {
                let h = self.get(x, z);
                min = min.min(h);
                max = max.max(h);
            }
        }
        max - min
    }
}

impl Default for Heightmap {
    fn default() -> Self {
        Heightmap::new()
    }
}

/// The seeded terrain generator.
pub struct Generator {
    pub(crate) seed: u32,
    pub(crate) classifier: BiomeClassifier,
    pub(crate) height_noise: NoiseField2d,
    pub(crate) cheese_noise: NoiseField3d,
    pub(crate) tunnel_a: NoiseField3d,
    pub(crate) tunnel_b: NoiseField3d,
}

impl Generator {
    /// Creates a generator for the given world seed.
    pub fn new(seed: u32) -> Self {
        Generator {
            seed,
            classifier: BiomeClassifier::new(seed),
            height_noise: NoiseField2d::new(seed ^ HEIGHT_SEED, 6, 1.0 / 256.0),
            cheese_noise: NoiseField3d::new(seed ^ CHEESE_SEED, 3, 0.03),
            tunnel_a: NoiseField3d::new(seed ^ TUNNEL_A_SEED, 2, 0.015),
            tunnel_b: NoiseField3d::new(seed ^ TUNNEL_B_SEED, 2, 0.015),
        }
    }

    /// The world seed this generator was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The biome governing a world column, with the mountain override
    /// applied on top of the base climate classification.
    pub fn biome_at(&self, wx: i32, wz: i32) -> Biome {
        let base = self.classifier.classify(wx, wz);
        if base != Biome::Ocean
            && base != Biome::Beach
            && self.classifier.mountain_factor(wx, wz) >= MOUNTAIN_THRESHOLD
        {
            Biome::Mountains
        } else {
            base
        }
    }

    /// Generates the chunk at a coordinate by running every pass in order.
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let started = Instant::now();
        let mut chunk = Chunk::new(coord);

        let heightmap = surface::fill(self, &mut chunk);
        caves::carve(self, &mut chunk);
        ores::scatter(self, &mut chunk);
        mineshaft::excavate(self, &mut chunk);
        trees::plant(self, &mut chunk, &heightmap);
        structures::place(self, &mut chunk, &heightmap);

        debug!(
            "generated chunk ({}, {}) in {:?}",
            coord.x,
            coord.z,
            started.elapsed()
        );
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::BlockKind;
    use crate::voxels::chunk::WORLD_HEIGHT;

    #[test]
    fn generation_is_deterministic() {
        let gen = Generator::new(42);
        let a = gen.generate(ChunkCoord::new(0, 0));
        let b = gen.generate(ChunkCoord::new(0, 0));
        assert_eq!(a.blocks(), b.blocks());

        // A second generator from the same seed agrees too.
        let other = Generator::new(42);
        let c = other.generate(ChunkCoord::new(0, 0));
        assert_eq!(a.blocks(), c.blocks());
    }

    #[test]
    fn different_seeds_produce_different_chunks() {
        let a = Generator::new(1).generate(ChunkCoord::new(0, 0));
        let b = Generator::new(2).generate(ChunkCoord::new(0, 0));
        assert_ne!(a.blocks(), b.blocks());
    }

    #[test]
    fn negative_coordinates_generate_cleanly() {
        let gen = Generator::new(7);
        let chunk = gen.generate(ChunkCoord::new(-3, -5));
        assert_eq!(chunk.get_block(0, 0, 0), BlockKind::Bedrock.id());
        // Some terrain exists above bedrock.
        assert!(chunk.surface_height(8, 8) > 0);
    }

    #[test]
    fn surface_height_matches_recorded_heightmap_for_seed_42() {
        // The end-to-end reference: the first solid cell scanning down at
        // local column (8, 8) must agree with the heightmap the surface pass
        // reported, run after run.
        let gen = Generator::new(42);
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        let heightmap = surface::fill(&gen, &mut chunk);
        let reported = heightmap.get(8, 8);
        assert!(reported >= 1 && reported < WORLD_HEIGHT as i32);

        let mut top_solid = -1;
        for y in (0..WORLD_HEIGHT as i32).rev() {
            let id = chunk.get_block(8, y, 8);
            if id != BlockKind::Air.id() && id != BlockKind::Water.id() {
                top_solid = y;
                break;
            }
        }
        assert_eq!(top_solid, reported);

        // And the value itself is stable across a fresh pipeline run.
        let mut again = Chunk::new(ChunkCoord::new(0, 0));
        let heightmap_again = surface::fill(&gen, &mut again);
        assert_eq!(heightmap_again.get(8, 8), reported);
    }

    #[test]
    fn heightmap_variance_measures_footprints() {
        let mut map = Heightmap::new();
        for z in 0..CHUNK_SIZE as i32 {
            for x in 0..CHUNK_SIZE as i32 {
                map.set(x, z, 60);
            }
        }
        map.set(4, 4, 65);
        assert_eq!(map.variance(0, 0, 3, 3), 0);
        assert_eq!(map.variance(3, 3, 3, 3), 5);
    }
}
