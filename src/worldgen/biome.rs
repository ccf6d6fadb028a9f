//! # Biome Module
//!
//! Classifies world coordinates into biomes from two independent climate
//! noise fields, and carries the per-biome tuning table the generation
//! passes read (terrain shape, surface blocks, tree and decoration odds).
//!
//! Biomes are never stored: the classification is a pure function of the
//! world seed and the (x, z) coordinate, so any pass can recompute it and no
//! invalidation exists. The mountain override is not applied here; the
//! column generators compose it on top, keeping the base classifier a pure
//! climate table.

use crate::voxels::block::{BlockId, BlockKind};
use crate::worldgen::noise_field::NoiseField2d;
use crate::worldgen::trees::TreeSpecies;

/// Seed offsets keeping the climate fields uncorrelated.
const TEMPERATURE_SEED: u32 = 0x5EA5_0111;
const MOISTURE_SEED: u32 = 0x0DD_C0DE;
const MOUNTAIN_SEED: u32 = 0x3A55_1F00;

/// Mountain-field values at or above this override the base biome.
pub const MOUNTAIN_THRESHOLD: f64 = 0.7;

/// The discrete biomes of the world.
///
/// Discriminants index [`PROFILES`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    /// Deep water, gravel floor.
    Ocean = 0,
    /// Sandy shoreline strip.
    Beach = 1,
    /// Open grassland with scattered oaks.
    Plains = 2,
    /// Dense oak and birch cover.
    Forest = 3,
    /// Hot, dry sand with cacti.
    Desert = 4,
    /// Cool spruce forest.
    Taiga = 5,
    /// Frozen flats under a snow surface.
    Tundra = 6,
    /// Hot, wet, heavily treed lowland.
    Jungle = 7,
    /// Low, soggy ground with mushrooms.
    Swamp = 8,
    /// Large-scale override: bare stone peaks, snow-capped up high.
    Mountains = 9,
}

/// Per-biome generation parameters.
pub struct BiomeProfile {
    /// Block placed at the surface cell of a column.
    pub surface: BlockId,
    /// Block filling the few cells under the surface.
    pub subsurface: BlockId,
    /// Surface block used when the column tops out under water.
    pub underwater: BlockId,
    /// Lower bound of the surface height range.
    pub height_min: i32,
    /// Upper bound of the surface height range.
    pub height_max: i32,
    /// Scales how much of the height range the noise actually spans.
    pub amplitude: f64,
    /// Per-column chance of starting a tree.
    pub tree_chance: f64,
    /// Weighted species table for tree trials; empty means no trees.
    pub species: &'static [(TreeSpecies, u32)],
    /// Per-column chance of a tall grass tuft.
    pub grass_chance: f64,
    /// Per-column chance of a flower.
    pub flower_chance: f64,
    /// Per-column chance of a cactus (desert only in practice).
    pub cactus_chance: f64,
    /// Per-column chance of a mushroom.
    pub mushroom_chance: f64,
}

const GRASS: BlockId = BlockKind::Grass as BlockId;
const DIRT: BlockId = BlockKind::Dirt as BlockId;
const SAND: BlockId = BlockKind::Sand as BlockId;
const SANDSTONE: BlockId = BlockKind::Sandstone as BlockId;
const GRAVEL: BlockId = BlockKind::Gravel as BlockId;
const SNOW: BlockId = BlockKind::Snow as BlockId;
const STONE: BlockId = BlockKind::Stone as BlockId;

const NO_TREES: &[(TreeSpecies, u32)] = &[];
const OAK_ONLY: &[(TreeSpecies, u32)] = &[(TreeSpecies::Oak, 1)];
const OAK_BIRCH: &[(TreeSpecies, u32)] = &[(TreeSpecies::Oak, 3), (TreeSpecies::Birch, 1)];
const SPRUCE_ONLY: &[(TreeSpecies, u32)] = &[(TreeSpecies::Spruce, 1)];
const JUNGLE_MIX: &[(TreeSpecies, u32)] = &[(TreeSpecies::Jungle, 4), (TreeSpecies::Oak, 1)];

/// The biome tuning table, indexed by [`Biome`] discriminant.
pub static PROFILES: [BiomeProfile; 10] = [
    // Ocean
    BiomeProfile {
        surface: GRAVEL,
        subsurface: GRAVEL,
        underwater: GRAVEL,
        height_min: 20,
        height_max: 44,
        amplitude: 1.0,
        tree_chance: 0.0,
        species: NO_TREES,
        grass_chance: 0.0,
        flower_chance: 0.0,
        cactus_chance: 0.0,
        mushroom_chance: 0.0,
    },
    // Beach
    BiomeProfile {
        surface: SAND,
        subsurface: SAND,
        underwater: SAND,
        height_min: 50,
        height_max: 55,
        amplitude: 0.8,
        tree_chance: 0.0,
        species: NO_TREES,
        grass_chance: 0.0,
        flower_chance: 0.0,
        cactus_chance: 0.0,
        mushroom_chance: 0.0,
    },
    // Plains
    BiomeProfile {
        surface: GRASS,
        subsurface: DIRT,
        underwater: GRAVEL,
        height_min: 52,
        height_max: 66,
        amplitude: 0.8,
        tree_chance: 0.003,
        species: OAK_ONLY,
        grass_chance: 0.08,
        flower_chance: 0.02,
        cactus_chance: 0.0,
        mushroom_chance: 0.0,
    },
    // Forest
    BiomeProfile {
        surface: GRASS,
        subsurface: DIRT,
        underwater: GRAVEL,
        height_min: 53,
        height_max: 72,
        amplitude: 1.0,
        tree_chance: 0.02,
        species: OAK_BIRCH,
        grass_chance: 0.04,
        flower_chance: 0.008,
        cactus_chance: 0.0,
        mushroom_chance: 0.004,
    },
    // Desert
    BiomeProfile {
        surface: SAND,
        subsurface: SANDSTONE,
        underwater: SAND,
        height_min: 52,
        height_max: 68,
        amplitude: 0.7,
        tree_chance: 0.0,
        species: NO_TREES,
        grass_chance: 0.0,
        flower_chance: 0.0,
        cactus_chance: 0.01,
        mushroom_chance: 0.0,
    },
    // Taiga
    BiomeProfile {
        surface: GRASS,
        subsurface: DIRT,
        underwater: GRAVEL,
        height_min: 54,
        height_max: 72,
        amplitude: 1.0,
        tree_chance: 0.015,
        species: SPRUCE_ONLY,
        grass_chance: 0.02,
        flower_chance: 0.0,
        cactus_chance: 0.0,
        mushroom_chance: 0.003,
    },
    // Tundra
    BiomeProfile {
        surface: SNOW,
        subsurface: DIRT,
        underwater: GRAVEL,
        height_min: 52,
        height_max: 64,
        amplitude: 0.6,
        tree_chance: 0.002,
        species: SPRUCE_ONLY,
        grass_chance: 0.0,
        flower_chance: 0.0,
        cactus_chance: 0.0,
        mushroom_chance: 0.0,
    },
    // Jungle
    BiomeProfile {
        surface: GRASS,
        subsurface: DIRT,
        underwater: GRAVEL,
        height_min: 54,
        height_max: 76,
        amplitude: 1.1,
        tree_chance: 0.035,
        species: JUNGLE_MIX,
        grass_chance: 0.1,
        flower_chance: 0.01,
        cactus_chance: 0.0,
        mushroom_chance: 0.002,
    },
    // Swamp
    BiomeProfile {
        surface: GRASS,
        subsurface: DIRT,
        underwater: DIRT,
        height_min: 50,
        height_max: 57,
        amplitude: 0.5,
        tree_chance: 0.008,
        species: OAK_ONLY,
        grass_chance: 0.06,
        flower_chance: 0.0,
        cactus_chance: 0.0,
        mushroom_chance: 0.01,
    },
    // Mountains
    BiomeProfile {
        surface: STONE,
        subsurface: STONE,
        underwater: GRAVEL,
        height_min: 66,
        height_max: 100,
        amplitude: 1.3,
        tree_chance: 0.001,
        species: SPRUCE_ONLY,
        grass_chance: 0.0,
        flower_chance: 0.0,
        cactus_chance: 0.0,
        mushroom_chance: 0.0,
    },
];

/// Returns the tuning profile for a biome.
#[inline]
pub fn profile(biome: Biome) -> &'static BiomeProfile {
    &PROFILES[biome as usize]
}

/// Maps a (temperature, moisture) pair in the unit square to a biome.
///
/// An ordered decision table in the Whittaker style: every band is closed on
/// its lower bound and open on its upper, and the chain is total, so exactly
/// one biome comes back for any input.
pub fn biome_from_climate(temperature: f64, moisture: f64) -> Biome {
    if moisture >= 0.9 {
        return Biome::Ocean;
    }
    if moisture >= 0.82 {
        return Biome::Beach;
    }

    if temperature < 0.25 {
        // Cold band.
        if moisture < 0.5 {
            Biome::Tundra
        } else {
            Biome::Taiga
        }
    } else if temperature < 0.5 {
        // Cool band.
        if moisture < 0.5 {
            Biome::Plains
        } else if moisture < 0.75 {
            Biome::Forest
        } else {
            Biome::Taiga
        }
    } else if temperature < 0.75 {
        // Warm band.
        if moisture < 0.5 {
            Biome::Plains
        } else if moisture < 0.75 {
            Biome::Forest
        } else {
            Biome::Swamp
        }
    } else {
        // Hot band.
        if moisture < 0.5 {
            Biome::Desert
        } else {
            Biome::Jungle
        }
    }
}

/// Classifies world coordinates into biomes.
///
/// Holds the two climate fields plus the large-scale mountain field. The
/// fields use distinct seed offsets and spatial scales so they stay
/// uncorrelated.
pub struct BiomeClassifier {
    temperature: NoiseField2d,
    moisture: NoiseField2d,
    mountain: NoiseField2d,
}

impl BiomeClassifier {
    /// Creates a classifier for the given world seed.
    pub fn new(seed: u32) -> Self {
        BiomeClassifier {
            temperature: NoiseField2d::new(seed ^ TEMPERATURE_SEED, 4, 1.0 / 512.0),
            moisture: NoiseField2d::new(seed ^ MOISTURE_SEED, 4, 1.0 / 384.0),
            mountain: NoiseField2d::new(seed ^ MOUNTAIN_SEED, 3, 1.0 / 1024.0),
        }
    }

    /// Temperature at a world column, in [0, 1].
    pub fn temperature(&self, wx: i32, wz: i32) -> f64 {
        self.temperature.sample_norm(wx as f64, wz as f64)
    }

    /// Moisture at a world column, in [0, 1].
    pub fn moisture(&self, wx: i32, wz: i32) -> f64 {
        self.moisture.sample_norm(wx as f64, wz as f64)
    }

    /// The large-scale mountain field at a world column, in [0, 1]. The
    /// caller compares this against [`MOUNTAIN_THRESHOLD`] and applies the
    /// override itself.
    pub fn mountain_factor(&self, wx: i32, wz: i32) -> f64 {
        self.mountain.sample_norm(wx as f64, wz as f64)
    }

    /// The base biome at a world column, without the mountain override.
    pub fn classify(&self, wx: i32, wz: i32) -> Biome {
        biome_from_climate(self.temperature(wx, wz), self.moisture(wx, wz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climate_table_is_total_over_the_unit_square() {
        // Walk the whole square including the exact band boundaries; every
        // point must classify without panicking.
        for ti in 0..=100 {
            for mi in 0..=100 {
                let t = ti as f64 / 100.0;
                let m = mi as f64 / 100.0;
                let _ = biome_from_climate(t, m);
            }
        }
    }

    #[test]
    fn band_boundaries_are_closed_below_and_open_above() {
        assert_eq!(biome_from_climate(0.5, 0.1), Biome::Plains);
        assert_eq!(biome_from_climate(0.75, 0.1), Biome::Desert);
        assert_eq!(biome_from_climate(0.749, 0.1), Biome::Plains);
        assert_eq!(biome_from_climate(0.5, 0.9), Biome::Ocean);
        assert_eq!(biome_from_climate(0.5, 0.82), Biome::Beach);
        assert_eq!(biome_from_climate(0.1, 0.0), Biome::Tundra);
        assert_eq!(biome_from_climate(0.99, 0.6), Biome::Jungle);
    }

    #[test]
    fn classifier_is_deterministic() {
        let a = BiomeClassifier::new(42);
        let b = BiomeClassifier::new(42);
        for i in -8..8 {
            let (wx, wz) = (i * 37, i * -53);
            assert_eq!(a.classify(wx, wz), b.classify(wx, wz));
            assert!((0.0..=1.0).contains(&a.temperature(wx, wz)));
            assert!((0.0..=1.0).contains(&a.moisture(wx, wz)));
            assert!((0.0..=1.0).contains(&a.mountain_factor(wx, wz)));
        }
    }

    #[test]
    fn every_biome_has_a_profile() {
        let all = [
            Biome::Ocean,
            Biome::Beach,
            Biome::Plains,
            Biome::Forest,
            Biome::Desert,
            Biome::Taiga,
            Biome::Tundra,
            Biome::Jungle,
            Biome::Swamp,
            Biome::Mountains,
        ];
        for biome in all {
            let p = profile(biome);
            assert!(p.height_min < p.height_max);
            if p.tree_chance > 0.0 {
                assert!(!p.species.is_empty());
            }
        }
    }
}
