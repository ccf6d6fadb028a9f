//! # Noise Field Module
//!
//! Seeded, deterministic sampling primitives for the generator: coherent 2D
//! and 3D noise wrapped around the `noise` crate, and a per-chunk integer
//! hash that seeds independent `fastrand` streams for each generation phase.
//!
//! Everything here is a pure function of its numeric inputs. The same seed
//! and coordinates produce the same output forever, which is what lets a
//! chunk be regenerated from scratch instead of persisted.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::voxels::chunk::ChunkCoord;

/// A seeded 2D fractal noise field sampling in [-1, 1].
pub struct NoiseField2d {
    inner: Fbm<Perlin>,
}

impl NoiseField2d {
    /// Creates a field with the given seed, octave count, and base frequency.
    /// Persistence 0.5 and lacunarity 2.0 are fixed across the generator.
    pub fn new(seed: u32, octaves: usize, frequency: f64) -> Self {
        NoiseField2d {
            inner: Fbm::<Perlin>::new(seed)
                .set_octaves(octaves)
                .set_frequency(frequency)
                .set_persistence(0.5)
                .set_lacunarity(2.0),
        }
    }

    /// Samples the field at world coordinates, clamped to [-1, 1].
    pub fn sample(&self, wx: f64, wz: f64) -> f64 {
        self.inner.get([wx, wz]).clamp(-1.0, 1.0)
    }

    /// Samples the field normalized to [0, 1].
    pub fn sample_norm(&self, wx: f64, wz: f64) -> f64 {
        (self.sample(wx, wz) + 1.0) * 0.5
    }
}

/// A seeded 3D fractal noise field sampling in [-1, 1].
pub struct NoiseField3d {
    inner: Fbm<Perlin>,
}

impl NoiseField3d {
    /// Creates a field with the given seed, octave count, and base frequency.
    pub fn new(seed: u32, octaves: usize, frequency: f64) -> Self {
        NoiseField3d {
            inner: Fbm::<Perlin>::new(seed)
                .set_octaves(octaves)
                .set_frequency(frequency)
                .set_persistence(0.5)
                .set_lacunarity(2.0),
        }
    }

    /// Samples the field at world coordinates, clamped to [-1, 1].
    pub fn sample(&self, wx: f64, wy: f64, wz: f64) -> f64 {
        self.inner.get([wx, wy, wz]).clamp(-1.0, 1.0)
    }
}

/// Tags the independent per-chunk random streams.
///
/// Each generation phase draws from its own stream so that, for example, an
/// extra tree roll never shifts which chunks get a mineshaft. The tag value
/// feeds the stream seed hash.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamPurpose {
    /// Ore vein placement.
    Ores = 1,
    /// Mineshaft network layout.
    Mineshaft = 2,
    /// Tree trials and shapes.
    Trees = 3,
    /// Large structure rolls and candidates.
    Structures = 4,
    /// Per-column surface decoration.
    Decoration = 5,
}

/// SplitMix64 finalizer, the avalanche step of the stream seed hash.
fn splitmix(mut h: u64) -> u64 {
    h ^= h >> 30;
    h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94D0_49BB_1331_11EB);
    h ^ (h >> 31)
}

/// Hashes (world seed, chunk coordinate, phase tag) into a stream seed.
pub fn stream_seed(world_seed: u32, coord: ChunkCoord, purpose: StreamPurpose) -> u64 {
    let mut h = world_seed as u64 ^ 0x9E37_79B9_7F4A_7C15;
    h = splitmix(h ^ (coord.x as i64 as u64).wrapping_mul(0xC0FF_EE00_D00D_BAAD));
    h = splitmix(h ^ (coord.z as i64 as u64).wrapping_mul(0x5EED_CAFE_1234_5678));
    splitmix(h ^ purpose as u64)
}

/// A deterministic random stream for one (chunk, phase) pair.
pub fn chunk_rng(world_seed: u32, coord: ChunkCoord, purpose: StreamPurpose) -> fastrand::Rng {
    fastrand::Rng::with_seed(stream_seed(world_seed, coord, purpose))
}
